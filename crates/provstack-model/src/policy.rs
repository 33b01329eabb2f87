//! Bucket policy document model and merge semantics.
//!
//! A [`PolicyDocument`] is an ordered sequence of [`Statement`]s in the
//! standard S3 bucket-policy JSON shape. The backend owns the document; this
//! module only models it in memory and provides the pure
//! [`PolicyDocument::merge`] transform used by the grant path. Statements
//! are keyed by SID, which is always set to the granted identity's
//! identifier, so a document never holds two statements for the same
//! principal.

use serde::{Deserialize, Serialize};

/// Policy language version carried by every document we write.
pub const POLICY_VERSION: &str = "2012-10-17";

/// Actions granted to every provisioned identity.
///
/// Covers the object lifecycle the data-path caller needs: read, write,
/// delete, and listing. Treated as a configuration constant; the grant
/// request does not narrow it.
pub const ALLOWED_ACTIONS: &[&str] = &[
    "s3:GetObject",
    "s3:PutObject",
    "s3:DeleteObject",
    "s3:ListBucket",
];

/// Statement effect. Grants produced by this adapter are always `Allow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Permit the listed actions.
    Allow,
    /// Deny the listed actions. Never produced here, but accepted when
    /// reading documents written by other tooling.
    Deny,
}

/// The principal block of a statement, in `{"AWS": [...]}` form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Account identities the statement applies to.
    #[serde(rename = "AWS")]
    pub aws: Vec<String>,
}

/// A single bucket policy statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    /// Statement identifier; equals the granted identity's identifier and
    /// serves as the merge key within a document.
    pub sid: String,
    /// Allow or deny.
    pub effect: Effect,
    /// Identities the statement grants to.
    pub principal: Principal,
    /// Granted actions.
    pub action: Vec<String>,
    /// Bucket and bucket sub-resource ARNs.
    pub resource: Vec<String>,
}

impl Statement {
    /// Build the standard allow statement for one principal on one bucket.
    ///
    /// Resources cover the bucket itself and all of its objects; actions are
    /// the fixed [`ALLOWED_ACTIONS`] list.
    #[must_use]
    pub fn for_bucket(sid: impl Into<String>, principal: impl Into<String>, bucket: &str) -> Self {
        Self {
            sid: sid.into(),
            effect: Effect::Allow,
            principal: Principal {
                aws: vec![principal.into()],
            },
            action: ALLOWED_ACTIONS.iter().map(|a| (*a).to_owned()).collect(),
            resource: vec![
                format!("arn:aws:s3:::{bucket}"),
                format!("arn:aws:s3:::{bucket}/*"),
            ],
        }
    }
}

/// An ordered bucket policy document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    /// Policy language version.
    pub version: String,
    /// Ordered statements.
    pub statement: Vec<Statement>,
}

impl Default for PolicyDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyDocument {
    /// An empty document with the current policy language version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            version: POLICY_VERSION.to_owned(),
            statement: Vec::new(),
        }
    }

    /// A document containing a single statement.
    #[must_use]
    pub fn with_statement(statement: Statement) -> Self {
        Self {
            version: POLICY_VERSION.to_owned(),
            statement: vec![statement],
        }
    }

    /// Merge `statement` into the document, keyed by SID.
    ///
    /// If an existing statement carries the same SID it is replaced in
    /// place, preserving its position; otherwise the statement is appended.
    /// The transform is pure and idempotent: merging the same statement
    /// twice yields the same document as merging it once. Writing the
    /// result back to the backend is the caller's responsibility.
    #[must_use]
    pub fn merge(mut self, statement: Statement) -> Self {
        match self.statement.iter_mut().find(|s| s.sid == statement.sid) {
            Some(existing) => *existing = statement,
            None => self.statement.push(statement),
        }
        self
    }

    /// Look up a statement by SID.
    #[must_use]
    pub fn find_statement(&self, sid: &str) -> Option<&Statement> {
        self.statement.iter().find(|s| s.sid == sid)
    }

    /// Serialize to the backend's JSON wire form.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a document from its JSON wire form.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
