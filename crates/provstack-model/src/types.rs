//! Credential and parameter types exchanged with callers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Provider tag under which S3 credentials are returned.
pub const PROVIDER_S3: &str = "s3";

/// Separator between a parent principal and a scoped sub-identity name.
pub const SUB_IDENTITY_SEPARATOR: char = ':';

/// The identifier of a scoped sub-identity: literal concatenation of the
/// parent and child names with a single separator.
#[must_use]
pub fn sub_identity_id(parent: &str, name: &str) -> String {
    format!("{parent}{SUB_IDENTITY_SEPARATOR}{name}")
}

/// Split an account identifier into `(parent, child)` when it denotes a
/// scoped sub-identity.
#[must_use]
pub fn split_sub_identity(account_id: &str) -> Option<(&str, &str)> {
    account_id
        .split_once(SUB_IDENTITY_SEPARATOR)
        .filter(|(parent, child)| !parent.is_empty() && !child.is_empty())
}

/// One issued credential: connection metadata plus a key pair.
///
/// Returned to the caller on grant, never persisted by this adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    /// Object-storage endpoint the key pair is valid against.
    pub endpoint: String,
    /// Backend region.
    pub region: String,
    /// Access key identifier.
    pub access_key_id: String,
    /// Secret key.
    pub access_secret_key: String,
}

/// Credentials keyed by provider tag (currently always [`PROVIDER_S3`]).
pub type CredentialSet = BTreeMap<String, Credential>;

/// Resolved per-call connection parameters.
///
/// Produced by the parameter resolver from externally stored secrets or
/// inline request parameters; treated as immutable input by every manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantParameters {
    /// Object-storage / identity-admin endpoint.
    pub endpoint: String,
    /// Backend region.
    pub region: String,
    /// Admin access key used for backend calls.
    pub access_key: String,
    /// Admin secret key used for backend calls.
    pub secret_key: String,
    /// Parent principal for scoped sub-identity grants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_identity: Option<String>,
    /// PEM TLS material for the backend connection, when required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls_cert: Option<String>,
}
