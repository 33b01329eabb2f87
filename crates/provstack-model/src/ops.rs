//! Flat request/response records for the four provisioning operations.
//!
//! One versioned operation set: older flat-parameter request shapes and the
//! newer externally-resolved-secret shape collapse into a single record per
//! operation carrying the superset of fields. Raw parameters travel as a
//! string map and are resolved by `provstack-core` before any backend call.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::CredentialSet;

/// Raw, unresolved caller-supplied parameters.
pub type RawParameters = BTreeMap<String, String>;

/// Create a bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBucketRequest {
    /// Bucket name, unique within the backend namespace.
    pub name: String,
    /// Connection parameters (endpoint, keys, optional TLS material).
    #[serde(default)]
    pub parameters: RawParameters,
}

/// Result of a successful bucket creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBucketResponse {
    /// Backend identifier of the bucket (its name).
    pub bucket_id: String,
}

/// Delete a bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteBucketRequest {
    /// Identifier returned by [`CreateBucketResponse`].
    pub bucket_id: String,
    /// Connection parameters; when empty, the bucket metadata store is
    /// consulted instead.
    #[serde(default)]
    pub parameters: RawParameters,
}

/// Grant a principal access to a bucket and issue credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantAccessRequest {
    /// Target bucket identifier.
    pub bucket_id: String,
    /// Principal name to provision or look up.
    pub account_name: String,
    /// Connection parameters, optionally carrying `parentIdentity` for
    /// scoped sub-identity grants.
    #[serde(default)]
    pub parameters: RawParameters,
}

/// Result of a successful grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantAccessResponse {
    /// Identifier of the granted identity (`name` or `parent:name`).
    pub account_id: String,
    /// Issued credentials keyed by provider tag.
    pub credentials: CredentialSet,
}

/// Revoke a previously granted identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevokeAccessRequest {
    /// Bucket the grant was issued against.
    pub bucket_id: String,
    /// Identifier returned by [`GrantAccessResponse`].
    pub account_id: String,
    /// Connection parameters; when empty, the bucket metadata store is
    /// consulted instead.
    #[serde(default)]
    pub parameters: RawParameters,
}

/// Driver identity, reported by the service façade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverInfo {
    /// Registered provisioner name.
    pub name: String,
}
