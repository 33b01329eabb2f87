//! Backend client strategy interfaces and their closed error enums.
//!
//! The adapter talks to two independent backends: an S3-compatible
//! object-storage policy API and an identity-administration API. Both are
//! injected at construction as object-safe trait objects so tests and local
//! mode can substitute implementations without touching process-wide state.
//!
//! Error classification happens here, once, at the client boundary: an
//! implementation maps whatever its transport reports (wire error codes,
//! HTTP statuses) into [`ObjectStoreError`] / [`IdentityAdminError`], and
//! every call site above matches on those enums. No vendor error string is
//! inspected outside a client implementation.

use std::sync::Arc;

use async_trait::async_trait;
use provstack_model::policy::PolicyDocument;
use provstack_model::types::GrantParameters;
use serde::{Deserialize, Serialize};

/// Error surface of the object-storage policy API.
#[derive(Debug, thiserror::Error)]
pub enum ObjectStoreError {
    /// The bucket name is taken by another account.
    #[error("bucket already exists: {bucket}")]
    BucketAlreadyExists {
        /// The conflicting bucket name.
        bucket: String,
    },

    /// The bucket already exists and is owned by the calling account.
    #[error("bucket already owned by you: {bucket}")]
    BucketAlreadyOwnedByYou {
        /// The conflicting bucket name.
        bucket: String,
    },

    /// The referenced bucket does not exist.
    #[error("no such bucket: {bucket}")]
    NoSuchBucket {
        /// The missing bucket name.
        bucket: String,
    },

    /// The bucket exists but carries no policy document yet.
    #[error("no bucket policy: {bucket}")]
    NoSuchBucketPolicy {
        /// The bucket without a policy.
        bucket: String,
    },

    /// The bucket still contains objects and cannot be deleted.
    #[error("bucket not empty: {bucket}")]
    BucketNotEmpty {
        /// The non-empty bucket name.
        bucket: String,
    },

    /// The backend rejected the admin credentials.
    #[error("access denied")]
    AccessDenied,

    /// Transport or unclassified backend failure.
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

/// Error surface of the identity-administration API.
#[derive(Debug, thiserror::Error)]
pub enum IdentityAdminError {
    /// A user with this identifier already exists.
    #[error("user already exists: {user_id}")]
    UserExists {
        /// The conflicting user identifier.
        user_id: String,
    },

    /// A subuser with this identifier already exists under the parent.
    #[error("subuser already exists: {subuser_id}")]
    SubuserExists {
        /// The conflicting subuser identifier.
        subuser_id: String,
    },

    /// The referenced user does not exist.
    #[error("no such user: {user_id}")]
    NoSuchUser {
        /// The missing user identifier.
        user_id: String,
    },

    /// The backend rejected the admin credentials.
    #[error("access denied")]
    AccessDenied,

    /// Transport or unclassified backend failure.
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

/// One key pair held by an identity.
///
/// For a scoped sub-identity the `user` field carries the full
/// `parent:child` identifier; the key is listed on the parent's record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserKey {
    /// Identifier of the identity owning the key.
    pub user: String,
    /// Access key identifier.
    pub access_key: String,
    /// Secret key.
    pub secret_key: String,
}

/// An identity record as reported by the identity-administration backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    /// Top-level identifier.
    pub user_id: String,
    /// Human-readable display name.
    pub display_name: String,
    /// Key pairs held by the identity and its sub-identities.
    pub keys: Vec<UserKey>,
}

/// Object-storage policy API: bucket CRUD and policy read/write.
#[async_trait]
pub trait ObjectStoreClient: Send + Sync {
    /// Create a bucket with the given name.
    async fn create_bucket(&self, bucket: &str) -> Result<(), ObjectStoreError>;

    /// Delete a bucket by name.
    async fn delete_bucket(&self, bucket: &str) -> Result<(), ObjectStoreError>;

    /// Fetch the bucket's policy document.
    ///
    /// Fails with [`ObjectStoreError::NoSuchBucketPolicy`] when the bucket
    /// exists but no policy has been written yet; callers that treat that
    /// case as an empty document handle it explicitly.
    async fn get_bucket_policy(&self, bucket: &str) -> Result<PolicyDocument, ObjectStoreError>;

    /// Replace the bucket's policy document in full. No partial patch.
    async fn put_bucket_policy(
        &self,
        bucket: &str,
        policy: &PolicyDocument,
    ) -> Result<(), ObjectStoreError>;
}

/// Identity-administration API: user/subuser lifecycle and key material.
#[async_trait]
pub trait IdentityAdminClient: Send + Sync {
    /// Create a top-level user, returning its record with key material.
    async fn create_user(&self, user_id: &str) -> Result<UserInfo, IdentityAdminError>;

    /// Fetch an existing user's record including its key list.
    async fn get_user(&self, user_id: &str) -> Result<UserInfo, IdentityAdminError>;

    /// Create a full-access subuser `name` under `parent`.
    async fn create_subuser(&self, parent: &str, name: &str) -> Result<(), IdentityAdminError>;

    /// Remove a top-level user and its keys.
    async fn remove_user(&self, user_id: &str) -> Result<(), IdentityAdminError>;

    /// Remove a subuser `name` under `parent`, purging its keys.
    async fn remove_subuser(&self, parent: &str, name: &str) -> Result<(), IdentityAdminError>;
}

/// Constructs the backend client pair for one request's parameters.
///
/// Production implementations own TLS, signing, and credential handling;
/// the managers only see the resulting trait objects.
pub trait ClientFactory: Send + Sync {
    /// Build the object-storage and identity-admin clients for `params`.
    fn build(
        &self,
        params: &GrantParameters,
    ) -> anyhow::Result<(Arc<dyn ObjectStoreClient>, Arc<dyn IdentityAdminClient>)>;
}
