//! In-memory implementations of both backend client traits.
//!
//! [`MemoryBackend`] mirrors the error semantics of a real deployment:
//! create-bucket distinguishes owned-by-you from owned-by-another, delete
//! refuses non-empty buckets, policy reads fail with `NoSuchBucketPolicy`
//! until one is written, and subuser keys materialize on the parent's key
//! list. It backs the test suites and the server's local mode; production
//! deployments inject real clients through [`crate::client::ClientFactory`].

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use provstack_model::policy::PolicyDocument;
use provstack_model::types::{sub_identity_id, GrantParameters};
use rand::Rng;

use crate::client::{
    ClientFactory, IdentityAdminClient, IdentityAdminError, ObjectStoreClient, ObjectStoreError,
    UserInfo, UserKey,
};

#[derive(Debug, Default)]
struct BucketState {
    policy: Option<PolicyDocument>,
    objects: BTreeSet<String>,
}

#[derive(Debug, Default, Clone)]
struct UserRecord {
    keys: Vec<UserKey>,
    subusers: BTreeSet<String>,
}

/// Shared in-memory object-store and identity-admin backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    buckets: Mutex<BTreeMap<String, BucketState>>,
    users: Mutex<BTreeMap<String, UserRecord>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place an object into a bucket, making it non-empty. Test hook for
    /// the delete-refusal path; the adapter itself has no data path.
    pub fn put_object(&self, bucket: &str, key: &str) {
        if let Some(state) = self.buckets.lock().get_mut(bucket) {
            state.objects.insert(key.to_owned());
        }
    }
}

/// Generate an access/secret key pair in the backend's usual shape.
fn generate_key_pair() -> (String, String) {
    let mut rng = rand::rng();
    let mut access = [0u8; 10];
    let mut secret = [0u8; 20];
    rng.fill_bytes(&mut access);
    rng.fill_bytes(&mut secret);
    (hex::encode_upper(access), hex::encode(secret))
}

#[async_trait]
impl ObjectStoreClient for MemoryBackend {
    async fn create_bucket(&self, bucket: &str) -> Result<(), ObjectStoreError> {
        let mut buckets = self.buckets.lock();
        if buckets.contains_key(bucket) {
            // The memory backend has a single owner, so a name clash is
            // always the owned-by-you variant.
            return Err(ObjectStoreError::BucketAlreadyOwnedByYou {
                bucket: bucket.to_owned(),
            });
        }
        buckets.insert(bucket.to_owned(), BucketState::default());
        Ok(())
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<(), ObjectStoreError> {
        let mut buckets = self.buckets.lock();
        let Some(state) = buckets.get(bucket) else {
            return Err(ObjectStoreError::NoSuchBucket {
                bucket: bucket.to_owned(),
            });
        };
        if !state.objects.is_empty() {
            return Err(ObjectStoreError::BucketNotEmpty {
                bucket: bucket.to_owned(),
            });
        }
        buckets.remove(bucket);
        Ok(())
    }

    async fn get_bucket_policy(&self, bucket: &str) -> Result<PolicyDocument, ObjectStoreError> {
        let buckets = self.buckets.lock();
        let state = buckets
            .get(bucket)
            .ok_or_else(|| ObjectStoreError::NoSuchBucket {
                bucket: bucket.to_owned(),
            })?;
        state
            .policy
            .clone()
            .ok_or_else(|| ObjectStoreError::NoSuchBucketPolicy {
                bucket: bucket.to_owned(),
            })
    }

    async fn put_bucket_policy(
        &self,
        bucket: &str,
        policy: &PolicyDocument,
    ) -> Result<(), ObjectStoreError> {
        let mut buckets = self.buckets.lock();
        let state = buckets
            .get_mut(bucket)
            .ok_or_else(|| ObjectStoreError::NoSuchBucket {
                bucket: bucket.to_owned(),
            })?;
        state.policy = Some(policy.clone());
        Ok(())
    }
}

#[async_trait]
impl IdentityAdminClient for MemoryBackend {
    async fn create_user(&self, user_id: &str) -> Result<UserInfo, IdentityAdminError> {
        let mut users = self.users.lock();
        if users.contains_key(user_id) {
            return Err(IdentityAdminError::UserExists {
                user_id: user_id.to_owned(),
            });
        }
        let (access_key, secret_key) = generate_key_pair();
        let record = UserRecord {
            keys: vec![UserKey {
                user: user_id.to_owned(),
                access_key,
                secret_key,
            }],
            subusers: BTreeSet::new(),
        };
        users.insert(user_id.to_owned(), record.clone());
        Ok(UserInfo {
            user_id: user_id.to_owned(),
            display_name: user_id.to_owned(),
            keys: record.keys,
        })
    }

    async fn get_user(&self, user_id: &str) -> Result<UserInfo, IdentityAdminError> {
        let users = self.users.lock();
        let record = users
            .get(user_id)
            .ok_or_else(|| IdentityAdminError::NoSuchUser {
                user_id: user_id.to_owned(),
            })?;
        Ok(UserInfo {
            user_id: user_id.to_owned(),
            display_name: user_id.to_owned(),
            keys: record.keys.clone(),
        })
    }

    async fn create_subuser(&self, parent: &str, name: &str) -> Result<(), IdentityAdminError> {
        let mut users = self.users.lock();
        let record = users
            .get_mut(parent)
            .ok_or_else(|| IdentityAdminError::NoSuchUser {
                user_id: parent.to_owned(),
            })?;
        let subuser_id = sub_identity_id(parent, name);
        if record.subusers.contains(name) {
            return Err(IdentityAdminError::SubuserExists { subuser_id });
        }
        let (access_key, secret_key) = generate_key_pair();
        record.subusers.insert(name.to_owned());
        record.keys.push(UserKey {
            user: subuser_id,
            access_key,
            secret_key,
        });
        Ok(())
    }

    async fn remove_user(&self, user_id: &str) -> Result<(), IdentityAdminError> {
        let mut users = self.users.lock();
        if users.remove(user_id).is_none() {
            return Err(IdentityAdminError::NoSuchUser {
                user_id: user_id.to_owned(),
            });
        }
        Ok(())
    }

    async fn remove_subuser(&self, parent: &str, name: &str) -> Result<(), IdentityAdminError> {
        let mut users = self.users.lock();
        let record = users
            .get_mut(parent)
            .ok_or_else(|| IdentityAdminError::NoSuchUser {
                user_id: parent.to_owned(),
            })?;
        if !record.subusers.remove(name) {
            return Err(IdentityAdminError::NoSuchUser {
                user_id: sub_identity_id(parent, name),
            });
        }
        let subuser_id = sub_identity_id(parent, name);
        record.keys.retain(|k| k.user != subuser_id);
        Ok(())
    }
}

/// Factory handing out one shared [`MemoryBackend`] regardless of
/// parameters. Used by local mode and the integration tests.
#[derive(Debug, Default)]
pub struct MemoryClientFactory {
    backend: Arc<MemoryBackend>,
}

impl MemoryClientFactory {
    /// Create a factory over a fresh backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared backend, for direct state inspection in tests.
    #[must_use]
    pub fn backend(&self) -> Arc<MemoryBackend> {
        self.backend.clone()
    }
}

impl ClientFactory for MemoryClientFactory {
    fn build(
        &self,
        _params: &GrantParameters,
    ) -> anyhow::Result<(Arc<dyn ObjectStoreClient>, Arc<dyn IdentityAdminClient>)> {
        Ok((self.backend.clone(), self.backend.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_should_report_no_policy_before_first_write() {
        let backend = MemoryBackend::new();
        backend.create_bucket("b1").await.unwrap();
        let err = backend.get_bucket_policy("b1").await.unwrap_err();
        assert!(matches!(err, ObjectStoreError::NoSuchBucketPolicy { .. }));
    }

    #[tokio::test]
    async fn test_should_list_subuser_key_on_parent() {
        let backend = MemoryBackend::new();
        backend.create_user("alice").await.unwrap();
        backend.create_subuser("alice", "bob").await.unwrap();

        let parent = backend.get_user("alice").await.unwrap();
        assert_eq!(parent.keys.len(), 2);
        assert!(parent.keys.iter().any(|k| k.user == "alice:bob"));
    }

    #[tokio::test]
    async fn test_should_reject_duplicate_subuser() {
        let backend = MemoryBackend::new();
        backend.create_user("alice").await.unwrap();
        backend.create_subuser("alice", "bob").await.unwrap();
        let err = backend.create_subuser("alice", "bob").await.unwrap_err();
        assert!(matches!(err, IdentityAdminError::SubuserExists { .. }));
    }
}
