//! Bucket lifecycle: create and delete pass-through with error
//! classification.

use std::sync::Arc;

use provstack_model::error::{ProvisionError, ProvisionResult};
use tracing::debug;

use crate::client::{ObjectStoreClient, ObjectStoreError};

/// Creates and deletes buckets against the object-storage backend.
pub struct BucketLifecycleManager {
    store: Arc<dyn ObjectStoreClient>,
}

impl std::fmt::Debug for BucketLifecycleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BucketLifecycleManager").finish_non_exhaustive()
    }
}

impl BucketLifecycleManager {
    /// Create a manager over the given object-storage client.
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStoreClient>) -> Self {
        Self { store }
    }

    /// Create a bucket, returning its backend identifier (the name).
    ///
    /// Both already-exists variants (owned by you, owned by another)
    /// collapse into [`ProvisionError::AlreadyExists`]; the caller's retry
    /// loop must treat that as terminal. Anything else backend-side is
    /// `Internal` and retryable.
    pub async fn create(&self, name: &str) -> ProvisionResult<String> {
        match self.store.create_bucket(name).await {
            Ok(()) => {
                debug!(bucket = %name, "bucket created");
                Ok(name.to_owned())
            }
            Err(
                ObjectStoreError::BucketAlreadyExists { bucket }
                | ObjectStoreError::BucketAlreadyOwnedByYou { bucket },
            ) => Err(ProvisionError::already_exists(format!("bucket {bucket}"))),
            Err(err) => Err(internal(err, "create bucket failed")),
        }
    }

    /// Delete a bucket by its identifier.
    ///
    /// "Not empty" and "not found" surface as their terminal kinds; the
    /// backend treats repeated deletion of an absent bucket as `NotFound`,
    /// which the external retry loop may interpret as done.
    pub async fn delete(&self, bucket_id: &str) -> ProvisionResult<()> {
        match self.store.delete_bucket(bucket_id).await {
            Ok(()) => {
                debug!(bucket = %bucket_id, "bucket deleted");
                Ok(())
            }
            Err(ObjectStoreError::BucketNotEmpty { bucket }) => Err(
                ProvisionError::failed_precondition(format!("bucket {bucket} is not empty")),
            ),
            Err(ObjectStoreError::NoSuchBucket { bucket }) => Err(ProvisionError::not_found(
                format!("bucket {bucket} does not exist"),
            )),
            Err(err) => Err(internal(err, "delete bucket failed")),
        }
    }
}

fn internal(err: ObjectStoreError, context: &'static str) -> ProvisionError {
    ProvisionError::Internal(anyhow::Error::new(err).context(context))
}
