//! The stateless provisioning façade.
//!
//! [`ProvisioningService`] exposes the four operations the RPC layer maps
//! onto: create bucket, delete bucket, grant access, revoke access. It owns
//! no state of its own; each call resolves parameters, builds the backend
//! client pair through the injected [`ClientFactory`], and delegates to the
//! managers. Requests with missing identifiers are rejected before any
//! backend call.

use std::sync::Arc;

use async_trait::async_trait;
use provstack_model::error::{ProvisionError, ProvisionResult};
use provstack_model::ops::{
    CreateBucketRequest, CreateBucketResponse, DeleteBucketRequest, DriverInfo,
    GrantAccessRequest, GrantAccessResponse, RawParameters, RevokeAccessRequest,
};
use provstack_model::types::GrantParameters;
use tracing::info;

use crate::bucket::BucketLifecycleManager;
use crate::client::ClientFactory;
use crate::config::ProvisionerConfig;
use crate::grant::AccessGrantManager;
use crate::params;

/// Source of stored connection parameters for requests that carry none
/// inline (delete and revoke issued long after creation).
#[async_trait]
pub trait BucketMetadataStore: Send + Sync {
    /// Look up the stored parameters for a bucket.
    async fn get(&self, bucket_id: &str) -> Option<RawParameters>;
}

/// A metadata store that knows nothing; every request must carry inline
/// parameters.
#[derive(Debug, Default)]
pub struct NullMetadataStore;

#[async_trait]
impl BucketMetadataStore for NullMetadataStore {
    async fn get(&self, _bucket_id: &str) -> Option<RawParameters> {
        None
    }
}

/// The RPC-facing provisioning façade.
pub struct ProvisioningService {
    config: ProvisionerConfig,
    factory: Arc<dyn ClientFactory>,
    metadata: Arc<dyn BucketMetadataStore>,
}

impl std::fmt::Debug for ProvisioningService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProvisioningService")
            .field("provisioner_name", &self.config.provisioner_name)
            .finish_non_exhaustive()
    }
}

impl ProvisioningService {
    /// Create a service over a client factory, with no metadata store.
    #[must_use]
    pub fn new(config: ProvisionerConfig, factory: Arc<dyn ClientFactory>) -> Self {
        Self {
            config,
            factory,
            metadata: Arc::new(NullMetadataStore),
        }
    }

    /// Replace the metadata store consulted by parameterless delete/revoke
    /// requests.
    #[must_use]
    pub fn with_metadata_store(mut self, metadata: Arc<dyn BucketMetadataStore>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Report the driver identity.
    pub fn driver_info(&self) -> ProvisionResult<DriverInfo> {
        if self.config.provisioner_name.is_empty() {
            return Err(ProvisionError::invalid_argument("provisioner name is empty"));
        }
        Ok(DriverInfo {
            name: self.config.provisioner_name.clone(),
        })
    }

    /// Create a bucket.
    pub async fn create_bucket(
        &self,
        req: CreateBucketRequest,
    ) -> ProvisionResult<CreateBucketResponse> {
        if req.name.is_empty() {
            return Err(ProvisionError::invalid_argument("bucket name is empty"));
        }

        let params = self.resolve(&req.name, &req.parameters).await?;
        let (store, _) = self.build_clients(&params)?;

        let bucket_id = BucketLifecycleManager::new(store).create(&req.name).await?;
        info!(bucket = %bucket_id, "bucket provisioned");
        Ok(CreateBucketResponse { bucket_id })
    }

    /// Delete a bucket.
    pub async fn delete_bucket(&self, req: DeleteBucketRequest) -> ProvisionResult<()> {
        if req.bucket_id.is_empty() {
            return Err(ProvisionError::invalid_argument("bucket id is empty"));
        }

        let params = self.resolve(&req.bucket_id, &req.parameters).await?;
        let (store, _) = self.build_clients(&params)?;

        BucketLifecycleManager::new(store).delete(&req.bucket_id).await
    }

    /// Grant a principal access to a bucket and issue credentials.
    pub async fn grant_access(
        &self,
        req: GrantAccessRequest,
    ) -> ProvisionResult<GrantAccessResponse> {
        if req.bucket_id.is_empty() {
            return Err(ProvisionError::invalid_argument("bucket id is empty"));
        }
        if req.account_name.is_empty() {
            return Err(ProvisionError::invalid_argument("account name is empty"));
        }

        let params = self.resolve(&req.bucket_id, &req.parameters).await?;
        let (store, admin) = self.build_clients(&params)?;

        let granted = AccessGrantManager::new(store, admin, params)
            .grant(&req.bucket_id, &req.account_name)
            .await?;

        Ok(GrantAccessResponse {
            account_id: granted.account_id,
            credentials: granted.credentials,
        })
    }

    /// Revoke a previously granted identity. Not-found on removal is
    /// swallowed as success.
    pub async fn revoke_access(&self, req: RevokeAccessRequest) -> ProvisionResult<()> {
        if req.bucket_id.is_empty() {
            return Err(ProvisionError::invalid_argument("bucket id is empty"));
        }
        if req.account_id.is_empty() {
            return Err(ProvisionError::invalid_argument("account id is empty"));
        }

        let params = self.resolve(&req.bucket_id, &req.parameters).await?;
        let (store, admin) = self.build_clients(&params)?;

        AccessGrantManager::new(store, admin, params)
            .revoke(&req.bucket_id, &req.account_id)
            .await
    }

    /// Resolve inline parameters, falling back to the metadata store when
    /// the request carries none.
    async fn resolve(
        &self,
        bucket_id: &str,
        inline: &RawParameters,
    ) -> ProvisionResult<GrantParameters> {
        let stored;
        let raw = if inline.is_empty() {
            stored = self.metadata.get(bucket_id).await.ok_or_else(|| {
                ProvisionError::invalid_argument(format!(
                    "no parameters supplied and none stored for bucket {bucket_id}"
                ))
            })?;
            &stored
        } else {
            inline
        };

        params::resolve(raw, &self.config.default_region)
    }

    fn build_clients(
        &self,
        params: &GrantParameters,
    ) -> ProvisionResult<(
        Arc<dyn crate::client::ObjectStoreClient>,
        Arc<dyn crate::client::IdentityAdminClient>,
    )> {
        self.factory
            .build(params)
            .map_err(|err| ProvisionError::Internal(err.context("building backend clients")))
    }
}
