//! End-to-end tests for the Provstack provisioning façade.
//!
//! Every test drives [`ProvisioningService`] over the in-memory backend
//! pair, exactly as a production deployment drives it over real clients.
//! State is inspected through the shared [`MemoryBackend`] handle the
//! factory exposes.

use std::sync::{Arc, Once};

use provstack_core::client::ObjectStoreClient;
use provstack_core::mem::{MemoryBackend, MemoryClientFactory};
use provstack_core::{ProvisionerConfig, ProvisioningService};
use provstack_model::ops::{CreateBucketRequest, GrantAccessRequest, RawParameters};
use provstack_model::policy::PolicyDocument;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Connection parameters accepted by the in-memory backend.
#[must_use]
pub fn test_parameters() -> RawParameters {
    [
        ("endpoint", "http://rgw.local:7480"),
        ("region", "us-east-1"),
        ("accessKeyID", "admin"),
        ("accessSecretKey", "admin-secret"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_owned(), v.to_owned()))
    .collect()
}

/// As [`test_parameters`], with a parent identity for scoped grants.
#[must_use]
pub fn test_parameters_with_parent(parent: &str) -> RawParameters {
    let mut params = test_parameters();
    params.insert("parentIdentity".to_owned(), parent.to_owned());
    params
}

/// Build a façade over a fresh in-memory backend, returning both.
#[must_use]
pub fn test_service() -> (Arc<MemoryBackend>, ProvisioningService) {
    init_tracing();
    let factory = Arc::new(MemoryClientFactory::new());
    let backend = factory.backend();
    let service = ProvisioningService::new(ProvisionerConfig::default(), factory);
    (backend, service)
}

/// Generate a unique bucket name for a test.
#[must_use]
pub fn test_bucket_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

/// Create a bucket through the façade, returning its id.
pub async fn create_test_bucket(service: &ProvisioningService, prefix: &str) -> String {
    let name = test_bucket_name(prefix);
    let resp = service
        .create_bucket(CreateBucketRequest {
            name: name.clone(),
            parameters: test_parameters(),
        })
        .await
        .expect("create_bucket");
    assert_eq!(resp.bucket_id, name);
    name
}

/// Grant `account` access to `bucket` through the façade.
pub async fn grant_test_access(
    service: &ProvisioningService,
    bucket: &str,
    account: &str,
) -> provstack_model::ops::GrantAccessResponse {
    service
        .grant_access(GrantAccessRequest {
            bucket_id: bucket.to_owned(),
            account_name: account.to_owned(),
            parameters: test_parameters(),
        })
        .await
        .expect("grant_access")
}

/// Read the bucket policy straight off the backend.
pub async fn bucket_policy(backend: &MemoryBackend, bucket: &str) -> PolicyDocument {
    backend
        .get_bucket_policy(bucket)
        .await
        .expect("bucket policy")
}

mod test_bucket;
mod test_grant;
mod test_revoke;
mod test_validation;
