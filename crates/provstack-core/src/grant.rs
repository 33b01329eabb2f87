//! The access-grant/revoke engine.
//!
//! A grant coordinates both backends with no cross-backend transaction:
//! fetch the bucket policy, provision or look up the identity, merge an
//! allow statement keyed by the identity's id, write the policy back, and
//! hand the caller the identity's credentials. Every step is idempotent, so
//! an `Internal` failure anywhere in the sequence is safe to re-invoke from
//! scratch.
//!
//! The policy read-modify-write carries no concurrency token: two
//! concurrent grants against one bucket race and the last full-document
//! write wins. Callers needing strict consistency must serialize grants per
//! bucket externally.

use std::sync::Arc;

use provstack_model::error::{ProvisionError, ProvisionResult};
use provstack_model::policy::{PolicyDocument, Statement};
use provstack_model::types::{Credential, CredentialSet, GrantParameters, PROVIDER_S3};
use tracing::{debug, info};

use crate::client::{IdentityAdminClient, ObjectStoreClient, ObjectStoreError};
use crate::identity::IdentityProvisioner;

/// Result of a successful grant: the identity and its credential set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantedAccess {
    /// Identifier of the granted identity (`name` or `parent:name`).
    pub account_id: String,
    /// Credentials keyed by provider tag.
    pub credentials: CredentialSet,
}

/// Orchestrates identity provisioning and policy merging for one
/// parameter set.
pub struct AccessGrantManager {
    store: Arc<dyn ObjectStoreClient>,
    identities: IdentityProvisioner,
    params: GrantParameters,
}

impl std::fmt::Debug for AccessGrantManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGrantManager")
            .field("endpoint", &self.params.endpoint)
            .finish_non_exhaustive()
    }
}

impl AccessGrantManager {
    /// Create a manager over the given backend clients and resolved
    /// parameters.
    #[must_use]
    pub fn new(
        store: Arc<dyn ObjectStoreClient>,
        admin: Arc<dyn IdentityAdminClient>,
        params: GrantParameters,
    ) -> Self {
        Self {
            store,
            identities: IdentityProvisioner::new(admin),
            params,
        }
    }

    /// Grant `account_name` access to `bucket_id` and issue credentials.
    ///
    /// Strictly sequential; no step runs before the previous one succeeds.
    /// A failure after the identity was provisioned leaves it in place with
    /// no compensating rollback: the error is `Internal` and a retry
    /// re-derives the same end state.
    pub async fn grant(&self, bucket_id: &str, account_name: &str) -> ProvisionResult<GrantedAccess> {
        // 1. Fetch the current policy; a missing policy is an empty
        //    document, a missing bucket is a fail-fast NotFound.
        let policy = match self.store.get_bucket_policy(bucket_id).await {
            Ok(policy) => policy,
            Err(ObjectStoreError::NoSuchBucketPolicy { .. }) => PolicyDocument::new(),
            Err(ObjectStoreError::NoSuchBucket { bucket }) => {
                return Err(ProvisionError::not_found(format!(
                    "bucket {bucket} does not exist"
                )));
            }
            Err(err) => {
                return Err(ProvisionError::Internal(
                    anyhow::Error::new(err).context("fetching bucket policy failed"),
                ));
            }
        };

        // 2. Provision or look up the identity.
        let parent = self.params.parent_identity.as_deref();
        let identity = self.identities.provision(account_name, parent).await?;

        // 3-4. Merge the allow statement, keyed by the identity's id. The
        //      policy principal is the account identity (the parent for a
        //      sub-identity), since the backend evaluates access control at
        //      the account level.
        let statement = Statement::for_bucket(&identity.id, &identity.principal, bucket_id);
        let policy = policy.merge(statement);

        // 5. Write the document back in full.
        self.store
            .put_bucket_policy(bucket_id, &policy)
            .await
            .map_err(|err| {
                ProvisionError::Internal(
                    anyhow::Error::new(err).context("writing bucket policy failed"),
                )
            })?;

        info!(bucket = %bucket_id, account = %identity.id, "access granted");

        // 6. Package the credentials under the provider tag.
        let mut credentials = CredentialSet::new();
        credentials.insert(
            PROVIDER_S3.to_owned(),
            Credential {
                endpoint: self.params.endpoint.clone(),
                region: self.params.region.clone(),
                access_key_id: identity.access_key,
                access_secret_key: identity.secret_key,
            },
        );

        Ok(GrantedAccess {
            account_id: identity.id,
            credentials,
        })
    }

    /// Revoke a previously granted identity.
    ///
    /// Removes the identity (subuser or top-level, decided by the
    /// `parent:name` separator convention). The bucket policy statement is
    /// deliberately left in place; cleanup of stale allow entries is
    /// deferred to the backend operator.
    pub async fn revoke(&self, bucket_id: &str, account_id: &str) -> ProvisionResult<()> {
        self.identities.remove(account_id).await?;
        debug!(bucket = %bucket_id, account = %account_id, "access revoked");
        Ok(())
    }
}
