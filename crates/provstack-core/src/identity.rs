//! Idempotent identity provisioning and removal.
//!
//! Creates or looks up a top-level principal, or a scoped sub-identity
//! under a parent principal, and returns the key pair the caller will be
//! handed as credentials. "Already exists" on either path is recovered
//! locally; every other backend failure is classified here, once, into the
//! canonical taxonomy.

use std::sync::Arc;

use provstack_model::error::{ProvisionError, ProvisionResult};
use provstack_model::types::{split_sub_identity, sub_identity_id};
use tracing::{debug, warn};

use crate::client::{IdentityAdminClient, IdentityAdminError, UserInfo};

/// A provisioned identity plus the key pair issued for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedIdentity {
    /// Full identifier: `name` or `parent:name`.
    pub id: String,
    /// The account the bucket policy principal must reference. Equals the
    /// parent for scoped sub-identities, since the backend evaluates access
    /// control at the account level.
    pub principal: String,
    /// Access key identifier.
    pub access_key: String,
    /// Secret key.
    pub secret_key: String,
}

/// Creates, looks up, and removes identities against the admin backend.
pub struct IdentityProvisioner {
    admin: Arc<dyn IdentityAdminClient>,
}

impl std::fmt::Debug for IdentityProvisioner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityProvisioner").finish_non_exhaustive()
    }
}

impl IdentityProvisioner {
    /// Create a provisioner over the given admin client.
    #[must_use]
    pub fn new(admin: Arc<dyn IdentityAdminClient>) -> Self {
        Self { admin }
    }

    /// Provision (or look up) an identity and return its key pair.
    ///
    /// With no parent, creates a top-level principal named `name`; when the
    /// backend reports it already exists, the existing record is fetched
    /// instead, so creation is idempotent from the caller's perspective.
    /// With a parent, creates subuser `name` under `parent` and reads the
    /// key material off the parent's key list (the only place the backend
    /// exposes it), matching on the `parent:name` owner field.
    pub async fn provision(
        &self,
        name: &str,
        parent: Option<&str>,
    ) -> ProvisionResult<ProvisionedIdentity> {
        match parent {
            None => self.provision_principal(name).await,
            Some(parent) => self.provision_sub_identity(parent, name).await,
        }
    }

    async fn provision_principal(&self, name: &str) -> ProvisionResult<ProvisionedIdentity> {
        let user = match self.admin.create_user(name).await {
            Ok(user) => user,
            Err(IdentityAdminError::UserExists { .. }) => {
                debug!(user = %name, "user exists, fetching existing record");
                self.admin
                    .get_user(name)
                    .await
                    .map_err(translate_admin_error)?
            }
            Err(err) => return Err(translate_admin_error(err)),
        };

        let key = primary_key(&user)?;
        Ok(ProvisionedIdentity {
            id: user.user_id.clone(),
            principal: user.user_id,
            access_key: key.0,
            secret_key: key.1,
        })
    }

    async fn provision_sub_identity(
        &self,
        parent: &str,
        name: &str,
    ) -> ProvisionResult<ProvisionedIdentity> {
        match self.admin.create_subuser(parent, name).await {
            Ok(()) => {}
            // Re-invocation of an earlier grant; the key already exists.
            Err(IdentityAdminError::SubuserExists { .. } | IdentityAdminError::UserExists { .. }) => {
                debug!(parent = %parent, subuser = %name, "subuser exists, continuing");
            }
            Err(err) => return Err(translate_admin_error(err)),
        }

        // Subuser key material is only retrievable through the parent's
        // key list.
        let parent_user = self
            .admin
            .get_user(parent)
            .await
            .map_err(translate_admin_error)?;

        let subuser_id = sub_identity_id(parent, name);
        let Some(key) = parent_user.keys.iter().find(|k| k.user == subuser_id) else {
            // Create-or-exists succeeded but the backend shows no key:
            // internal consistency failure, not retryable.
            warn!(subuser = %subuser_id, "no key found on parent after subuser creation");
            return Err(ProvisionError::not_found(format!(
                "no key for subuser {subuser_id} on parent {parent}"
            )));
        };

        Ok(ProvisionedIdentity {
            id: subuser_id,
            principal: parent.to_owned(),
            access_key: key.access_key.clone(),
            secret_key: key.secret_key.clone(),
        })
    }

    /// Remove an identity by its full identifier.
    ///
    /// `parent:name` identifiers remove the subuser under the parent;
    /// anything else removes the top-level user. "Not found" is swallowed:
    /// removal is idempotent and a repeated revoke succeeds.
    pub async fn remove(&self, account_id: &str) -> ProvisionResult<()> {
        let result = match split_sub_identity(account_id) {
            Some((parent, name)) => self.admin.remove_subuser(parent, name).await,
            None => self.admin.remove_user(account_id).await,
        };

        match result {
            Ok(()) => Ok(()),
            Err(IdentityAdminError::NoSuchUser { .. }) => {
                debug!(account = %account_id, "identity already removed");
                Ok(())
            }
            Err(err) => Err(translate_admin_error(err)),
        }
    }
}

/// The primary key pair of a user record.
fn primary_key(user: &UserInfo) -> ProvisionResult<(String, String)> {
    user.keys
        .iter()
        .find(|k| k.user == user.user_id)
        .or_else(|| user.keys.first())
        .map(|k| (k.access_key.clone(), k.secret_key.clone()))
        .ok_or_else(|| {
            ProvisionError::Internal(anyhow::anyhow!(
                "user {} has no key material",
                user.user_id
            ))
        })
}

/// Classify an admin backend error into the canonical taxonomy.
///
/// The already-exists variants never reach this point; they are recovered
/// locally by the provisioning paths above.
fn translate_admin_error(err: IdentityAdminError) -> ProvisionError {
    match err {
        IdentityAdminError::NoSuchUser { user_id } => {
            ProvisionError::not_found(format!("user {user_id} does not exist"))
        }
        IdentityAdminError::UserExists { user_id } => {
            ProvisionError::already_exists(format!("user {user_id}"))
        }
        IdentityAdminError::SubuserExists { subuser_id } => {
            ProvisionError::already_exists(format!("subuser {subuser_id}"))
        }
        IdentityAdminError::AccessDenied => {
            ProvisionError::Internal(anyhow::anyhow!("identity backend rejected credentials"))
        }
        IdentityAdminError::Transport(err) => {
            ProvisionError::Internal(err.context("identity backend call failed"))
        }
    }
}
