//! Access-grant engine and bucket lifecycle managers for Provstack.
//!
//! This crate holds everything between the RPC surface and the backend
//! wire clients:
//!
//! ```text
//! ProvisioningService (façade, request validation)
//!        |
//!        +---> BucketLifecycleManager (create/delete)
//!        |
//!        +---> AccessGrantManager
//!                 |-- IdentityProvisioner (users/subusers, key lookup)
//!                 |-- PolicyDocument merge (provstack-model)
//!                 `-- ObjectStoreClient (policy read-modify-write)
//! ```
//!
//! Backend clients are strategy interfaces injected through a
//! [`client::ClientFactory`]; [`mem::MemoryBackend`] implements both for
//! tests and local mode. The service is stateless and every multi-step
//! operation is safe to re-invoke from scratch.

pub mod bucket;
pub mod client;
pub mod config;
pub mod grant;
pub mod identity;
pub mod mem;
pub mod params;
pub mod service;

pub use bucket::BucketLifecycleManager;
pub use config::ProvisionerConfig;
pub use grant::{AccessGrantManager, GrantedAccess};
pub use identity::{IdentityProvisioner, ProvisionedIdentity};
pub use service::{BucketMetadataStore, NullMetadataStore, ProvisioningService};
