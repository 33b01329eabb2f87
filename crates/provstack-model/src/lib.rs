//! Data model for the Provstack bucket provisioning adapter.
//!
//! This crate is the dependency-free leaf of the workspace. It defines the
//! bucket policy document and its merge semantics, the flat request/response
//! records for the four provisioning operations, the credential and
//! parameter types exchanged with callers, and the canonical error taxonomy
//! every backend failure is classified into.
//!
//! Nothing in this crate performs I/O; persistence of policy documents and
//! identities is entirely the concern of `provstack-core` and the backends
//! behind it.

pub mod error;
pub mod ops;
pub mod policy;
pub mod types;

pub use error::{ErrorKind, ProvisionError, ProvisionResult};
pub use policy::{ALLOWED_ACTIONS, Effect, PolicyDocument, Principal, Statement};
pub use types::{
    Credential, CredentialSet, GrantParameters, PROVIDER_S3, split_sub_identity, sub_identity_id,
};
