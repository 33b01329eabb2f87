//! Resolution of raw caller parameters into [`GrantParameters`].
//!
//! Requests carry connection parameters as an opaque string map (the shape
//! produced by externally stored secrets). Resolution validates the
//! mandatory fields up front so no backend call is ever attempted with an
//! incomplete parameter set.

use provstack_model::error::{ProvisionError, ProvisionResult};
use provstack_model::ops::RawParameters;
use provstack_model::types::GrantParameters;

/// Key of the backend endpoint in a raw parameter map.
pub const PARAM_ENDPOINT: &str = "endpoint";
/// Key of the backend region.
pub const PARAM_REGION: &str = "region";
/// Key of the admin access key.
pub const PARAM_ACCESS_KEY: &str = "accessKeyID";
/// Key of the admin secret key.
pub const PARAM_SECRET_KEY: &str = "accessSecretKey";
/// Key of the optional parent principal for scoped grants.
pub const PARAM_PARENT_IDENTITY: &str = "parentIdentity";
/// Key of the optional PEM TLS certificate.
pub const PARAM_TLS_CERT: &str = "tlsCert";

/// Resolve a raw parameter map into validated [`GrantParameters`].
///
/// Endpoint, access key, and secret key are mandatory; a missing or empty
/// value fails with `InvalidArgument`. Region falls back to
/// `default_region`; parent identity and TLS material stay optional.
pub fn resolve(raw: &RawParameters, default_region: &str) -> ProvisionResult<GrantParameters> {
    let endpoint = required(raw, PARAM_ENDPOINT)?;
    let access_key = required(raw, PARAM_ACCESS_KEY)?;
    let secret_key = required(raw, PARAM_SECRET_KEY)?;

    let region = raw
        .get(PARAM_REGION)
        .filter(|v| !v.is_empty())
        .cloned()
        .unwrap_or_else(|| default_region.to_owned());

    Ok(GrantParameters {
        endpoint,
        region,
        access_key,
        secret_key,
        parent_identity: optional(raw, PARAM_PARENT_IDENTITY),
        tls_cert: optional(raw, PARAM_TLS_CERT),
    })
}

fn required(raw: &RawParameters, key: &str) -> ProvisionResult<String> {
    raw.get(key)
        .filter(|v| !v.is_empty())
        .cloned()
        .ok_or_else(|| ProvisionError::invalid_argument(format!("missing parameter {key}")))
}

fn optional(raw: &RawParameters, key: &str) -> Option<String> {
    raw.get(key).filter(|v| !v.is_empty()).cloned()
}
