//! Provisioner configuration.
//!
//! Values are loaded from environment variables with sensible defaults; the
//! server binary reads this once at startup and passes it down by value.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Provisioner service configuration.
///
/// # Examples
///
/// ```
/// use provstack_core::config::ProvisionerConfig;
///
/// let config = ProvisionerConfig::default();
/// assert_eq!(config.provisioner_name, "provstack.objectstorage.io");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionerConfig {
    /// Name the driver registers under.
    #[builder(default = String::from("provstack.objectstorage.io"))]
    pub provisioner_name: String,

    /// Bind address for the serving binary.
    #[builder(default = String::from("0.0.0.0:9000"))]
    pub listen: String,

    /// Region reported in issued credentials when the request parameters
    /// name none.
    #[builder(default = String::from("default"))]
    pub default_region: String,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,

    /// Serve against the in-memory backend instead of an injected client
    /// factory. Intended for local development and conformance testing.
    #[builder(default = false)]
    pub local_mode: bool,
}

impl Default for ProvisionerConfig {
    fn default() -> Self {
        Self {
            provisioner_name: String::from("provstack.objectstorage.io"),
            listen: String::from("0.0.0.0:9000"),
            default_region: String::from("default"),
            log_level: String::from("info"),
            local_mode: false,
        }
    }
}

impl ProvisionerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `PROVISIONER_NAME` | `provstack.objectstorage.io` |
    /// | `LISTEN` | `0.0.0.0:9000` |
    /// | `DEFAULT_REGION` | `default` |
    /// | `LOG_LEVEL` | `info` |
    /// | `LOCAL_MODE` | `false` |
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("PROVISIONER_NAME") {
            config.provisioner_name = v;
        }
        if let Ok(v) = std::env::var("LISTEN") {
            config.listen = v;
        }
        if let Ok(v) = std::env::var("DEFAULT_REGION") {
            config.default_region = v;
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Ok(v) = std::env::var("LOCAL_MODE") {
            config.local_mode = parse_bool(&v);
        }

        config
    }
}

/// Parse common boolean spellings (`1`, `true`, `yes`, `on`).
fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_build_with_defaults() {
        let config = ProvisionerConfig::builder().build();
        assert_eq!(config.listen, "0.0.0.0:9000");
        assert!(!config.local_mode);
    }

    #[test]
    fn test_should_parse_bool_spellings() {
        assert!(parse_bool("1"));
        assert!(parse_bool("TRUE"));
        assert!(parse_bool(" yes "));
        assert!(!parse_bool("0"));
        assert!(!parse_bool("off"));
    }
}
