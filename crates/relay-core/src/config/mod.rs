//! Configuration types for the relay control plane.
//!
//! Configuration is loaded from a single YAML file (relay.yaml). Every
//! section is optional; environment variables override individual values
//! so deployments can inject secrets without touching the file.
//!
//! # Environment
//!
//! - **RELAY_HMAC_KEY**: base64 HMAC key (name configurable via `signing.key_env`)
//! - **RELAY_HMAC_KEY_ID**: key id placed in token headers
//! - **RELAY_ISSUER**: issuer claim
//! - **RELAY_WS_SCHEME**: WebSocket scheme of provider URLs (`wss` or `ws`)

pub mod provider;
pub mod signing;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use provider::ProviderConfig;
pub use signing::SigningConfig;

/// Complete relay configuration loaded from file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RelayConfig {
    /// Token signing identity.
    #[serde(default)]
    pub signing: SigningConfig,

    /// Token issuance settings.
    #[serde(default)]
    pub token: TokenConfig,

    /// Relay provider endpoint settings.
    #[serde(default)]
    pub provider: ProviderConfig,
}

/// Token issuance settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Lifetime of issued tokens in seconds.
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl_seconds(),
        }
    }
}

fn default_ttl_seconds() -> u64 {
    3600
}

/// Read an environment variable, treating empty values as unset.
pub(crate) fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HMAC key not configured (set {env} or signing.key_file)")]
    MissingKey { env: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl RelayConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that cannot be expressed in the YAML schema.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(scheme) = &self.provider.ws_scheme {
            if scheme != "ws" && scheme != "wss" {
                return Err(ConfigError::Config(format!(
                    "provider.ws_scheme must be 'ws' or 'wss', got '{scheme}'"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = RelayConfig::from_yaml("{}").unwrap();
        assert_eq!(config.token.ttl_seconds, 3600);
        assert_eq!(config.signing.key_env.as_deref(), Some("RELAY_HMAC_KEY"));
        assert!(config.signing.key_file.is_none());
        assert!(config.provider.ws_scheme.is_none());
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
signing:
  key_env: MY_KEY
  key_file: /etc/relay/hmac.key
  key_id: k-2024
  issuer: my-issuer
token:
  ttl_seconds: 600
provider:
  ws_scheme: ws
"#;
        let config = RelayConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.signing.key_env.as_deref(), Some("MY_KEY"));
        assert_eq!(config.signing.key_id.as_deref(), Some("k-2024"));
        assert_eq!(config.signing.issuer.as_deref(), Some("my-issuer"));
        assert_eq!(config.token.ttl_seconds, 600);
        assert_eq!(config.provider.ws_scheme.as_deref(), Some("ws"));
    }

    #[test]
    fn test_invalid_ws_scheme_rejected() {
        let err = RelayConfig::from_yaml("provider:\n  ws_scheme: https\n").unwrap_err();
        assert!(matches!(err, ConfigError::Config(_)));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = RelayConfig::from_yaml("token: [").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "token:\n  ttl_seconds: 60").unwrap();

        let config = RelayConfig::from_file(file.path()).unwrap();
        assert_eq!(config.token.ttl_seconds, 60);
    }
}
