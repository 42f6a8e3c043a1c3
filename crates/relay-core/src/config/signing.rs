//! Token signing configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::{env_lookup, ConfigError};

/// Issuer written into tokens when none is configured.
pub const DEFAULT_ISSUER: &str = "relay-control-plane";

/// Key id used when none is configured.
pub const DEFAULT_KEY_ID: &str = "default";

/// Environment variable holding the base64 HMAC key.
pub const KEY_ENV: &str = "RELAY_HMAC_KEY";

/// Environment variable overriding the key id.
pub const KEY_ID_ENV: &str = "RELAY_HMAC_KEY_ID";

/// Environment variable overriding the issuer.
pub const ISSUER_ENV: &str = "RELAY_ISSUER";

/// Configuration for the token signing identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningConfig {
    /// Environment variable containing the key (standard base64).
    #[serde(default = "default_key_env")]
    pub key_env: Option<String>,

    /// Path to a file containing the key (standard base64).
    #[serde(default)]
    pub key_file: Option<PathBuf>,

    /// Key identifier placed in the protected header.
    #[serde(default)]
    pub key_id: Option<String>,

    /// Issuer claim.
    #[serde(default)]
    pub issuer: Option<String>,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            key_env: default_key_env(),
            key_file: None,
            key_id: None,
            issuer: None,
        }
    }
}

impl SigningConfig {
    /// Resolve the base64 key text from the environment or the key file.
    pub fn resolve_key(&self) -> Result<String, ConfigError> {
        self.resolve_key_with(env_lookup)
    }

    /// Like [`resolve_key`](Self::resolve_key) with a custom variable lookup.
    pub fn resolve_key_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<String, ConfigError> {
        // Try environment variable first
        if let Some(key) = self.key_env.as_deref().and_then(&lookup) {
            return Ok(key);
        }

        if let Some(path) = &self.key_file {
            let key = std::fs::read_to_string(path)?;
            return Ok(key.trim().to_string());
        }

        Err(ConfigError::MissingKey {
            env: self.key_env.clone().unwrap_or_else(|| KEY_ENV.to_string()),
        })
    }

    /// Resolve the key id: environment, then config, then [`DEFAULT_KEY_ID`].
    pub fn resolve_key_id(&self) -> String {
        self.resolve_key_id_with(env_lookup)
    }

    pub fn resolve_key_id_with(&self, lookup: impl Fn(&str) -> Option<String>) -> String {
        lookup(KEY_ID_ENV)
            .or_else(|| self.key_id.clone())
            .unwrap_or_else(|| DEFAULT_KEY_ID.to_string())
    }

    /// Resolve the issuer: environment, then config, then [`DEFAULT_ISSUER`].
    pub fn resolve_issuer(&self) -> String {
        self.resolve_issuer_with(env_lookup)
    }

    pub fn resolve_issuer_with(&self, lookup: impl Fn(&str) -> Option<String>) -> String {
        lookup(ISSUER_ENV)
            .or_else(|| self.issuer.clone())
            .unwrap_or_else(|| DEFAULT_ISSUER.to_string())
    }
}

fn default_key_env() -> Option<String> {
    Some(KEY_ENV.to_string())
}
