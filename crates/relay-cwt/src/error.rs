//! Error types for the CWT crate.

use relay_core::ConfigError;
use thiserror::Error;

/// Errors that can occur while issuing a token.
#[derive(Debug, Error)]
pub enum CwtError {
    /// A structural value failed to serialize to CBOR.
    #[error("failed to encode {context}: {message}")]
    Encoding {
        /// Which structure was being encoded (e.g. "claims", "COSE_Mac0").
        context: &'static str,
        message: String,
    },

    /// Key material could not be decoded or was rejected by the MAC primitive.
    #[error("invalid HMAC key: {0}")]
    InvalidKey(String),

    /// Signing configuration could not be resolved.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The provider URL could not be turned into WebSocket/HTTP endpoints.
    #[error("invalid provider URL '{url}': {message}")]
    InvalidProviderUrl { url: String, message: String },
}

impl CwtError {
    pub(crate) fn encoding(context: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Encoding {
            context,
            message: err.to_string(),
        }
    }
}
