//! Relay provider endpoint configuration.

use serde::{Deserialize, Serialize};

use super::env_lookup;

/// WebSocket scheme used when none is configured.
pub const DEFAULT_WS_SCHEME: &str = "wss";

/// Environment variable overriding the WebSocket scheme.
pub const WS_SCHEME_ENV: &str = "RELAY_WS_SCHEME";

/// How provider URLs are turned into client endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderConfig {
    /// WebSocket scheme (`wss` or `ws`). `ws` also downgrades HTTP URLs to `http`.
    #[serde(default)]
    pub ws_scheme: Option<String>,
}

impl ProviderConfig {
    /// Resolve the scheme: environment, then config, then [`DEFAULT_WS_SCHEME`].
    pub fn resolve_ws_scheme(&self) -> String {
        self.resolve_ws_scheme_with(env_lookup)
    }

    pub fn resolve_ws_scheme_with(&self, lookup: impl Fn(&str) -> Option<String>) -> String {
        lookup(WS_SCHEME_ENV)
            .or_else(|| self.ws_scheme.clone())
            .unwrap_or_else(|| DEFAULT_WS_SCHEME.to_string())
    }
}
