// Configuration types shared across all relay crates
pub mod config;

// Re-export commonly used config types for convenience
pub use config::{ConfigError, ProviderConfig, RelayConfig, SigningConfig, TokenConfig};
