//! CLI command implementations for the relay control plane.

pub mod keys;
pub mod token;
