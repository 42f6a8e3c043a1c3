//! Wire-format constants for relay tokens.
//!
//! These values are shared with every verifier of relay tokens and must not
//! change without a coordinated rollout.

/// CBOR tag for a CBOR Web Token (RFC 8392).
pub const CWT_TAG: u64 = 61;

/// CBOR tag for an untagged COSE_Mac0 message (RFC 9052).
pub const COSE_MAC0_TAG: u64 = 17;

/// Context string of the MAC_structure for COSE_Mac0.
pub const MAC0_CONTEXT: &str = "MAC0";

/// Length of the truncated HMAC tag in bytes (HMAC 256/64).
pub const MAC_TAG_LEN: usize = 8;

pub use relay_core::config::signing::{DEFAULT_ISSUER, DEFAULT_KEY_ID};

/// COSE header labels.
pub mod header_labels {
    /// Algorithm identifier.
    pub const ALG: i64 = 1;
    /// Key identifier.
    pub const KID: i64 = 4;
}

/// COSE algorithm identifiers.
pub mod cose_algs {
    /// HMAC w/ SHA-256 truncated to 64 bits.
    pub const HMAC_256_64: i64 = 4;
}

/// CWT claim keys, in the order they are written.
pub mod claim_keys {
    /// Issuer (iss).
    pub const ISS: i64 = 1;
    /// Subject (sub).
    pub const SUB: i64 = 2;
    /// Audience (aud).
    pub const AUD: i64 = 3;
    /// Expiration time (exp).
    pub const EXP: i64 = 4;
    /// Issued at (iat).
    pub const IAT: i64 = 6;
    /// Private relay scope claim.
    pub const SCOPE: i64 = -80201;
}
