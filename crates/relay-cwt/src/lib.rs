//! # relay-cwt
//!
//! Access token issuance for the relay control plane.
//!
//! This crate provides functionality for:
//! - Building the CWT claims set and COSE protected header
//! - Computing the truncated HMAC-SHA-256 tag over the COSE MAC_structure
//! - Assembling COSE_Mac0, wrapping it in the CWT tag, and encoding it as
//!   unpadded base64url
//! - Formatting document and file scopes
//! - Building the grant returned to clients alongside a token
//!
//! ## Wire Format
//!
//! ```text
//! base64url( #6.61( #6.17( [ bstr({1: 4, 4: kid}),
//!                            {},
//!                            bstr({1: iss, 2: sub, 3: aud, 4: exp, 6: iat, -80201: scope}),
//!                            bstr(tag[8]) ] ) ) )
//! ```
//!
//! | Scope | Shape |
//! |-------|-------|
//! | Document | `doc:<docId>:rw` or `doc:<docId>:r` |
//! | File | `file:<fileHash>:<docId>:rw` or `file:<fileHash>:<docId>:r` |
//!
//! Tokens are only issued here. Relying parties verify them independently
//! with the shared key.

pub mod claims;
pub mod constants;
pub mod cose;
pub mod error;
pub mod grant;
pub mod keys;
pub mod mac;
pub mod scope;
pub mod token;

pub use claims::{build_claims, build_protected_header, ClaimsSet, ProtectedHeader};
pub use cose::CoseMac0;
pub use error::CwtError;
pub use grant::{FileMetadata, ProviderUrls, TokenGrant};
pub use keys::HmacKey;
pub use mac::compute_mac;
pub use scope::{compute_scope, Authorization, Resource};
pub use token::{
    generate_doc_token, generate_file_token, generate_token, generate_token_at, IssuedToken,
    TokenIssuer, TokenRequest,
};
