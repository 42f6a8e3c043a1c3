//! Claims set and protected header records.
//!
//! Both records have a fixed field list and encode themselves as
//! integer-keyed CBOR maps. Entries are written in ascending key order so
//! the byte layout never depends on map iteration order.

use minicbor::encode::{Error as EncodeError, Write};
use minicbor::{Encode, Encoder};

use crate::constants::{claim_keys, cose_algs, header_labels};
use crate::error::CwtError;

/// Claims carried in the token payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimsSet {
    /// Issuer (key 1).
    pub issuer: String,
    /// Subject, the user id (key 2).
    pub subject: String,
    /// Audience, the provider URL (key 3).
    pub audience: String,
    /// Expiry in seconds since the epoch (key 4).
    pub expiry: u64,
    /// Issued-at in seconds since the epoch (key 6).
    pub issued_at: u64,
    /// Resource and permission string (key -80201).
    pub scope: String,
}

/// Assemble a claims set.
///
/// No validation is performed: empty text is accepted and `expiry` may be
/// earlier than `issued_at`.
pub fn build_claims(
    issuer: &str,
    subject: &str,
    audience: &str,
    issued_at: u64,
    expiry: u64,
    scope: &str,
) -> ClaimsSet {
    ClaimsSet {
        issuer: issuer.to_string(),
        subject: subject.to_string(),
        audience: audience.to_string(),
        expiry,
        issued_at,
        scope: scope.to_string(),
    }
}

impl ClaimsSet {
    /// Encode as a CBOR map.
    pub fn to_cbor(&self) -> Result<Vec<u8>, CwtError> {
        minicbor::to_vec(self).map_err(|e| CwtError::encoding("claims", e))
    }
}

impl<C> Encode<C> for ClaimsSet {
    fn encode<W: Write>(
        &self,
        e: &mut Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), EncodeError<W::Error>> {
        e.map(6)?;
        e.i64(claim_keys::ISS)?.str(&self.issuer)?;
        e.i64(claim_keys::SUB)?.str(&self.subject)?;
        e.i64(claim_keys::AUD)?.str(&self.audience)?;
        e.i64(claim_keys::EXP)?.u64(self.expiry)?;
        e.i64(claim_keys::IAT)?.u64(self.issued_at)?;
        e.i64(claim_keys::SCOPE)?.str(&self.scope)?;
        Ok(())
    }
}

/// COSE protected header: algorithm and key id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedHeader {
    /// Always [`cose_algs::HMAC_256_64`].
    pub alg: i64,
    /// Raw UTF-8 bytes of the key identifier.
    pub kid: Vec<u8>,
}

/// Build the protected header for `key_id`.
pub fn build_protected_header(key_id: &str) -> ProtectedHeader {
    ProtectedHeader {
        alg: cose_algs::HMAC_256_64,
        kid: key_id.as_bytes().to_vec(),
    }
}

impl ProtectedHeader {
    /// Encode as a CBOR map.
    pub fn to_cbor(&self) -> Result<Vec<u8>, CwtError> {
        minicbor::to_vec(self).map_err(|e| CwtError::encoding("protected header", e))
    }
}

impl<C> Encode<C> for ProtectedHeader {
    fn encode<W: Write>(
        &self,
        e: &mut Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), EncodeError<W::Error>> {
        e.map(2)?;
        e.i64(header_labels::ALG)?.i64(self.alg)?;
        e.i64(header_labels::KID)?.bytes(&self.kid)?;
        Ok(())
    }
}
