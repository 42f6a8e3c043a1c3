//! MAC computation over the COSE MAC_structure.
//!
//! ```text
//! MAC_structure = [ context : "MAC0",
//!                   protected : bstr,
//!                   external_aad : bstr,
//!                   payload : bstr ]
//! ```
//!
//! The tag is HMAC-SHA-256 over the CBOR encoding of that array, truncated
//! to [`MAC_TAG_LEN`] bytes as required by `alg = 4` (HMAC 256/64).

use hmac::{Hmac, Mac};
use minicbor::encode::{Error as EncodeError, Write};
use minicbor::{Encode, Encoder};
use sha2::Sha256;

use crate::constants::{MAC0_CONTEXT, MAC_TAG_LEN};
use crate::error::CwtError;

type HmacSha256 = Hmac<Sha256>;

/// The array the MAC is computed over. External AAD is always empty.
struct MacStructure<'a> {
    protected: &'a [u8],
    payload: &'a [u8],
}

impl<C> Encode<C> for MacStructure<'_> {
    fn encode<W: Write>(
        &self,
        e: &mut Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), EncodeError<W::Error>> {
        e.array(4)?
            .str(MAC0_CONTEXT)?
            .bytes(self.protected)?
            .bytes(&[])?
            .bytes(self.payload)?;
        Ok(())
    }
}

/// Encode the MAC_structure bytes for the given protected header and payload.
pub fn mac_structure(protected_bytes: &[u8], payload_bytes: &[u8]) -> Result<Vec<u8>, CwtError> {
    let structure = MacStructure {
        protected: protected_bytes,
        payload: payload_bytes,
    };
    minicbor::to_vec(&structure).map_err(|e| CwtError::encoding("MAC_structure", e))
}

/// Compute the truncated HMAC-SHA-256 tag.
///
/// Any key length is accepted, including zero.
pub fn compute_mac(
    protected_bytes: &[u8],
    payload_bytes: &[u8],
    key: &[u8],
) -> Result<[u8; MAC_TAG_LEN], CwtError> {
    let input = mac_structure(protected_bytes, payload_bytes)?;

    let mut mac =
        HmacSha256::new_from_slice(key).map_err(|e| CwtError::InvalidKey(e.to_string()))?;
    mac.update(&input);
    let digest = mac.finalize().into_bytes();

    let mut tag = [0u8; MAC_TAG_LEN];
    tag.copy_from_slice(&digest[..MAC_TAG_LEN]);
    Ok(tag)
}
