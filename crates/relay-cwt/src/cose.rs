//! COSE_Mac0 assembly and the CWT tag envelope.
//!
//! ```text
//! CWT = #6.61(#6.17([ protected : bstr,
//!                     unprotected : {},
//!                     payload : bstr,
//!                     tag : bstr .size 8 ]))
//! ```
//!
//! The protected header and payload are independently encoded maps carried
//! as opaque byte strings. Verifiers index the array positionally.

use minicbor::data::Tag;
use minicbor::encode::{Error as EncodeError, Write};
use minicbor::{Encode, Encoder};

use crate::constants::{COSE_MAC0_TAG, CWT_TAG, MAC_TAG_LEN};
use crate::error::CwtError;

/// A COSE_Mac0 message with an empty unprotected header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoseMac0 {
    pub protected: Vec<u8>,
    pub payload: Vec<u8>,
    pub tag: [u8; MAC_TAG_LEN],
}

impl<C> Encode<C> for CoseMac0 {
    fn encode<W: Write>(
        &self,
        e: &mut Encoder<W>,
        _ctx: &mut C,
    ) -> Result<(), EncodeError<W::Error>> {
        e.array(4)?
            .bytes(&self.protected)?
            .map(0)?
            .bytes(&self.payload)?
            .bytes(&self.tag)?;
        Ok(())
    }
}

impl CoseMac0 {
    /// Encode the untagged 4-element array.
    pub fn to_cbor(&self) -> Result<Vec<u8>, CwtError> {
        minicbor::to_vec(self).map_err(|e| CwtError::encoding("COSE_Mac0", e))
    }

    /// Encode as a CWT: the array inside tag 17, inside tag 61.
    pub fn to_cwt(&self) -> Result<Vec<u8>, CwtError> {
        let array = self.to_cbor()?;
        let mac0 = wrap_tag(COSE_MAC0_TAG, &array)
            .map_err(|e| CwtError::encoding("COSE_Mac0 tag", e))?;
        wrap_tag(CWT_TAG, &mac0).map_err(|e| CwtError::encoding("CWT tag", e))
    }
}

/// Prefix already-encoded CBOR with a tag head without re-parsing it.
fn wrap_tag(number: u64, content: &[u8]) -> Result<Vec<u8>, EncodeError<std::convert::Infallible>> {
    let mut e = Encoder::new(Vec::with_capacity(content.len() + 9));
    e.tag(Tag::new(number))?;
    let mut out = e.into_writer();
    out.extend_from_slice(content);
    Ok(out)
}
