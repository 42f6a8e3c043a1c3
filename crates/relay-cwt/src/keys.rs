//! Symmetric key material for token MACs.

use crate::error::CwtError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rand::RngCore;
use std::fmt;
use std::path::Path;

/// Default size of generated keys in bytes.
pub const DEFAULT_KEY_LEN: usize = 32;

/// An HMAC-SHA-256 key shared with token verifiers.
///
/// Keys travel as standard (padded) base64 text in configuration and in the
/// provider setup. No minimum length is enforced.
#[derive(Clone, PartialEq, Eq)]
pub struct HmacKey {
    bytes: Vec<u8>,
}

impl HmacKey {
    /// Generate a new random key of `len` bytes.
    pub fn generate(len: usize) -> Self {
        let mut bytes = vec![0u8; len];
        rand::rng().fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Decode a base64 key string. Surrounding whitespace is ignored.
    pub fn from_base64(encoded: &str) -> Result<Self, CwtError> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| CwtError::InvalidKey(e.to_string()))?;
        Ok(Self { bytes })
    }

    /// Load a base64 key from a file.
    pub fn load_from_file(path: &Path) -> Result<Self, CwtError> {
        let encoded = std::fs::read_to_string(path).map_err(|e| {
            CwtError::InvalidKey(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_base64(&encoded)
    }

    /// The raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The key as standard base64 text.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for HmacKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacKey")
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_key_generation() {
        let key = HmacKey::generate(DEFAULT_KEY_LEN);
        assert_eq!(key.len(), 32);
        assert_ne!(key, HmacKey::generate(DEFAULT_KEY_LEN));
    }

    #[test]
    fn test_base64_roundtrip() {
        let key = HmacKey::generate(16);
        let decoded = HmacKey::from_base64(&key.to_base64()).unwrap();
        assert_eq!(key, decoded);
    }

    #[test]
    fn test_invalid_base64() {
        let err = HmacKey::from_base64("not base64!").unwrap_err();
        assert!(matches!(err, CwtError::InvalidKey(_)));
    }

    #[test]
    fn test_load_from_file_trims_newline() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "c2VjcmV0").unwrap();

        let key = HmacKey::load_from_file(file.path()).unwrap();
        assert_eq!(key.as_bytes(), b"secret");
    }

    #[test]
    fn test_debug_hides_key_bytes() {
        let key = HmacKey::from_bytes(b"topsecret".to_vec());
        let debug = format!("{key:?}");
        assert!(!debug.contains("topsecret"));
        assert!(debug.contains("len: 9"));
    }
}
