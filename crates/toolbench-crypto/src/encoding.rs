//! Transport encoding: Base64 for blobs, lowercase hex for digests

use base64::{engine::general_purpose::STANDARD as B64, Engine};

use crate::CryptoError;

/// Standard-alphabet, padded Base64.
pub fn to_base64(data: &[u8]) -> String {
    B64.encode(data)
}

/// Decode Base64, ignoring whitespace around the pasted value.
pub fn from_base64(s: &str) -> Result<Vec<u8>, CryptoError> {
    B64.decode(s.trim())
        .map_err(|e| CryptoError::Encoding(format!("base64: {e}")))
}

pub fn to_hex(data: &[u8]) -> String {
    hex::encode(data)
}

/// Decode hex in either case.
pub fn from_hex(s: &str) -> Result<Vec<u8>, CryptoError> {
    hex::decode(s.trim()).map_err(|e| CryptoError::Encoding(format!("hex: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_known_values() {
        assert_eq!(to_base64(b""), "");
        assert_eq!(to_base64(b"toolbench"), "dG9vbGJlbmNo");
        assert_eq!(from_base64("  dG9vbGJlbmNo\n").unwrap(), b"toolbench");
    }

    #[test]
    fn base64_rejects_garbage() {
        assert!(from_base64("not base64!!").is_err());
    }

    #[test]
    fn hex_is_lowercase() {
        assert_eq!(to_hex(&[0x00, 0xab, 0xff, 0x10]), "00abff10");
    }

    #[test]
    fn hex_decodes_mixed_case() {
        assert_eq!(from_hex("00AbfF10").unwrap(), vec![0x00, 0xab, 0xff, 0x10]);
    }

    #[test]
    fn hex_rejects_bad_input() {
        assert!(from_hex("abc").is_err());
        assert!(from_hex("zz").is_err());
        assert!(matches!(from_hex("0g"), Err(CryptoError::Encoding(_))));
    }

    #[test]
    fn hex_trims_pasted_whitespace() {
        assert_eq!(from_hex("  deadBEEF\n").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
    }
}
