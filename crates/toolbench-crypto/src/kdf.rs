//! Key derivation: PBKDF2-HMAC-SHA256 password → AES key

use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use zeroize::Zeroize;

use crate::{CryptoError, KEY_SIZE, PBKDF2_ITERATIONS, SALT_SIZE};

/// A 256-bit AES key derived from a password for a single operation.
///
/// Zeroized on drop to prevent secrets lingering in memory.
pub struct DerivedKey {
    bytes: [u8; KEY_SIZE],
}

impl DerivedKey {
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Derive a 256-bit key from a password and a 16-byte salt.
///
/// Deterministic for identical inputs. The salt travels in the clear at the
/// front of each blob, so the same password yields a different key per blob.
pub fn derive_key(
    password: &SecretString,
    salt: &[u8; SALT_SIZE],
) -> Result<DerivedKey, CryptoError> {
    let password = password.expose_secret();
    if password.is_empty() {
        return Err(CryptoError::EmptyPassword);
    }

    let mut bytes = [0u8; KEY_SIZE];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut bytes);
    Ok(DerivedKey { bytes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kdf_deterministic() {
        let password = SecretString::from("test-password-123");
        let salt = [1u8; SALT_SIZE];

        let key1 = derive_key(&password, &salt).unwrap();
        let key2 = derive_key(&password, &salt).unwrap();

        assert_eq!(key1.as_bytes(), key2.as_bytes(), "KDF must be deterministic");
    }

    #[test]
    fn test_kdf_different_passwords() {
        let salt = [1u8; SALT_SIZE];

        let key1 = derive_key(&SecretString::from("password-a"), &salt).unwrap();
        let key2 = derive_key(&SecretString::from("password-b"), &salt).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_kdf_different_salts() {
        let password = SecretString::from("same-password");

        let key1 = derive_key(&password, &[1u8; SALT_SIZE]).unwrap();
        let key2 = derive_key(&password, &[2u8; SALT_SIZE]).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_kdf_known_vector() {
        // Published PBKDF2-HMAC-SHA256 vector: "password" / "salt" / 1 round
        let mut out = [0u8; 32];
        pbkdf2::pbkdf2_hmac::<Sha256>(b"password", b"salt", 1, &mut out);
        assert_eq!(
            crate::encoding::to_hex(&out),
            "120fb6cffcf8b32c43e7225256c4f837a86548c92ccc35480805987cb70be17b"
        );
    }

    #[test]
    fn test_empty_password_rejected() {
        let result = derive_key(&SecretString::from(""), &[0u8; SALT_SIZE]);
        assert!(matches!(result, Err(CryptoError::EmptyPassword)));
    }

    #[test]
    fn test_debug_redacts_key() {
        let key = derive_key(&SecretString::from("pw"), &[0u8; SALT_SIZE]).unwrap();
        assert!(format!("{key:?}").contains("REDACTED"));
    }
}
