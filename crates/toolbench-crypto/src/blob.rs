//! Password-based AES-256-GCM text encryption
//!
//! Blob format (binary, Base64 for display):
//! ```text
//! [16 bytes: salt][12 bytes: IV][N bytes: ciphertext][16 bytes: GCM tag]
//! ```
//!
//! Salt and IV are fresh per call. The key is re-derived from the salt on
//! decrypt, so the blob is self-contained apart from the password.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::{rngs::OsRng, RngCore};
use secrecy::{ExposeSecret, SecretString};

use crate::encoding::{from_base64, to_base64};
use crate::kdf::derive_key;
use crate::{CryptoError, HEADER_SIZE, NONCE_SIZE, SALT_SIZE, TAG_SIZE};

/// Raw `salt || iv || ciphertext+tag` bytes of an encrypted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedBlob {
    bytes: Vec<u8>,
}

impl EncryptedBlob {
    /// Wrap raw blob bytes. Fails only if the header or tag cannot fit.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, CryptoError> {
        if bytes.len() < HEADER_SIZE + TAG_SIZE {
            return Err(CryptoError::DecryptionFailed);
        }
        Ok(Self { bytes })
    }

    /// Decode a pasted Base64 blob. Any malformation is a decryption failure.
    pub fn from_base64(s: &str) -> Result<Self, CryptoError> {
        let bytes = from_base64(s).map_err(|_| CryptoError::DecryptionFailed)?;
        Self::from_bytes(bytes)
    }

    pub fn to_base64(&self) -> String {
        to_base64(&self.bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn salt(&self) -> [u8; SALT_SIZE] {
        let mut salt = [0u8; SALT_SIZE];
        salt.copy_from_slice(&self.bytes[..SALT_SIZE]);
        salt
    }

    pub fn nonce(&self) -> &[u8] {
        &self.bytes[SALT_SIZE..HEADER_SIZE]
    }

    /// Ciphertext with the trailing GCM tag
    pub fn ciphertext(&self) -> &[u8] {
        &self.bytes[HEADER_SIZE..]
    }
}

/// Encrypt UTF-8 text under a password. Returns the Base64 blob.
pub fn encrypt(plaintext: &str, password: &SecretString) -> Result<String, CryptoError> {
    let mut salt = [0u8; SALT_SIZE];
    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut salt);
    OsRng.fill_bytes(&mut nonce_bytes);

    let key = derive_key(password, &salt)?;
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    let mut bytes = Vec::with_capacity(HEADER_SIZE + ciphertext.len());
    bytes.extend_from_slice(&salt);
    bytes.extend_from_slice(&nonce_bytes);
    bytes.extend_from_slice(&ciphertext);

    tracing::debug!(
        plaintext_len = plaintext.len(),
        blob_len = bytes.len(),
        "encrypted text blob"
    );
    Ok(EncryptedBlob { bytes }.to_base64())
}

/// Decrypt a Base64 blob produced by [`encrypt`].
///
/// Wrong password, tampering, truncation and bad Base64 all return
/// [`CryptoError::DecryptionFailed`].
pub fn decrypt(blob_b64: &str, password: &SecretString) -> Result<String, CryptoError> {
    if password.expose_secret().is_empty() {
        return Err(CryptoError::EmptyPassword);
    }
    let blob = EncryptedBlob::from_base64(blob_b64)?;

    let key = derive_key(password, &blob.salt())?;
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    let plaintext = cipher
        .decrypt(Nonce::from_slice(blob.nonce()), blob.ciphertext())
        .map_err(|_| CryptoError::DecryptionFailed)?;

    tracing::debug!(blob_len = blob.as_bytes().len(), "decrypted text blob");
    String::from_utf8(plaintext).map_err(|_| CryptoError::DecryptionFailed)
}
