//! toolbench-crypto: password-based text encryption and file checksums
//!
//! Encrypted blob layout (Base64 for transport):
//! ```text
//! [16 bytes: PBKDF2 salt][12 bytes: AES-GCM IV][N bytes: ciphertext][16 bytes: GCM tag]
//! key = PBKDF2-HMAC-SHA256(password, salt, 100_000 rounds) -> 256-bit
//! ```
//!
//! Checksums cover SHA-1, SHA-256 and SHA-512 over a fully buffered input;
//! the three digests run concurrently on the rayon pool.

pub mod blob;
pub mod digest;
pub mod encoding;
pub mod error;
pub mod kdf;

pub use blob::{decrypt, encrypt, EncryptedBlob};
pub use digest::{
    digest_all, digest_bytes, digest_file, digest_selected, verify_digest, FileDigestResult,
};
pub use error::CryptoError;
pub use kdf::{derive_key, DerivedKey};
pub use toolbench_core::types::DigestAlgorithm;

/// Size of the derived AES key in bytes (256-bit)
pub const KEY_SIZE: usize = 32;

/// Size of the PBKDF2 salt stored at the front of every blob
pub const SALT_SIZE: usize = 16;

/// Size of an AES-GCM IV (96-bit)
pub const NONCE_SIZE: usize = 12;

/// Size of a GCM authentication tag
pub const TAG_SIZE: usize = 16;

/// Salt plus IV: everything in front of the ciphertext
pub const HEADER_SIZE: usize = SALT_SIZE + NONCE_SIZE;

/// PBKDF2 rounds. Part of the blob format: blobs do not record it.
pub const PBKDF2_ITERATIONS: u32 = 100_000;
