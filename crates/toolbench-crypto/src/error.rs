use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("password must not be empty")]
    EmptyPassword,

    /// Wrong password, tampered bytes and malformed blobs all land here.
    /// AES-GCM cannot tell them apart and neither do we.
    #[error("decryption failed: wrong password or corrupted data")]
    DecryptionFailed,

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("file is {size} bytes, over the {limit}-byte in-memory limit")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("invalid encoding: {0}")]
    Encoding(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
