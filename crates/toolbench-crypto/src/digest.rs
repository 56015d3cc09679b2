//! SHA-1 / SHA-256 / SHA-512 checksums over in-memory buffers
//!
//! The input is always fully buffered: files are read into memory once and
//! every requested algorithm hashes the same slice in parallel. There is no
//! streaming mode, so `digest_file` enforces a size limit instead of
//! quietly using unbounded memory.

use rayon::prelude::*;
use serde::Serialize;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};
use std::collections::BTreeMap;
use std::path::Path;

use crate::encoding::to_hex;
use crate::{CryptoError, DigestAlgorithm};

/// Hex digests of one input, keyed by algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FileDigestResult {
    digests: BTreeMap<DigestAlgorithm, String>,
}

impl FileDigestResult {
    pub fn get(&self, algorithm: DigestAlgorithm) -> Option<&str> {
        self.digests.get(&algorithm).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DigestAlgorithm, &str)> {
        self.digests.iter().map(|(alg, hex)| (*alg, hex.as_str()))
    }

    pub fn len(&self) -> usize {
        self.digests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }

    /// The algorithm whose digest equals a pasted expected value, if any.
    pub fn find_match(&self, expected_hex: &str) -> Option<DigestAlgorithm> {
        self.iter()
            .find(|(alg, hex)| hex_matches(*alg, hex, expected_hex))
            .map(|(alg, _)| alg)
    }
}

/// Hash a byte slice with one algorithm, returning lowercase hex.
pub fn digest_bytes(data: &[u8], algorithm: DigestAlgorithm) -> String {
    match algorithm {
        DigestAlgorithm::Sha1 => to_hex(&Sha1::digest(data)),
        DigestAlgorithm::Sha256 => to_hex(&Sha256::digest(data)),
        DigestAlgorithm::Sha512 => to_hex(&Sha512::digest(data)),
    }
}

/// Hash a byte slice with every supported algorithm concurrently.
pub fn digest_all(data: &[u8]) -> FileDigestResult {
    digest_selected(data, &DigestAlgorithm::ALL)
}

/// Hash a byte slice with the given algorithms concurrently.
/// Duplicates in `algorithms` collapse to one entry.
pub fn digest_selected(data: &[u8], algorithms: &[DigestAlgorithm]) -> FileDigestResult {
    let digests: BTreeMap<DigestAlgorithm, String> = algorithms
        .par_iter()
        .map(|alg| (*alg, digest_bytes(data, *alg)))
        .collect();

    tracing::debug!(bytes = data.len(), algorithms = digests.len(), "computed digests");
    FileDigestResult { digests }
}

/// Read a whole file into memory and hash it.
///
/// Files larger than `max_bytes` are refused up front.
pub fn digest_file(
    path: &Path,
    algorithms: &[DigestAlgorithm],
    max_bytes: u64,
) -> Result<FileDigestResult, CryptoError> {
    let size = std::fs::metadata(path)?.len();
    if size > max_bytes {
        return Err(CryptoError::FileTooLarge {
            size,
            limit: max_bytes,
        });
    }

    let data = std::fs::read(path)?;
    tracing::debug!(path = %path.display(), bytes = data.len(), "buffered file for hashing");
    Ok(digest_selected(&data, algorithms))
}

/// Compare a computed digest against a pasted expected value.
pub fn verify_digest(data: &[u8], algorithm: DigestAlgorithm, expected_hex: &str) -> bool {
    hex_matches(algorithm, &digest_bytes(data, algorithm), expected_hex)
}

/// Case-insensitive, whitespace-trimmed, and only at the algorithm's length.
fn hex_matches(algorithm: DigestAlgorithm, computed: &str, expected_hex: &str) -> bool {
    let expected = expected_hex.trim();
    expected.len() == algorithm.hex_len() && computed.eq_ignore_ascii_case(expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Write;

    const ABC_SHA1: &str = "a9993e364706816aba3e25717850c26c9cd0d89d";
    const ABC_SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";
    const ABC_SHA512: &str = "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
                              2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f";

    #[test]
    fn known_vectors() {
        assert_eq!(digest_bytes(b"abc", DigestAlgorithm::Sha1), ABC_SHA1);
        assert_eq!(digest_bytes(b"abc", DigestAlgorithm::Sha256), ABC_SHA256);
        assert_eq!(digest_bytes(b"abc", DigestAlgorithm::Sha512), ABC_SHA512);
    }

    #[test]
    fn empty_input_sha256() {
        assert_eq!(
            digest_bytes(b"", DigestAlgorithm::Sha256),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn digest_all_matches_individual() {
        let result = digest_all(b"abc");
        assert_eq!(result.len(), 3);
        assert_eq!(result.get(DigestAlgorithm::Sha1), Some(ABC_SHA1));
        assert_eq!(result.get(DigestAlgorithm::Sha256), Some(ABC_SHA256));
        assert_eq!(result.get(DigestAlgorithm::Sha512), Some(ABC_SHA512));
    }

    #[test]
    fn digest_selected_dedupes() {
        let result = digest_selected(
            b"abc",
            &[DigestAlgorithm::Sha256, DigestAlgorithm::Sha256],
        );
        assert_eq!(result.len(), 1);
        assert!(result.get(DigestAlgorithm::Sha1).is_none());
    }

    #[test]
    fn result_serializes_by_display_name() {
        let json = serde_json::to_value(digest_all(b"abc")).unwrap();
        assert_eq!(json["SHA-1"], ABC_SHA1);
        assert_eq!(json["SHA-256"], ABC_SHA256);
    }

    #[test]
    fn digest_file_reads_whole_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"abc").unwrap();

        let result = digest_file(file.path(), &DigestAlgorithm::ALL, 1024).unwrap();
        assert_eq!(result, digest_all(b"abc"));
    }

    #[test]
    fn digest_file_refuses_oversized() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0u8; 2048]).unwrap();

        let err = digest_file(file.path(), &DigestAlgorithm::ALL, 1024).unwrap_err();
        assert!(matches!(
            err,
            CryptoError::FileTooLarge {
                size: 2048,
                limit: 1024
            }
        ));
    }

    #[test]
    fn digest_file_missing_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = digest_file(&dir.path().join("nope"), &DigestAlgorithm::ALL, 1024).unwrap_err();
        assert!(matches!(err, CryptoError::Io(_)));
    }

    #[test]
    fn verify_accepts_uppercase_and_whitespace() {
        let expected = format!("  {}\n", ABC_SHA256.to_uppercase());
        assert!(verify_digest(b"abc", DigestAlgorithm::Sha256, &expected));
        assert!(!verify_digest(b"abd", DigestAlgorithm::Sha256, &expected));
        assert!(!verify_digest(b"abc", DigestAlgorithm::Sha1, ABC_SHA256));
    }

    #[test]
    fn find_match_names_the_algorithm() {
        let result = digest_all(b"abc");
        let pasted = format!(" {}\n", ABC_SHA512.to_uppercase());
        assert_eq!(result.find_match(&pasted), Some(DigestAlgorithm::Sha512));
        assert_eq!(result.find_match(ABC_SHA1), Some(DigestAlgorithm::Sha1));
        assert_eq!(result.find_match("deadbeef"), None);
    }

    #[test]
    fn find_match_rejects_prefixes() {
        let result = digest_all(b"abc");
        assert_eq!(result.find_match(&ABC_SHA256[..40]), None);
        assert_eq!(result.find_match(""), None);
    }

    proptest! {
        #[test]
        fn digest_is_deterministic(data in proptest::collection::vec(any::<u8>(), 0..=4096)) {
            prop_assert_eq!(digest_all(&data), digest_all(&data));
        }

        #[test]
        fn hex_length_matches_algorithm(data in proptest::collection::vec(any::<u8>(), 0..=512)) {
            for (alg, hex) in digest_all(&data).iter() {
                prop_assert_eq!(hex.len(), alg.hex_len());
                prop_assert!(hex.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));
            }
        }

        #[test]
        fn single_byte_change_changes_digest(
            data in proptest::collection::vec(any::<u8>(), 1..=1024),
            idx in any::<prop::sample::Index>(),
            flip in 1u8..=255,
        ) {
            let mut altered = data.clone();
            let i = idx.index(altered.len());
            altered[i] ^= flip;
            for alg in DigestAlgorithm::ALL {
                prop_assert_ne!(digest_bytes(&data, alg), digest_bytes(&altered, alg));
            }
        }
    }
}
