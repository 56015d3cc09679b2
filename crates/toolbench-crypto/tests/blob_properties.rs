//! Property tests for the encrypted blob format.
//!
//! Each case runs PBKDF2 at full strength, so case counts are kept low.

use proptest::prelude::*;
use secrecy::SecretString;
use toolbench_crypto::encoding::{from_base64, to_base64};
use toolbench_crypto::{decrypt, encrypt, CryptoError, HEADER_SIZE};

fn config() -> ProptestConfig {
    ProptestConfig::with_cases(12)
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn roundtrip_any_text(text in ".{0,200}", password in "[ -~]{1,32}") {
        let password = SecretString::from(password);
        let blob = encrypt(&text, &password).unwrap();
        prop_assert_eq!(decrypt(&blob, &password).unwrap(), text);
    }

    #[test]
    fn flipping_any_ciphertext_byte_is_rejected(
        text in "[a-z]{1,64}",
        idx in any::<prop::sample::Index>(),
        flip in 1u8..=255,
    ) {
        let password = SecretString::from("tamper-check");
        let mut bytes = from_base64(&encrypt(&text, &password).unwrap()).unwrap();

        let region = bytes.len() - HEADER_SIZE;
        let i = HEADER_SIZE + idx.index(region);
        bytes[i] ^= flip;

        let result = decrypt(&to_base64(&bytes), &password);
        prop_assert!(matches!(result, Err(CryptoError::DecryptionFailed)));
    }

    #[test]
    fn other_password_is_rejected(
        text in "[ -~]{0,64}",
        p1 in "[a-z]{1,16}",
        p2 in "[a-z]{1,16}",
    ) {
        prop_assume!(p1 != p2);
        let blob = encrypt(&text, &SecretString::from(p1)).unwrap();

        let result = decrypt(&blob, &SecretString::from(p2));
        prop_assert!(matches!(result, Err(CryptoError::DecryptionFailed)));
    }
}

#[test]
fn truncation_at_every_header_boundary_fails() {
    let password = SecretString::from("pw");
    let bytes = from_base64(&encrypt("boundary", &password).unwrap()).unwrap();

    for len in [0, 1, 15, 16, 27, 28, HEADER_SIZE + 15, bytes.len() - 1] {
        let result = decrypt(&to_base64(&bytes[..len]), &password);
        assert!(
            matches!(result, Err(CryptoError::DecryptionFailed)),
            "length {len} must fail"
        );
    }
}
