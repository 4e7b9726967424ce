//! AES-256-GCM letter envelope
//!
//! Envelope format (binary):
//! ```text
//! [16 bytes: PBKDF2 salt][12 bytes: GCM nonce][N bytes: ciphertext][16 bytes: GCM tag]
//! ```
//!
//! The tag is never split out here: the AEAD primitive appends it on encrypt
//! and peels it off the tail on decrypt.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use billet_core::{BilletError, BilletResult, Passphrase};
use rand::RngCore;

use crate::kdf::derive_with_rounds;
use crate::{MIN_ENVELOPE_SIZE, NONCE_SIZE, PBKDF2_ITERATIONS, SALT_SIZE, TAG_SIZE};

/// Raw envelope bytes: `salt || nonce || ciphertext_with_tag`.
///
/// Construction does not validate length; `decrypt` does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedEnvelope {
    bytes: Vec<u8>,
}

impl EncryptedEnvelope {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Envelope size for a plaintext of `plaintext_len` UTF-8 bytes.
    pub(crate) const fn sealed_len(plaintext_len: usize) -> usize {
        SALT_SIZE + NONCE_SIZE + plaintext_len + TAG_SIZE
    }
}

/// Encrypt `plaintext` under `passphrase` with a fresh salt and nonce.
pub fn encrypt(plaintext: &str, passphrase: &Passphrase) -> BilletResult<EncryptedEnvelope> {
    encrypt_with_rounds(plaintext, passphrase.expose().as_bytes(), PBKDF2_ITERATIONS)
}

/// Decrypt an envelope with the reader's `passphrase`.
///
/// A wrong passphrase and a tampered envelope both yield
/// `BilletError::AuthenticationFailed`.
pub fn decrypt(envelope: &EncryptedEnvelope, passphrase: &Passphrase) -> BilletResult<String> {
    decrypt_with_rounds(envelope, passphrase.expose().as_bytes(), PBKDF2_ITERATIONS)
}

pub(crate) fn encrypt_with_rounds(
    plaintext: &str,
    password: &[u8],
    rounds: u32,
) -> BilletResult<EncryptedEnvelope> {
    let mut rng = rand::thread_rng();
    let mut salt = [0u8; SALT_SIZE];
    let mut nonce = [0u8; NONCE_SIZE];
    rng.fill_bytes(&mut salt);
    rng.fill_bytes(&mut nonce);

    encrypt_with_session(plaintext, password, &salt, &nonce, rounds)
}

/// Encrypt with caller-chosen salt and nonce. Never reuse a pair.
pub(crate) fn encrypt_with_session(
    plaintext: &str,
    password: &[u8],
    salt: &[u8; SALT_SIZE],
    nonce: &[u8; NONCE_SIZE],
    rounds: u32,
) -> BilletResult<EncryptedEnvelope> {
    let key = derive_with_rounds(password, salt, rounds);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(nonce), plaintext.as_bytes())
        .map_err(|e| BilletError::Crypto(format!("AES-256-GCM encryption failed: {e}")))?;

    let mut bytes = Vec::with_capacity(EncryptedEnvelope::sealed_len(plaintext.len()));
    bytes.extend_from_slice(salt);
    bytes.extend_from_slice(nonce);
    bytes.extend_from_slice(&ciphertext);

    tracing::debug!(bytes = bytes.len(), "letter envelope sealed");
    Ok(EncryptedEnvelope::from_bytes(bytes))
}

pub(crate) fn decrypt_with_rounds(
    envelope: &EncryptedEnvelope,
    password: &[u8],
    rounds: u32,
) -> BilletResult<String> {
    let data = envelope.as_bytes();
    if data.len() < MIN_ENVELOPE_SIZE {
        return Err(BilletError::MalformedEnvelope(format!(
            "envelope too short: {} bytes (minimum {MIN_ENVELOPE_SIZE})",
            data.len()
        )));
    }

    let (salt, rest) = data.split_at(SALT_SIZE);
    let (nonce, ciphertext) = rest.split_at(NONCE_SIZE);

    let key = derive_with_rounds(password, salt, rounds);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));

    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| {
            tracing::debug!(bytes = data.len(), "letter envelope failed authentication");
            BilletError::AuthenticationFailed
        })?;

    String::from_utf8(plaintext).map_err(|_| {
        BilletError::MalformedEnvelope("decrypted letter is not valid UTF-8".into())
    })
}


#[cfg(test)]
mod proptest_suite {
    use super::*;
    use proptest::prelude::*;

    const FAST: u32 = 2;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn roundtrip(text in any::<String>(), pw in "[A-Za-z0-9]{1,16}") {
            let env = encrypt_with_rounds(&text, pw.as_bytes(), FAST).unwrap();
            prop_assert_eq!(decrypt_with_rounds(&env, pw.as_bytes(), FAST).unwrap(), text);
        }

        #[test]
        fn length_invariant(text in any::<String>()) {
            let env = encrypt_with_rounds(&text, b"abc123", FAST).unwrap();
            prop_assert_eq!(env.len(), 16 + 12 + text.len() + 16);
        }

        #[test]
        fn wrong_password_fails(
            text in ".{0,64}",
            p1 in "[A-Za-z0-9]{1,12}",
            p2 in "[A-Za-z0-9]{1,12}",
        ) {
            prop_assume!(p1 != p2);
            let env = encrypt_with_rounds(&text, p1.as_bytes(), FAST).unwrap();
            let err = decrypt_with_rounds(&env, p2.as_bytes(), FAST).unwrap_err();
            prop_assert!(matches!(err, BilletError::AuthenticationFailed));
        }

        #[test]
        fn single_byte_tamper_fails(text in ".{1,64}", pick in any::<prop::sample::Index>(), flip in 1u8..=255) {
            let env = encrypt_with_rounds(&text, b"abc123", FAST).unwrap();
            let body_start = SALT_SIZE + NONCE_SIZE;
            let i = body_start + pick.index(env.len() - body_start);
            let mut bytes = env.into_bytes();
            bytes[i] ^= flip;
            let err = decrypt_with_rounds(&EncryptedEnvelope::from_bytes(bytes), b"abc123", FAST)
                .unwrap_err();
            prop_assert!(matches!(err, BilletError::AuthenticationFailed));
        }

        #[test]
        fn short_blobs_are_malformed(bytes in prop::collection::vec(any::<u8>(), 0..MIN_ENVELOPE_SIZE)) {
            let err = decrypt_with_rounds(&EncryptedEnvelope::from_bytes(bytes), b"abc123", FAST)
                .unwrap_err();
            prop_assert!(matches!(err, BilletError::MalformedEnvelope(_)));
        }
    }
}
