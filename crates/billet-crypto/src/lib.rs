//! billet-crypto: the sealed-letter envelope
//!
//! Wire format (versionless; every parameter is a protocol constant):
//! ```text
//! base64( salt[16] || nonce[12] || ciphertext[N] || tag[16] )
//!
//! key = PBKDF2-HMAC-SHA256(password, salt, 100_000 rounds, 32 bytes)
//! ciphertext||tag = AES-256-GCM(key, nonce, utf8(plaintext)), no AAD
//! ```
//!
//! Changing any constant below makes every stored letter unreadable.

pub mod envelope;
mod kdf;
pub mod transport;

pub use envelope::{decrypt, encrypt, EncryptedEnvelope};
pub use transport::{from_text, to_text, StoredPayload};

use billet_core::{BilletResult, Passphrase};

/// PBKDF2 salt length
pub const SALT_SIZE: usize = 16;

/// AES-GCM nonce length (96-bit)
pub const NONCE_SIZE: usize = 12;

/// AES-256 key length
pub const KEY_SIZE: usize = 32;

/// GCM authentication tag length
pub const TAG_SIZE: usize = 16;

/// PBKDF2-HMAC-SHA256 round count
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Shortest blob accepted by `decrypt`: salt + nonce + one byte.
pub const MIN_ENVELOPE_SIZE: usize = SALT_SIZE + NONCE_SIZE + 1;

/// Encrypt a letter straight to its stored text form.
pub fn seal(plaintext: &str, passphrase: &Passphrase) -> BilletResult<StoredPayload> {
    Ok(to_text(&encrypt(plaintext, passphrase)?))
}

/// Recover a letter from its stored text form.
pub fn unseal(payload: &str, passphrase: &Passphrase) -> BilletResult<String> {
    decrypt(&from_text(payload)?, passphrase)
}
