//! Text-safe transport: standard padded base64 of the envelope bytes

use base64::{engine::general_purpose::STANDARD as B64, Engine};
use billet_core::{BilletError, BilletResult};
use std::fmt;

use crate::envelope::EncryptedEnvelope;

/// The persisted form of an envelope, stored as `{id}.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPayload(String);

impl StoredPayload {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for StoredPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<StoredPayload> for Vec<u8> {
    fn from(payload: StoredPayload) -> Self {
        payload.0.into_bytes()
    }
}

pub fn to_text(envelope: &EncryptedEnvelope) -> StoredPayload {
    StoredPayload(B64.encode(envelope.as_bytes()))
}

/// Decode a stored payload. Surrounding whitespace (e.g. a trailing newline
/// added by an editor) is ignored.
pub fn from_text(payload: &str) -> BilletResult<EncryptedEnvelope> {
    B64.decode(payload.trim())
        .map(EncryptedEnvelope::from_bytes)
        .map_err(|e| BilletError::MalformedEnvelope(format!("invalid base64 payload: {e}")))
}
