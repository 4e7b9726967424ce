use thiserror::Error;

pub type BilletResult<T> = Result<T, BilletError>;

#[derive(Debug, Error)]
pub enum BilletError {
    /// Stored bytes are structurally invalid: too short, bad transport
    /// encoding, or not UTF-8 after decryption.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// AEAD tag verification failed. Wrong password and tampered ciphertext
    /// produce the same error.
    #[error("authentication failed: wrong password or corrupted data")]
    AuthenticationFailed,

    #[error("letter not found: {0}")]
    NotFound(String),

    /// An identifier or password failed its character-set rule.
    #[error("validation failed: {0}")]
    ValidationFailed(String),

    #[error("crypto error: {0}")]
    Crypto(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BilletError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, BilletError::NotFound(_))
    }

    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, BilletError::AuthenticationFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_message_does_not_leak_detail() {
        let msg = BilletError::AuthenticationFailed.to_string();
        assert_eq!(msg, "authentication failed: wrong password or corrupted data");
    }

    #[test]
    fn classifiers() {
        assert!(BilletError::NotFound("x".into()).is_not_found());
        assert!(!BilletError::AuthenticationFailed.is_not_found());
        assert!(BilletError::AuthenticationFailed.is_authentication_failure());
    }

    #[test]
    fn io_error_converts() {
        let err: BilletError = std::io::Error::other("disk gone").into();
        assert!(matches!(err, BilletError::Io(_)));
    }
}
