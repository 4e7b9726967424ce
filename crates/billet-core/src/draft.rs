//! Authoring input: one draft file per letter
//!
//! ```text
//! line 1     password (alphanumeric)
//! line 2..   letter body, stored trimmed
//! ```

use std::fmt;
use thiserror::Error;

use crate::types::{is_valid_password, Passphrase};

/// Why a draft file was skipped. Skips never abort a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftRejection {
    #[error("need at least 2 lines: password + content")]
    TooShort,
    #[error("first line is empty, should be password")]
    EmptyPassword,
    #[error("password must be alphanumeric only")]
    InvalidPassword,
    #[error("no letter content after password line")]
    EmptyBody,
    #[error("file name {0:?} is not a valid letter identifier")]
    InvalidIdentifier(String),
    #[error("could not read draft: {0}")]
    Unreadable(String),
}

/// A parsed, validated draft ready for sealing.
pub struct Draft {
    pub password: Passphrase,
    pub body: String,
}

impl Draft {
    pub fn parse(content: &str) -> Result<Self, DraftRejection> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut lines = content.split('\n');
        let first = lines.next().unwrap_or_default();
        let rest: Vec<&str> = lines.collect();
        if rest.is_empty() {
            return Err(DraftRejection::TooShort);
        }

        let password = first.trim();
        if password.is_empty() {
            return Err(DraftRejection::EmptyPassword);
        }
        if !is_valid_password(password) {
            return Err(DraftRejection::InvalidPassword);
        }

        let body = rest.join("\n").trim().to_string();
        if body.is_empty() {
            return Err(DraftRejection::EmptyBody);
        }

        let password = Passphrase::new(password).map_err(|_| DraftRejection::InvalidPassword)?;
        Ok(Self { password, body })
    }
}

impl fmt::Debug for Draft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Draft")
            .field("password", &self.password)
            .field("body_len", &self.body.len())
            .finish()
    }
}
