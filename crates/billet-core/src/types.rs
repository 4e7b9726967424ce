//! Letter identifiers and passphrases
//!
//! Both are validated on construction, so holding a `LetterId` or a
//! `Passphrase` means the character-set rule has already been checked.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{BilletError, BilletResult};

/// `true` iff `s` matches `^[A-Za-z0-9]+$`.
pub fn is_valid_password(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// `true` iff `s` matches `^[a-z0-9]+(-[a-z0-9]+)*$`.
pub fn is_valid_identifier(s: &str) -> bool {
    !s.is_empty()
        && s.split('-').all(|group| {
            !group.is_empty()
                && group
                    .bytes()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        })
}

/// A lowercase slug naming one stored letter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LetterId(String);

impl LetterId {
    pub fn new(id: impl Into<String>) -> BilletResult<Self> {
        let id = id.into();
        if !is_valid_identifier(&id) {
            return Err(BilletError::ValidationFailed(format!(
                "letter identifier {id:?} must be lowercase letters and digits joined by single hyphens"
            )));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LetterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LetterId {
    type Err = BilletError;

    fn from_str(s: &str) -> BilletResult<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for LetterId {
    type Error = BilletError;

    fn try_from(s: String) -> BilletResult<Self> {
        Self::new(s)
    }
}

impl From<LetterId> for String {
    fn from(id: LetterId) -> Self {
        id.0
    }
}

/// The password a reader types (or carries in a share link).
///
/// Only ever used as key-derivation input. Redacted in `Debug`.
pub struct Passphrase(SecretString);

impl Passphrase {
    pub fn new(password: &str) -> BilletResult<Self> {
        if !is_valid_password(password) {
            // Never echo the rejected value.
            return Err(BilletError::ValidationFailed(
                "password must be non-empty and contain only ASCII letters and digits".into(),
            ));
        }
        Ok(Self(SecretString::from(password)))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for Passphrase {
    fn clone(&self) -> Self {
        Self(SecretString::from(self.expose()))
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Passphrase").field(&"[REDACTED]").finish()
    }
}

impl FromStr for Passphrase {
    type Err = BilletError;

    fn from_str(s: &str) -> BilletResult<Self> {
        Self::new(s)
    }
}


#[cfg(test)]
mod proptest_suite {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn generated_slugs_are_valid(s in "[a-z0-9]{1,6}(-[a-z0-9]{1,6}){0,4}") {
            prop_assert!(is_valid_identifier(&s));
        }

        #[test]
        fn generated_passwords_are_valid(s in "[A-Za-z0-9]{1,32}") {
            prop_assert!(is_valid_password(&s));
        }

        #[test]
        fn any_non_alphanumeric_byte_rejects_password(
            head in "[A-Za-z0-9]{0,8}",
            bad in "[^A-Za-z0-9]",
            tail in "[A-Za-z0-9]{0,8}",
        ) {
            let candidate = format!("{head}{bad}{tail}");
            prop_assert!(!is_valid_password(&candidate));
        }

        #[test]
        fn uppercase_never_valid_identifier(s in "[a-z0-9]{0,4}[A-Z][a-z0-9]{0,4}") {
            prop_assert!(!is_valid_identifier(&s));
        }
    }
}
