//! Reader-facing outcomes of `billet open`
//!
//! Every failure a reader can hit gets its own title, hint, and exit code so
//! scripts and humans can tell them apart.

use billet_core::BilletError;
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadFailure {
    WrongPassword,
    NotFound,
    IncompleteLink,
    Corrupted,
    InvalidInput,
    Unexpected,
}

impl ReadFailure {
    pub fn classify(err: &BilletError) -> Self {
        match err {
            BilletError::AuthenticationFailed => Self::WrongPassword,
            BilletError::NotFound(_) => Self::NotFound,
            BilletError::MalformedEnvelope(_) => Self::Corrupted,
            BilletError::ValidationFailed(_) => Self::InvalidInput,
            _ => Self::Unexpected,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::WrongPassword => "Wrong password",
            Self::NotFound => "Letter not found",
            Self::IncompleteLink => "Incomplete link",
            Self::Corrupted => "This letter is damaged",
            Self::InvalidInput => "Invalid link",
            Self::Unexpected => "Something went wrong",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            Self::WrongPassword => {
                "The password does not open this letter. Check the link you received and try again."
            }
            Self::NotFound => "No letter is stored under that name. Check that the link is correct.",
            Self::IncompleteLink => "Opening a letter needs both its name and its password.",
            Self::Corrupted => "The stored letter cannot be read. Ask the sender for a new link.",
            Self::InvalidInput => {
                "Letter names use lowercase letters, digits and single hyphens; passwords use letters and digits."
            }
            Self::Unexpected => "An unexpected error occurred. Run again with --log debug for details.",
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Unexpected => 1,
            Self::InvalidInput => 2,
            Self::WrongPassword => 3,
            Self::NotFound => 4,
            Self::IncompleteLink => 5,
            Self::Corrupted => 6,
        }
    }

    pub fn exit_code(self) -> ExitCode {
        ExitCode::from(self.code())
    }
}

/// Shown when `billet open` is given nothing to open.
pub const LANDING: &str = "\
A letter is waiting for someone.
Open it with the link you were sent:

    billet open --link '<url>'
";
