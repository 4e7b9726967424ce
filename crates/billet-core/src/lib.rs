//! billet-core: shared types for password-sealed letters
//!
//! Everything here is free of cryptography and I/O so that the authoring and
//! reading sides agree on what a valid letter identifier and password look like
//! before any envelope work starts.

pub mod config;
pub mod draft;
pub mod error;
pub mod link;
pub mod types;

pub use draft::{Draft, DraftRejection};
pub use error::{BilletError, BilletResult};
pub use link::{LinkRequest, ShareLink};
pub use types::{is_valid_identifier, is_valid_password, LetterId, Passphrase};
