//! billet-store: where sealed letters live and how they are written and read
//!
//! - `operator`: OpenDAL operator factory (fs / s3 / memory)
//! - `store`: payload slots keyed by letter identifier
//! - `author`: batch sealing of a draft directory
//! - `reader`: fetch → decrypt → parse

pub mod author;
pub mod operator;
pub mod reader;
pub mod store;

pub use author::{draft_files, seal_drafts, SealReport, SealStatus};
pub use operator::build_operator;
pub use reader::{open_letter, read_letter};
pub use store::LetterStore;
