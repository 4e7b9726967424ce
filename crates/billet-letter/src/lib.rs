//! billet-letter: recover a letter's structure from plain text
//!
//! No markup is involved. The parser applies fixed, ordered heuristics over
//! lines:
//!
//! ```text
//! 20240214            ← date (YYYYMMDD → 2024年2月14日, else verbatim)
//! 亲爱的小明          ← greeting (first body line, known prefix)
//! 今天是情人节。      ← paragraphs (split on blank lines)
//!
//! 爱你的，小红        ← closing (trailing run ending at a closing keyword)
//! 附言：记得吃饭      ← postscript (trailing line with a PS marker)
//! 爱                  ← seal (last non-empty line)
//! ```
//!
//! Parsing is total: unmatched heuristics leave fields empty.

pub mod parse;
pub mod render;
pub mod vocab;

pub use parse::{parse, ParsedLetter, DEFAULT_SEAL};
