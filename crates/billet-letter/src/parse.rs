//! Line-level segmentation
//!
//! Each pass takes a slice of lines and returns the extracted field plus the
//! slice left for the next pass.

use serde::Serialize;

use crate::vocab::{starts_with_any, CLOSING_KEYWORDS, GREETING_PREFIXES, PS_PREFIXES};

/// Seal used when nothing follows the date line.
pub const DEFAULT_SEAL: &str = "爱";

/// The structural parts of one letter. Derived on every render, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedLetter {
    pub date: String,
    pub greeting: String,
    pub paragraphs: Vec<String>,
    /// Closing lines, trimmed, blank lines dropped, joined by `\n`
    pub closing: String,
    /// Postscript lines, same treatment as `closing`
    pub ps: String,
    pub seal: String,
}

impl ParsedLetter {
    pub fn closing_lines(&self) -> impl Iterator<Item = &str> {
        self.closing.lines()
    }

    pub fn ps_lines(&self) -> impl Iterator<Item = &str> {
        self.ps.lines()
    }
}

/// Segment a decrypted letter. Deterministic and total.
pub fn parse(content: &str) -> ParsedLetter {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let lines: Vec<&str> = content.split('\n').collect();

    let (date, rest) = take_date(&lines);
    let (seal, interior) = take_seal(rest);
    let (greeting, body) = take_greeting(interior);
    let (ps, body) = take_postscript(body);
    let (closing, body) = take_closing(body);

    ParsedLetter {
        date,
        greeting,
        paragraphs: split_paragraphs(body),
        closing: join_block(closing),
        ps: join_block(ps),
        seal,
    }
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// First non-empty line is the date; leading blank lines are skipped.
fn take_date<'a>(lines: &'a [&'a str]) -> (String, &'a [&'a str]) {
    match lines.iter().position(|l| !is_blank(l)) {
        Some(i) => (format_date(lines[i].trim()), &lines[i + 1..]),
        None => (String::new(), &[]),
    }
}

/// `YYYYMMDD` → `2024年2月14日`; anything else is returned unchanged.
fn format_date(line: &str) -> String {
    if line.len() != 8 || !line.bytes().all(|b| b.is_ascii_digit()) {
        return line.to_string();
    }
    let num = |range: std::ops::Range<usize>| line[range].parse::<u32>().unwrap_or_default();
    format!("{}年{}月{}日", num(0..4), num(4..6), num(6..8))
}

/// Last non-empty line is the seal.
fn take_seal<'a>(lines: &'a [&'a str]) -> (String, &'a [&'a str]) {
    match lines.iter().rposition(|l| !is_blank(l)) {
        Some(i) => (lines[i].trim().to_string(), &lines[..i]),
        None => (DEFAULT_SEAL.to_string(), lines),
    }
}

/// Only the first non-empty line is eligible as a greeting.
fn take_greeting<'a>(lines: &'a [&'a str]) -> (String, &'a [&'a str]) {
    let Some(i) = lines.iter().position(|l| !is_blank(l)) else {
        return (String::new(), &[]);
    };
    let first = lines[i].trim();
    if starts_with_any(first, GREETING_PREFIXES) {
        (first.to_string(), &lines[i + 1..])
    } else {
        (String::new(), &lines[i..])
    }
}

/// Returns `(postscript, before)`. The postscript starts at a marker line and
/// may only be followed by blank lines.
fn take_postscript<'a>(lines: &'a [&'a str]) -> (&'a [&'a str], &'a [&'a str]) {
    for (i, line) in lines.iter().enumerate().rev() {
        let trimmed = line.trim();
        if starts_with_any(trimmed, PS_PREFIXES) {
            return (&lines[i..], &lines[..i]);
        }
        if !trimmed.is_empty() {
            break;
        }
    }
    (&[], lines)
}

/// Returns `(closing, before)`.
///
/// Trailing blank lines are skipped, then the trailing run of non-empty
/// lines is scanned upward for a closing keyword. The keyword line and every
/// line after it form the closing. Hitting a blank line before a keyword
/// means there is no closing.
fn take_closing<'a>(lines: &'a [&'a str]) -> (&'a [&'a str], &'a [&'a str]) {
    let mut in_run = false;
    for (i, line) in lines.iter().enumerate().rev() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if in_run {
                break;
            }
            continue;
        }
        if starts_with_any(trimmed, CLOSING_KEYWORDS) {
            return (&lines[i..], &lines[..i]);
        }
        // Signature line (a name under the closing phrase).
        in_run = true;
    }
    (&[], lines)
}

/// Split on runs of blank lines; each paragraph trimmed, empties dropped.
fn split_paragraphs(lines: &[&str]) -> Vec<String> {
    lines
        .split(|l| is_blank(l))
        .map(|group| group.join("\n").trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

fn join_block(lines: &[&str]) -> String {
    lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
