//! Turning a parsed letter back into text

use std::fmt;

use crate::parse::ParsedLetter;

const FLOURISH: &str = "~ ❦ ~";

impl ParsedLetter {
    /// Reassemble plain text that parses back to the same fields.
    ///
    /// Sections are separated by blank lines; the date comes out in its
    /// rendered form, which the parser keeps verbatim.
    pub fn to_plaintext(&self) -> String {
        let mut sections: Vec<&str> = vec![&self.date];
        if !self.greeting.is_empty() {
            sections.push(&self.greeting);
        }
        sections.extend(self.paragraphs.iter().map(String::as_str));
        if !self.closing.is_empty() {
            sections.push(&self.closing);
        }
        if !self.ps.is_empty() {
            sections.push(&self.ps);
        }
        sections.push(&self.seal);
        sections.join("\n\n")
    }
}

/// Reading layout for a terminal.
impl fmt::Display for ParsedLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.date)?;
        writeln!(f)?;

        if !self.greeting.is_empty() {
            writeln!(f, "{}", self.greeting)?;
            writeln!(f)?;
        }

        for paragraph in &self.paragraphs {
            for line in paragraph.lines() {
                writeln!(f, "    {line}")?;
            }
            writeln!(f)?;
        }

        if !self.closing.is_empty() {
            writeln!(f, "{FLOURISH}")?;
            for line in self.closing_lines() {
                writeln!(f, "{line}")?;
            }
            writeln!(f)?;
        }

        if !self.ps.is_empty() {
            for line in self.ps_lines() {
                writeln!(f, "{line}")?;
            }
            writeln!(f)?;
        }

        write!(f, "[{}]", self.seal)
    }
}
