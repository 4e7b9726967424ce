//! Marker vocabularies
//!
//! A line "starts with" a marker if it does so exactly, or after lowercasing
//! both sides. Ideographic markers are unaffected by lowercasing, so they only
//! ever match exactly.

pub const GREETING_PREFIXES: &[&str] = &[
    "亲爱的", "最亲爱的", "挚爱的", "宝贝", "我最爱的", "我的", "致", "亲", "心爱的", "想念的",
    "dear", "my", "to", "dearest", "beloved", "darling",
];

pub const CLOSING_KEYWORDS: &[&str] = &[
    "爱你的",
    "永远爱你的",
    "永远爱你",
    "你的",
    "想你的",
    "深爱你的",
    "此致",
    "敬上",
    "爱你",
    "挚爱",
    "永远的",
    "思念你的",
    "最爱你的",
    "你永远的",
    "深深爱你的",
    "love,",
    "yours,",
    "forever,",
    "always,",
    "with love,",
];

pub const PS_PREFIXES: &[&str] = &["附言", "附：", "p.s.", "ps.", "ps:", "p.s"];

/// Does the (already trimmed) `line` start with any of `markers`?
pub fn starts_with_any(line: &str, markers: &[&str]) -> bool {
    if line.is_empty() {
        return false;
    }
    let lower = line.to_lowercase();
    markers
        .iter()
        .any(|m| line.starts_with(m) || lower.starts_with(&m.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_markers_are_case_insensitive() {
        assert!(starts_with_any("Dear Sam,", GREETING_PREFIXES));
        assert!(starts_with_any("DEAREST one", GREETING_PREFIXES));
        assert!(starts_with_any("P.S. call me", PS_PREFIXES));
        assert!(starts_with_any("PS: bring wine", PS_PREFIXES));
        assert!(starts_with_any("With Love, Alex", CLOSING_KEYWORDS));
    }

    #[test]
    fn ideographic_markers_match_exactly() {
        assert!(starts_with_any("亲爱的小明", GREETING_PREFIXES));
        assert!(starts_with_any("附言：记得吃饭", PS_PREFIXES));
        assert!(starts_with_any("附：照片", PS_PREFIXES));
        assert!(starts_with_any("爱你的，小红", CLOSING_KEYWORDS));
        assert!(!starts_with_any("小明亲爱的", GREETING_PREFIXES));
    }

    #[test]
    fn closing_keywords_need_their_comma() {
        assert!(!starts_with_any("love you lots", CLOSING_KEYWORDS));
        assert!(starts_with_any("Love,", CLOSING_KEYWORDS));
    }

    #[test]
    fn prefixes_are_plain_prefixes() {
        // Literal prefix matching: "my" also matches "mystery".
        assert!(starts_with_any("mystery guest", GREETING_PREFIXES));
        assert!(!starts_with_any("", GREETING_PREFIXES));
    }
}
