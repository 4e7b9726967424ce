//! Share links: `{base_url}?letter={id}&password={password}`
//!
//! Identifiers and passwords are restricted to URL-safe characters, so links
//! are written unencoded. Incoming queries are still form-decoded.

use crate::error::BilletResult;
use crate::types::{LetterId, Passphrase};

const LETTER_PARAM: &str = "letter";
const PASSWORD_PARAM: &str = "password";

/// Everything a reader needs to open one letter.
#[derive(Debug, Clone)]
pub struct ShareLink {
    pub letter: LetterId,
    pub password: Passphrase,
}

impl ShareLink {
    pub fn new(letter: LetterId, password: Passphrase) -> Self {
        Self { letter, password }
    }

    /// Render the link against the reader page URL.
    pub fn to_url(&self, base_url: &str) -> String {
        let base = base_url.split('#').next().unwrap_or_default();
        let sep = if base.contains('?') { '&' } else { '?' };
        format!(
            "{base}{sep}{LETTER_PARAM}={}&{PASSWORD_PARAM}={}",
            self.letter,
            self.password.expose()
        )
    }
}

/// What a reader's URL asks for.
#[derive(Debug, Clone)]
pub enum LinkRequest {
    /// Neither parameter present: show the landing message.
    Landing,
    /// Exactly one of the two parameters present.
    MissingParams,
    Open(ShareLink),
}

impl LinkRequest {
    /// Interpret a reader URL (or a bare query string).
    ///
    /// Fails with `ValidationFailed` when both parameters are present but
    /// either one breaks its character-set rule.
    pub fn from_url(url: &str) -> BilletResult<Self> {
        let without_fragment = url.split('#').next().unwrap_or_default();
        let query = match without_fragment.split_once('?') {
            Some((_, q)) => q,
            None if without_fragment.contains('=') => without_fragment,
            None => "",
        };

        // First occurrence wins; an empty value counts as absent.
        let mut letter: Option<String> = None;
        let mut password: Option<String> = None;
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match decode_component(key).as_str() {
                LETTER_PARAM => letter.get_or_insert_with(|| decode_component(value)),
                PASSWORD_PARAM => password.get_or_insert_with(|| decode_component(value)),
                _ => continue,
            };
        }
        let letter = letter.filter(|v| !v.is_empty());
        let password = password.filter(|v| !v.is_empty());

        match (letter, password) {
            (None, None) => Ok(Self::Landing),
            (Some(id), Some(pw)) => Ok(Self::Open(ShareLink::new(
                LetterId::new(id)?,
                Passphrase::new(&pw)?,
            ))),
            _ => Ok(Self::MissingParams),
        }
    }
}

/// `application/x-www-form-urlencoded` decoding of one key or value: `+` is a
/// space, `%XX` is a byte, malformed escapes pass through, invalid UTF-8 is
/// replaced.
fn decode_component(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' => {
                let escaped = bytes
                    .get(i + 1..i + 3)
                    .filter(|hex| hex.iter().all(u8::is_ascii_hexdigit))
                    .and_then(|hex| std::str::from_utf8(hex).ok())
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok());
                match escaped {
                    Some(byte) => {
                        out.push(byte);
                        i += 2;
                    }
                    None => out.push(b'%'),
                }
            }
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BilletError;

    fn link(id: &str, pw: &str) -> ShareLink {
        ShareLink::new(LetterId::new(id).unwrap(), Passphrase::new(pw).unwrap())
    }

    #[test]
    fn formats_against_plain_base() {
        let url = link("my-letter-01", "abc123").to_url("https://example.com/");
        assert_eq!(url, "https://example.com/?letter=my-letter-01&password=abc123");
    }

    #[test]
    fn formats_against_base_with_query() {
        let url = link("x", "y").to_url("https://example.com/read?lang=zh#top");
        assert_eq!(url, "https://example.com/read?lang=zh&letter=x&password=y");
    }

    #[test]
    fn parses_complete_link() {
        let req =
            LinkRequest::from_url("https://example.com/?letter=my-letter-01&password=abc123")
                .unwrap();
        match req {
            LinkRequest::Open(l) => {
                assert_eq!(l.letter.as_str(), "my-letter-01");
                assert_eq!(l.password.expose(), "abc123");
            }
            other => panic!("expected Open, got {other:?}"),
        }
    }

    #[test]
    fn parses_bare_query() {
        let req = LinkRequest::from_url("password=abc&letter=hi").unwrap();
        assert!(matches!(req, LinkRequest::Open(_)));
    }

    #[test]
    fn no_params_is_landing() {
        assert!(matches!(
            LinkRequest::from_url("https://example.com/").unwrap(),
            LinkRequest::Landing
        ));
        assert!(matches!(
            LinkRequest::from_url("https://example.com/?theme=rose").unwrap(),
            LinkRequest::Landing
        ));
    }

    #[test]
    fn one_param_is_missing_params() {
        assert!(matches!(
            LinkRequest::from_url("https://example.com/?letter=abc").unwrap(),
            LinkRequest::MissingParams
        ));
        assert!(matches!(
            LinkRequest::from_url("https://example.com/?password=abc&letter=").unwrap(),
            LinkRequest::MissingParams
        ));
    }

    #[test]
    fn invalid_values_fail_validation() {
        let err = LinkRequest::from_url("?letter=My_Letter&password=abc").unwrap_err();
        assert!(matches!(err, BilletError::ValidationFailed(_)));
        let err = LinkRequest::from_url("?letter=ok&password=a%20b").unwrap_err();
        assert!(matches!(err, BilletError::ValidationFailed(_)));
    }

    #[test]
    fn repeated_param_keeps_first_value() {
        match LinkRequest::from_url("?letter=first&password=abc&letter=second").unwrap() {
            LinkRequest::Open(l) => assert_eq!(l.letter.as_str(), "first"),
            other => panic!("expected Open, got {other:?}"),
        }
        assert!(matches!(
            LinkRequest::from_url("?letter=&password=abc&letter=late").unwrap(),
            LinkRequest::MissingParams
        ));
    }

    #[test]
    fn values_are_percent_decoded() {
        match LinkRequest::from_url("?letter=spring%2D2025&pass%77ord=Rose42").unwrap() {
            LinkRequest::Open(l) => {
                assert_eq!(l.letter.as_str(), "spring-2025");
                assert_eq!(l.password.expose(), "Rose42");
            }
            other => panic!("expected Open, got {other:?}"),
        }
        let err = LinkRequest::from_url("?letter=ok&password=a+b").unwrap_err();
        assert!(matches!(err, BilletError::ValidationFailed(_)));
    }

    #[test]
    fn decode_component_handles_malformed_escapes() {
        assert_eq!(decode_component("a%2"), "a%2");
        assert_eq!(decode_component("%zz"), "%zz");
        assert_eq!(decode_component("%+f"), "% f");
        assert_eq!(decode_component("%E7%88%B1"), "爱");
        assert_eq!(decode_component("%FF"), "\u{fffd}");
    }

    #[test]
    fn formatted_link_parses_back() {
        let url = link("spring-2025", "Rose42").to_url("https://example.com/");
        match LinkRequest::from_url(&url).unwrap() {
            LinkRequest::Open(l) => {
                assert_eq!(l.letter.as_str(), "spring-2025");
                assert_eq!(l.password.expose(), "Rose42");
            }
            other => panic!("expected Open, got {other:?}"),
        }
    }
}
