//! Percent-encoding under the OAuth parameter encoding rules.
//!
//! Text is encoded as UTF-8 and every byte outside the unreserved set is
//! rendered as `%XX` with uppercase hexadecimal digits.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

// https://tools.ietf.org/html/rfc5849#section-3.6
// * ALPHA, DIGIT, '-', '.', '_', '~' MUST NOT be encoded.
// * All other characters MUST be encoded.
// * The two hexadecimal characters used to represent encoded
//   characters MUST be uppercase.
const TARGETS_STRICT: &AsciiSet = &percent_encoding::NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

// Legacy consumers expect these sub-delimiters to pass through untouched.
// '*' stays encoded: "&=*" must give "%26%3D%2A" in both modes.
const TARGETS_RELAXED: &AsciiSet = &TARGETS_STRICT
    .remove(b'!')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Which characters are allowed to pass through unencoded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodeMode {
    /// Only the RFC 3986 unreserved characters pass through.
    #[default]
    Strict,
    /// Strict plus `!'()`.
    Relaxed,
}

impl EncodeMode {
    fn targets(self) -> &'static AsciiSet {
        match self {
            EncodeMode::Strict => TARGETS_STRICT,
            EncodeMode::Relaxed => TARGETS_RELAXED,
        }
    }
}

/// Percent-encode `text`. Total over all input; `""` encodes to `""`.
///
/// Not idempotent: encoding an encoded string escapes its `%` again.
pub fn encode(text: &str, mode: EncodeMode) -> String {
    utf8_percent_encode(text, mode.targets()).to_string()
}

/// Like [`encode`], but borrows the input when nothing had to be escaped.
pub fn encode_cow<'a, T: Into<Cow<'a, str>>>(input: T, mode: EncodeMode) -> Cow<'a, str> {
    match input.into() {
        Cow::Borrowed(r) => Cow::from(utf8_percent_encode(r, mode.targets())),
        Cow::Owned(v) => Cow::Owned(utf8_percent_encode(&v, mode.targets()).to_string()),
    }
}

/// Shorthand for `encode(text, EncodeMode::Strict)`.
pub fn encode_strict(text: &str) -> String {
    encode(text, EncodeMode::Strict)
}

/// Percent-decode `text`. Invalid UTF-8 sequences are replaced with U+FFFD.
pub fn decode(text: &str) -> Cow<'_, str> {
    percent_decode_str(text).decode_utf8_lossy()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // http://wiki.oauth.net/w/page/12238556/TestCases
    const STANDARD_CASES: &[(&str, &str)] = &[
        ("abcABC123", "abcABC123"),
        ("-._~", "-._~"),
        ("%", "%25"),
        ("+", "%2B"),
        ("&=*", "%26%3D%2A"),
        ("\u{000A}", "%0A"),
        ("\u{0020}", "%20"),
        ("\u{007F}", "%7F"),
        ("\u{0080}", "%C2%80"),
        ("\u{3001}", "%E3%80%81"),
    ];

    #[test]
    fn test_strict_standard_cases() {
        for (input, expected) in STANDARD_CASES {
            assert_eq!(encode(input, EncodeMode::Strict), *expected, "{:?}", input);
        }
    }

    #[test]
    fn test_relaxed_standard_cases() {
        for (input, expected) in STANDARD_CASES {
            assert_eq!(encode(input, EncodeMode::Relaxed), *expected, "{:?}", input);
        }
    }

    #[test]
    fn test_modes_differ_on_legacy_characters() {
        assert_eq!(encode("!'()", EncodeMode::Strict), "%21%27%28%29");
        assert_eq!(encode("!'()", EncodeMode::Relaxed), "!'()");
        assert_eq!(encode("*", EncodeMode::Relaxed), "%2A");
    }

    #[test]
    fn test_empty() {
        assert_eq!(encode("", EncodeMode::Strict), "");
        assert_eq!(encode("", EncodeMode::Relaxed), "");
    }

    #[test]
    fn test_not_idempotent() {
        let once = encode_strict("a b");
        assert_eq!(once, "a%20b");
        assert_eq!(encode_strict(&once), "a%2520b");
    }

    #[test]
    fn test_encode_cow_borrows_when_clean() {
        assert!(matches!(
            encode_cow("plain-value", EncodeMode::Strict),
            Cow::Borrowed("plain-value")
        ));
        assert_eq!(encode_cow(String::from("a&b"), EncodeMode::Strict), "a%26b");
        assert_eq!(encode_cow(String::from("ab"), EncodeMode::Strict), "ab");
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode("%E3%80%81"), "\u{3001}");
        assert_eq!(decode("a%20b+c"), "a b+c");
        assert_eq!(decode(&encode_strict("ü & ☃")), "ü & ☃");
    }

    proptest! {
        #[test]
        fn unreserved_text_passes_through(text in "[A-Za-z0-9._~-]*") {
            prop_assert_eq!(encode(&text, EncodeMode::Strict), text.clone());
            prop_assert_eq!(encode(&text, EncodeMode::Relaxed), text);
        }

        #[test]
        fn strict_output_is_ascii_unreserved_or_escape(text in any::<String>()) {
            let encoded = encode_strict(&text);
            prop_assert!(encoded
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b"-._~%".contains(&b)));
            prop_assert_eq!(decode(&encoded), text);
        }
    }
}
