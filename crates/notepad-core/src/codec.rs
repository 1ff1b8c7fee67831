//! Share-link token codec.
//!
//! Text travels in the link fragment as UTF-8 bytes, base64-encoded, then
//! percent-escaped. The second pass exists because `+`, `/` and `=` from
//! the base64 alphabet are not safe in every fragment context. Both passes
//! are required for tokens to round-trip through a browser location.
//!
//! ```text
//! "Hello 🌍" ─utf8→ 48 65 6c 6c 6f 20 f0 9f 8c 8d
//!            ─b64→  SGVsbG8g8J+MjQ==
//!            ─pct→  SGVsbG8g8J%2BMjQ%3D%3D
//! ```

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::error::DecodeError;

/// Characters left alone by the percent pass. Matches the unreserved set of
/// JavaScript's `encodeURIComponent`, so tokens are interchangeable with
/// links produced in a browser.
const FRAGMENT_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Encode text into a fragment-safe token. Empty text gives an empty token.
pub fn encode(text: &str) -> String {
    let b64 = STANDARD.encode(text.as_bytes());
    utf8_percent_encode(&b64, FRAGMENT_COMPONENT).to_string()
}

/// Reverse [`encode`].
///
/// Fails on malformed percent-escapes, anything outside the base64
/// alphabet, bad padding, or bytes that are not UTF-8. Never returns
/// partially decoded text.
pub fn decode(token: &str) -> Result<String, DecodeError> {
    check_escapes(token)?;
    let b64: Vec<u8> = percent_decode_str(token).collect();
    let bytes = STANDARD.decode(&b64)?;
    Ok(String::from_utf8(bytes)?)
}

/// `percent_decode_str` passes stray `%` through untouched; reject them here.
fn check_escapes(token: &str) -> Result<(), DecodeError> {
    let bytes = token.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                return Err(DecodeError::InvalidEscape { position: i });
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_fragment_safe(token: &str) -> bool {
        let bytes = token.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'%' => {
                    if !(i + 2 < bytes.len()
                        && bytes[i + 1].is_ascii_hexdigit()
                        && bytes[i + 2].is_ascii_hexdigit())
                    {
                        return false;
                    }
                    i += 3;
                }
                b if b.is_ascii_alphanumeric() => i += 1,
                b'-' | b'_' | b'.' | b'!' | b'~' | b'*' | b'\'' | b'(' | b')' => i += 1,
                _ => return false,
            }
        }
        true
    }

    #[test]
    fn test_hello_globe_roundtrip() {
        let token = encode("Hello 🌍");
        assert_eq!(token, "SGVsbG8g8J%2BMjQ%3D%3D");
        assert_eq!(decode(&token).unwrap(), "Hello 🌍");
    }

    #[test]
    fn test_multilingual_roundtrip() {
        let samples = [
            "안녕하세요, 메모장입니다",
            "日本語のテキスト",
            "e\u{301}le\u{300}ve combining marks",
            "👨‍👩‍👧‍👦 family + flags 🇰🇷🇺🇸",
            "line one\nline two\r\n\ttabbed",
            "?&#=/+ url-ish characters",
            "a",
        ];
        for s in samples {
            let token = encode(s);
            assert!(is_fragment_safe(&token), "unsafe token for {s:?}: {token}");
            assert_eq!(decode(&token).unwrap(), s);
        }
    }

    #[test]
    fn test_empty_text_gives_empty_token() {
        assert_eq!(encode(""), "");
        assert_eq!(decode("").unwrap(), "");
    }

    #[test]
    fn test_reserved_base64_chars_are_escaped() {
        // 0xfb 0xff encodes to "+/8=" in standard base64.
        let raw = STANDARD.encode([0xfb, 0xff]);
        assert_eq!(raw, "+/8=");
        let escaped = utf8_percent_encode(&raw, FRAGMENT_COMPONENT).to_string();
        assert_eq!(escaped, "%2B%2F8%3D");
    }

    #[test]
    fn test_decode_rejects_bad_escape() {
        assert!(matches!(
            decode("%zz"),
            Err(DecodeError::InvalidEscape { position: 0 })
        ));
        assert!(matches!(
            decode("SGVs%4"),
            Err(DecodeError::InvalidEscape { position: 4 })
        ));
        assert!(matches!(
            decode("abc%"),
            Err(DecodeError::InvalidEscape { position: 3 })
        ));
    }

    #[test]
    fn test_decode_rejects_invalid_alphabet() {
        assert!(matches!(decode("SGVs$G8="), Err(DecodeError::Base64(_))));
        assert!(matches!(decode("%26%26%26%26"), Err(DecodeError::Base64(_))));
    }

    #[test]
    fn test_decode_rejects_bad_padding() {
        // Valid payload with its padding stripped.
        assert!(matches!(decode("SGVsbG8"), Err(DecodeError::Base64(_))));
        assert!(matches!(decode("SGVsbG8=="), Err(DecodeError::Base64(_))));
    }

    #[test]
    fn test_decode_rejects_non_utf8_payload() {
        // "/w==" is the single byte 0xff.
        assert!(matches!(decode("%2Fw%3D%3D"), Err(DecodeError::Utf8(_))));
    }

    #[test]
    fn test_decode_accepts_unescaped_base64() {
        // A browser may hand back the fragment already unescaped.
        assert_eq!(decode("SGVsbG8g8J+MjQ==").unwrap(), "Hello 🌍");
    }
}
