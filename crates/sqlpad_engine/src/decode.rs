use chardetng::EncodingDetector;
use encoding_rs::Encoding;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBody {
    pub text: String,
    pub encoding_label: String,
    /// Malformed sequences were replaced with U+FFFD.
    pub had_errors: bool,
}

/// Decode a response body into text using:
/// BOM -> Content-Type charset -> strict UTF-8 -> chardetng fallback.
///
/// Decoding never fails; malformed input is replaced, not rejected. The text
/// is otherwise untouched: no trimming, no newline normalization.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> DecodedBody {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(label) = content_type.and_then(extract_charset) {
        if let Some(enc) = Encoding::for_label(label.as_bytes()) {
            return decode_with(bytes, enc);
        }
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return DecodedBody {
            text: text.to_string(),
            encoding_label: encoding_rs::UTF_8.name().to_string(),
            had_errors: false,
        };
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let enc = detector.guess(None, true);
    decode_with(bytes, enc)
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let value = value.trim().trim_matches(&['"', '\''][..]);
        (!value.is_empty()).then(|| value.to_string())
    })
}

fn decode_with(bytes: &[u8], enc: &'static Encoding) -> DecodedBody {
    let (text, _, had_errors) = enc.decode(bytes);
    DecodedBody {
        text: text.into_owned(),
        encoding_label: enc.name().to_string(),
        had_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::SHIFT_JIS;

    fn text(bytes: &[u8], content_type: Option<&str>) -> String {
        decode_body(bytes, content_type).text
    }

    #[test]
    fn plain_utf8_without_charset() {
        let decoded = decode_body(b"42", None);
        assert_eq!(decoded.text, "42");
        assert_eq!(decoded.encoding_label, "UTF-8");
        assert!(!decoded.had_errors);
        assert_eq!(text(b"", None), "");
    }

    #[test]
    fn whitespace_is_preserved() {
        let body = b"  SELECT a\r\n  FROM t\n\n";
        assert_eq!(text(body, Some("text/plain")), "  SELECT a\r\n  FROM t\n\n");
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let body = b"\xEF\xBB\xBFok";
        assert_eq!(text(body, Some("text/plain; charset=latin1")), "ok");
    }

    #[test]
    fn declared_charset_wins_over_utf8_guess() {
        let body = b"caf\xE9";
        assert_eq!(
            text(body, Some("text/plain; Charset=\"ISO-8859-1\"")),
            "caf\u{e9}"
        );
    }

    #[test]
    fn shift_jis_declared_in_header() {
        let (bytes, _, _) = SHIFT_JIS.encode("やることはapi");
        let decoded = decode_body(&bytes, Some("application/json; charset=Shift_JIS"));
        assert_eq!(decoded.text, "やることはapi");
        assert_eq!(decoded.encoding_label, "Shift_JIS");
    }

    #[test]
    fn invalid_bytes_for_declared_utf8_are_replaced() {
        let decoded = decode_body(b"caf\xC3(", Some("text/plain; charset=utf-8"));
        assert_eq!(decoded.text, "caf\u{FFFD}(");
        assert!(decoded.had_errors);
    }

    #[test]
    fn truncated_utf16_after_bom_is_replaced() {
        let decoded = decode_body(b"\xff\xfe\xfd\x00\x81", None);
        assert_eq!(decoded.encoding_label, "UTF-16LE");
        assert_eq!(decoded.text, "\u{FD}\u{FFFD}");
        assert!(decoded.had_errors);
    }

    #[test]
    fn charset_parameter_lookup() {
        assert_eq!(
            extract_charset("text/html; CHARSET=utf-8"),
            Some("utf-8".to_string())
        );
        assert_eq!(extract_charset("text/html; boundary=x"), None);
        assert_eq!(extract_charset("charset=utf-8"), None);
        assert_eq!(extract_charset("text/html; charset="), None);
    }
}
