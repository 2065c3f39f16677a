//! Text decoding.

use std::borrow::Cow;

use super::Charset;
use crate::slice::scan;

/// Decodes `bytes` under `charset`, collapsing doubled `quote` bytes.
pub(crate) fn decode(bytes: &[u8], quote: Option<u8>, charset: Charset) -> Cow<'_, str> {
    match quote {
        Some(q) if scan::contains(bytes, q) => {
            let collapsed = collapse_quotes(bytes, q);
            Cow::Owned(decode_charset(&collapsed, charset).into_owned())
        }
        _ => decode_charset(bytes, charset),
    }
}

fn decode_charset(bytes: &[u8], charset: Charset) -> Cow<'_, str> {
    match charset {
        Charset::Utf8 => String::from_utf8_lossy(bytes),
        Charset::Latin1 => match std::str::from_utf8(bytes) {
            Ok(s) if bytes.is_ascii() => Cow::Borrowed(s),
            _ => Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect()),
        },
    }
}

/// Replaces each `qq` pair with a single `q`. Unpaired quotes are kept.
fn collapse_quotes(bytes: &[u8], q: u8) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        out.push(bytes[i]);
        if bytes[i] == q && bytes.get(i + 1) == Some(&q) {
            i += 2;
        } else {
            i += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_borrows_when_unchanged() {
        assert!(matches!(decode(b"plain", Some(b'"'), Charset::Utf8), Cow::Borrowed("plain")));
        assert!(matches!(decode(b"plain", None, Charset::Latin1), Cow::Borrowed("plain")));
    }

    #[test]
    fn test_collapses_doubled_quotes() {
        assert_eq!(decode(b"f\"\"4", Some(b'"'), Charset::Utf8), "f\"4");
        assert_eq!(decode(b"\"\"\"\"", Some(b'"'), Charset::Utf8), "\"\"");
        assert_eq!(decode(b"a\"b", Some(b'"'), Charset::Utf8), "a\"b");
        assert_eq!(decode(b"f\"\"4", None, Charset::Utf8), "f\"\"4");
    }

    #[test]
    fn test_charsets() {
        let bytes = [b'c', b'a', b'f', 0xE9];
        assert_eq!(decode(&bytes, None, Charset::Latin1), "café");
        assert_eq!(decode("café".as_bytes(), None, Charset::Utf8), "café");
        assert_eq!(decode(&bytes, None, Charset::Utf8), "caf\u{FFFD}");
    }
}
