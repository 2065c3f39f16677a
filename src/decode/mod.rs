//! Field decoding: text under a fixed charset and fast numeric parsers.
//!
//! A [`Decoder`] is a small `Copy` value threaded from the parser
//! configuration into every field. It decides how bytes become text
//! ([`Charset`]) and which numeric parsers run ([`NumberParsing`]).
//!
//! The fast parsers accept exactly what the standard library parsers
//! accept. Integers are accumulated by hand with an exact overflow check;
//! doubles take a mantissa and power-of-ten shortcut when the result is
//! guaranteed to be correctly rounded and defer to `str::parse` otherwise.

mod doubles;
mod ints;
mod text;

use std::borrow::Cow;

use thiserror::Error;

/// Character set used to turn field bytes into text.
///
/// Both charsets encode ASCII separators and digits as single bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    /// UTF-8; invalid sequences are replaced with U+FFFD.
    #[default]
    Utf8,
    /// ISO-8859-1; every byte maps to the code point of the same value.
    Latin1,
}

/// Which numeric parsers a [`Decoder`] uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberParsing {
    /// Hand-written byte parsers with a fallback for hard inputs.
    #[default]
    Fast,
    /// Standard library parsers on the decoded text.
    Precise,
}

/// Errors from converting a field to a number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The field holds no bytes.
    #[error("cannot parse a number from an empty field")]
    Empty,

    /// A byte other than a digit (or the sign at the start).
    #[error("invalid digit in {text:?}")]
    InvalidDigit {
        /// The offending field text.
        text: String,
    },

    /// A sign with no digits after it.
    #[error("sign without digits: {text:?}")]
    LoneSign {
        /// The offending field text.
        text: String,
    },

    /// The value does not fit the target type.
    #[error("number out of range: {text:?}")]
    Overflow {
        /// The offending field text.
        text: String,
    },

    /// Not a valid floating point literal.
    #[error("invalid float literal {text:?}")]
    InvalidFloat {
        /// The offending field text.
        text: String,
    },
}

impl DecodeError {
    pub(crate) fn invalid_digit(bytes: &[u8]) -> Self {
        Self::InvalidDigit {
            text: lossy(bytes),
        }
    }

    pub(crate) fn lone_sign(bytes: &[u8]) -> Self {
        Self::LoneSign {
            text: lossy(bytes),
        }
    }

    pub(crate) fn overflow(bytes: &[u8]) -> Self {
        Self::Overflow {
            text: lossy(bytes),
        }
    }

    pub(crate) fn invalid_float(bytes: &[u8]) -> Self {
        Self::InvalidFloat {
            text: lossy(bytes),
        }
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Converts field bytes to text and numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Decoder {
    charset: Charset,
    numbers: NumberParsing,
}

impl Decoder {
    /// Creates a decoder.
    pub fn new(charset: Charset, numbers: NumberParsing) -> Self {
        Self { charset, numbers }
    }

    /// The charset used for text.
    pub fn charset(&self) -> Charset {
        self.charset
    }

    /// The numeric parser selection.
    pub fn number_parsing(&self) -> NumberParsing {
        self.numbers
    }

    /// Decodes field text, collapsing doubled quotes when `quote` is given.
    ///
    /// Borrows from `bytes` whenever no rewriting is needed.
    pub fn decode_str<'a>(&self, bytes: &'a [u8], quote: Option<u8>) -> Cow<'a, str> {
        text::decode(bytes, quote, self.charset)
    }

    /// Parses a signed 32-bit integer.
    pub fn parse_i32(&self, bytes: &[u8]) -> Result<i32, DecodeError> {
        match self.numbers {
            NumberParsing::Fast => ints::parse_i32(bytes),
            NumberParsing::Precise => ints::parse_std(bytes),
        }
    }

    /// Parses a signed 64-bit integer.
    pub fn parse_i64(&self, bytes: &[u8]) -> Result<i64, DecodeError> {
        match self.numbers {
            NumberParsing::Fast => ints::parse_i64(bytes),
            NumberParsing::Precise => ints::parse_std(bytes),
        }
    }

    /// Parses a signed 16-bit integer.
    pub fn parse_i16(&self, bytes: &[u8]) -> Result<i16, DecodeError> {
        let wide = self.parse_i32(bytes)?;
        i16::try_from(wide).map_err(|_| DecodeError::overflow(bytes))
    }

    /// Parses a signed 8-bit integer.
    pub fn parse_i8(&self, bytes: &[u8]) -> Result<i8, DecodeError> {
        let wide = self.parse_i32(bytes)?;
        i8::try_from(wide).map_err(|_| DecodeError::overflow(bytes))
    }

    /// Parses a 64-bit float.
    pub fn parse_f64(&self, bytes: &[u8]) -> Result<f64, DecodeError> {
        match self.numbers {
            NumberParsing::Fast => doubles::parse_fast(bytes),
            NumberParsing::Precise => doubles::parse_precise(bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_decoder() {
        let d = Decoder::default();
        assert_eq!(d.charset(), Charset::Utf8);
        assert_eq!(d.number_parsing(), NumberParsing::Fast);
    }

    #[test]
    fn test_narrow_ints() {
        let d = Decoder::default();
        assert_eq!(d.parse_i16(b"-32768"), Ok(i16::MIN));
        assert_eq!(d.parse_i8(b"127"), Ok(127));
        assert!(matches!(d.parse_i8(b"128"), Err(DecodeError::Overflow { .. })));
        assert!(matches!(d.parse_i16(b"x"), Err(DecodeError::InvalidDigit { .. })));
    }

    #[test]
    fn test_modes_agree() {
        let fast = Decoder::new(Charset::Utf8, NumberParsing::Fast);
        let precise = Decoder::new(Charset::Utf8, NumberParsing::Precise);
        for input in ["0", "-17", "+42", "2147483647", "-2147483648", "2147483648", "", "-", "1a"] {
            assert_eq!(
                fast.parse_i32(input.as_bytes()),
                precise.parse_i32(input.as_bytes()),
                "input {input:?}"
            );
        }
        for input in ["1.5", "-0.25", "1e3", "nan", "", "."] {
            let a = fast.parse_f64(input.as_bytes());
            let b = precise.parse_f64(input.as_bytes());
            match (a, b) {
                (Ok(x), Ok(y)) => assert!(x == y || (x.is_nan() && y.is_nan()), "input {input:?}"),
                (Err(_), Err(_)) => {}
                other => panic!("disagreement on {input:?}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_error_display() {
        let err = DecodeError::invalid_digit(b"12x");
        assert_eq!(err.to_string(), "invalid digit in \"12x\"");
    }
}
