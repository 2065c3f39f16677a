//! Integer parsers.
//!
//! Digits are accumulated as a negative number so that `MIN` is reachable,
//! and each step is checked against a precomputed threshold before it can
//! overflow.

use std::num::IntErrorKind;
use std::str::FromStr;

use super::DecodeError;

macro_rules! quick_int_parser {
    ($name:ident, $ty:ty) => {
        pub(crate) fn $name(bytes: &[u8]) -> Result<$ty, DecodeError> {
            let (negative, digits) = match bytes.first() {
                None => return Err(DecodeError::Empty),
                Some(b'-') => (true, &bytes[1..]),
                Some(b'+') => (false, &bytes[1..]),
                Some(_) => (false, bytes),
            };
            if digits.is_empty() {
                return Err(DecodeError::lone_sign(bytes));
            }

            let limit: $ty = if negative { <$ty>::MIN } else { -<$ty>::MAX };
            let multmin = limit / 10;
            let mut result: $ty = 0;
            for &b in digits {
                let digit = b.wrapping_sub(b'0');
                if digit > 9 {
                    return Err(DecodeError::invalid_digit(bytes));
                }
                let digit = <$ty>::from(digit);
                if result < multmin {
                    return Err(DecodeError::overflow(bytes));
                }
                result *= 10;
                if result < limit + digit {
                    return Err(DecodeError::overflow(bytes));
                }
                result -= digit;
            }
            Ok(if negative { result } else { -result })
        }
    };
}

quick_int_parser!(parse_i32, i32);
quick_int_parser!(parse_i64, i64);

/// Standard library parse with errors mapped onto [`DecodeError`].
pub(crate) fn parse_std<T>(bytes: &[u8]) -> Result<T, DecodeError>
where
    T: FromStr<Err = std::num::ParseIntError>,
{
    let text = std::str::from_utf8(bytes).map_err(|_| DecodeError::invalid_digit(bytes))?;
    text.parse::<T>().map_err(|e| match e.kind() {
        IntErrorKind::Empty => DecodeError::Empty,
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => DecodeError::overflow(bytes),
        _ if text == "+" || text == "-" => DecodeError::lone_sign(bytes),
        _ => DecodeError::invalid_digit(bytes),
    })
}
