//! Double parsers.

use super::DecodeError;

/// Digits a mantissa may have and still be exact in an `f64`.
const MAX_EXACT_DIGITS: u32 = 15;

/// Powers of ten exactly representable in an `f64`.
const POW10: [f64; 23] = [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15, 1e16,
    1e17, 1e18, 1e19, 1e20, 1e21, 1e22,
];

/// Parses plain decimals (`[+-]digits[.digits]`) as `mantissa / 10^exp`.
///
/// With an exact mantissa and an exact power of ten the single division is
/// correctly rounded, so the result equals [`parse_precise`]. Anything else
/// (exponents, long mantissas, `inf`, `nan`, malformed text) goes to
/// [`parse_precise`].
pub(crate) fn parse_fast(bytes: &[u8]) -> Result<f64, DecodeError> {
    let (negative, body) = match bytes.first() {
        None => return Err(DecodeError::Empty),
        Some(b'-') => (true, &bytes[1..]),
        Some(b'+') => (false, &bytes[1..]),
        Some(_) => (false, bytes),
    };

    let mut mantissa: u64 = 0;
    let mut digits = 0u32;
    let mut dot = None;
    for (i, &b) in body.iter().enumerate() {
        match b {
            b'0'..=b'9' => {
                if digits == MAX_EXACT_DIGITS {
                    return parse_precise(bytes);
                }
                mantissa = mantissa * 10 + u64::from(b - b'0');
                digits += 1;
            }
            b'.' if dot.is_none() => dot = Some(i),
            _ => return parse_precise(bytes),
        }
    }
    if digits == 0 {
        return parse_precise(bytes);
    }

    let exp = dot.map_or(0, |d| body.len() - d - 1);
    let Some(&scale) = POW10.get(exp) else {
        return parse_precise(bytes);
    };
    // Mantissa below 10^15 converts exactly.
    let value = mantissa as f64 / scale;
    Ok(if negative { -value } else { value })
}

/// Standard library parse with errors mapped onto [`DecodeError`].
pub(crate) fn parse_precise(bytes: &[u8]) -> Result<f64, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| DecodeError::invalid_float(bytes))
}
