//! Field views.
//!
//! - [`Field`] - Zero-copy view of one field, valid until the record moves on
//! - [`OwnedField`] - Detached copy backed by [`bytes::Bytes`]
//!
//! A `Field` borrows the record cursor it came from, so the borrow checker
//! stops it from outliving the next field access. Call
//! [`Field::to_owned_field`] to keep a value around.
//!
//! Primitive conversions fail on empty fields; use the `opt_*` variants
//! where an empty field means "no value".

use std::borrow::Cow;
use std::fmt;

use bytes::Bytes;

use crate::decode::{DecodeError, Decoder};
use crate::slice::RawField;

macro_rules! decoding_surface {
    () => {
        /// Returns true if the field holds no bytes.
        #[inline]
        pub fn is_empty(&self) -> bool {
            self.raw().is_empty()
        }

        /// Returns true if the field was enclosed in quotes.
        #[inline]
        pub fn is_quoted(&self) -> bool {
            self.quoted
        }

        /// Field text, with doubled quotes collapsed for quoted fields.
        pub fn as_str(&self) -> Cow<'_, str> {
            let collapse = if self.quoted { self.quote } else { None };
            self.decoder.decode_str(self.raw(), collapse)
        }

        /// First character of the field text, if any.
        pub fn as_char(&self) -> Option<char> {
            self.as_str().chars().next()
        }

        /// Parses the field as an `i8`.
        pub fn as_i8(&self) -> Result<i8, DecodeError> {
            self.decoder.parse_i8(self.raw())
        }

        /// Parses the field as an `i16`.
        pub fn as_i16(&self) -> Result<i16, DecodeError> {
            self.decoder.parse_i16(self.raw())
        }

        /// Parses the field as an `i32`.
        pub fn as_i32(&self) -> Result<i32, DecodeError> {
            self.decoder.parse_i32(self.raw())
        }

        /// Parses the field as an `i64`.
        pub fn as_i64(&self) -> Result<i64, DecodeError> {
            self.decoder.parse_i64(self.raw())
        }

        /// Parses the field as an `f64`.
        pub fn as_f64(&self) -> Result<f64, DecodeError> {
            self.decoder.parse_f64(self.raw())
        }

        /// Like [`as_i32`](Self::as_i32), but an empty field is `Ok(None)`.
        pub fn opt_i32(&self) -> Result<Option<i32>, DecodeError> {
            if self.is_empty() { Ok(None) } else { self.as_i32().map(Some) }
        }

        /// Like [`as_i64`](Self::as_i64), but an empty field is `Ok(None)`.
        pub fn opt_i64(&self) -> Result<Option<i64>, DecodeError> {
            if self.is_empty() { Ok(None) } else { self.as_i64().map(Some) }
        }

        /// Like [`as_f64`](Self::as_f64), but an empty field is `Ok(None)`.
        pub fn opt_f64(&self) -> Result<Option<f64>, DecodeError> {
            if self.is_empty() { Ok(None) } else { self.as_f64().map(Some) }
        }
    };
}

/// Zero-copy view of one field.
#[derive(Clone, Copy)]
pub struct Field<'a> {
    bytes: &'a [u8],
    quoted: bool,
    quote: Option<u8>,
    decoder: Decoder,
}

impl<'a> Field<'a> {
    pub(crate) fn new(raw: RawField<'a>, quote: Option<u8>, decoder: Decoder) -> Self {
        Self {
            bytes: raw.bytes,
            quoted: raw.quoted,
            quote,
            decoder,
        }
    }

    /// The field bytes, without surrounding quotes and with escaped quotes
    /// still doubled.
    #[inline]
    pub fn raw(&self) -> &'a [u8] {
        self.bytes
    }

    decoding_surface!();

    /// Copies the field out of the parse buffer.
    pub fn to_owned_field(&self) -> OwnedField {
        OwnedField {
            bytes: Bytes::copy_from_slice(self.bytes),
            quoted: self.quoted,
            quote: self.quote,
            decoder: self.decoder,
        }
    }
}

impl fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("text", &self.as_str())
            .field("quoted", &self.quoted)
            .finish()
    }
}

impl fmt::Display for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

/// A field detached from the parse buffer.
///
/// Cloning is cheap: the bytes are reference counted.
#[derive(Clone, PartialEq, Eq)]
pub struct OwnedField {
    bytes: Bytes,
    quoted: bool,
    quote: Option<u8>,
    decoder: Decoder,
}

impl OwnedField {
    /// The field bytes.
    #[inline]
    pub fn raw(&self) -> &[u8] {
        &self.bytes
    }

    /// The underlying buffer.
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    decoding_surface!();
}

impl fmt::Debug for OwnedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnedField")
            .field("text", &self.as_str())
            .field("quoted", &self.quoted)
            .finish()
    }
}

impl fmt::Display for OwnedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}
