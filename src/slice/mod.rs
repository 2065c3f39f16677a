//! Byte slices: cursors over one or two chunks.
//!
//! [`ByteSlice`] is the tokenizer. It walks lines and fields of delimited
//! text without copying, handing out [`RawField`] views that borrow the
//! underlying chunk.
//!
//! A slice is either [`ByteSlice::Single`], a window over one chunk, or
//! [`ByteSlice::Composite`], the unterminated tail of one chunk joined with
//! the head of the next. A composite slice turns itself into a single slice
//! over its suffix as soon as the prefix has been read, so the rest of the
//! work unit runs on the single-chunk fast path.
//!
//! # Example
//!
//! ```
//! use quickcsv::{ByteSlice, SingleSlice};
//!
//! let prefix = SingleSlice::from_vec(b"a,b".to_vec());
//! let suffix = SingleSlice::from_vec(b"c,d\ne".to_vec());
//! let mut slice = ByteSlice::join(prefix, suffix);
//!
//! assert_eq!(slice.next_field(b',', None).unwrap().bytes, b"a");
//! assert_eq!(slice.next_field(b',', None).unwrap().bytes, b"bc");
//! assert_eq!(slice.next_field(b',', None).unwrap().bytes, b"d");
//! assert!(slice.next_field(b',', None).is_none());
//! assert!(slice.next_line());
//! assert_eq!(slice.next_field(b',', None).unwrap().bytes, b"e");
//! ```

mod composite;
pub(crate) mod scan;
mod single;

use std::fmt;

pub use composite::CompositeSlice;
pub use single::SingleSlice;

use crate::chunk::Chunk;

/// Bytes of one field as found by the scanner.
///
/// For a quoted field `bytes` excludes the surrounding quotes and still
/// contains escaped quotes doubled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawField<'a> {
    /// Field content.
    pub bytes: &'a [u8],
    /// Whether the field was opened with the quote byte.
    pub quoted: bool,
}

/// Line and field cursor over one or two chunks.
pub enum ByteSlice {
    /// Window over a single chunk.
    Single(SingleSlice),
    /// Held-over prefix followed by a new chunk.
    Composite(CompositeSlice),
}

impl ByteSlice {
    /// Wraps a whole chunk.
    pub fn wrap(chunk: Chunk) -> Self {
        ByteSlice::Single(SingleSlice::new(chunk))
    }

    /// An empty slice.
    pub fn empty() -> Self {
        ByteSlice::Single(SingleSlice::empty())
    }

    /// Reads `prefix` and then `suffix` as one slice.
    ///
    /// Empty halves are dropped rather than joined.
    pub fn join(prefix: SingleSlice, suffix: SingleSlice) -> Self {
        if prefix.is_empty() {
            ByteSlice::Single(suffix)
        } else if suffix.is_empty() {
            ByteSlice::Single(prefix)
        } else {
            ByteSlice::Composite(CompositeSlice::new(prefix, suffix))
        }
    }

    /// Switches an exhausted-prefix composite to its suffix.
    #[inline]
    fn flip(&mut self) {
        if matches!(self, ByteSlice::Composite(c) if c.prefix_exhausted()) {
            if let ByteSlice::Composite(c) = std::mem::take(self) {
                *self = ByteSlice::Single(c.into_suffix());
            }
        }
    }

    /// Returns true if this slice still reads from two chunks.
    pub fn is_composite(&self) -> bool {
        matches!(self, ByteSlice::Composite(_))
    }

    /// Total size in bytes.
    pub fn size(&self) -> usize {
        match self {
            ByteSlice::Single(s) => s.size(),
            ByteSlice::Composite(c) => c.size(),
        }
    }

    /// Returns true while unread bytes remain.
    pub fn has_more_data(&self) -> bool {
        match self {
            ByteSlice::Single(s) => s.has_more_data(),
            ByteSlice::Composite(c) => c.has_more_data(),
        }
    }

    /// Returns true once every byte has been read.
    pub fn is_empty(&self) -> bool {
        !self.has_more_data()
    }

    /// Skips leading CR/LF bytes. Returns whether any were skipped.
    pub fn front_trim(&mut self) -> bool {
        self.flip();
        match self {
            ByteSlice::Single(s) => s.front_trim(),
            ByteSlice::Composite(c) => c.front_trim(),
        }
    }

    /// Moves past the rest of the current line and the terminator run after
    /// it.
    ///
    /// Returns whether any terminator was consumed; false means the end of
    /// the data was reached.
    pub fn next_line(&mut self) -> bool {
        self.flip();
        match self {
            ByteSlice::Single(s) => s.next_line(),
            ByteSlice::Composite(c) => c.next_line(),
        }
    }

    /// Moves past the next separator of the current line, honouring quoting
    /// when `quote` is set.
    ///
    /// Returns whether a separator was found before the line or slice ended.
    pub fn skip_until(&mut self, sep: u8, quote: Option<u8>) -> bool {
        self.flip();
        match self {
            ByteSlice::Single(s) => s.skip_until(sep, quote),
            ByteSlice::Composite(c) => c.skip_until(sep, quote),
        }
    }

    /// Returns the next field of the current line and moves past it and its
    /// separator.
    ///
    /// Returns `None` when the cursor is at a line terminator or the end of
    /// the slice and no field is pending. A separator directly before the
    /// line end yields one final empty field.
    pub fn next_field(&mut self, sep: u8, quote: Option<u8>) -> Option<RawField<'_>> {
        self.flip();
        match self {
            ByteSlice::Single(s) => s.next_field(sep, quote),
            ByteSlice::Composite(c) => c.next_field(sep, quote),
        }
    }

    /// Splits at the last line terminator into a line-aligned slice and an
    /// unterminated remainder.
    pub fn split_on_last_line_end(self) -> (ByteSlice, SingleSlice) {
        match self {
            ByteSlice::Single(s) => {
                let (head, tail) = s.split_on_last_line_end();
                (ByteSlice::Single(head), tail)
            }
            ByteSlice::Composite(c) => {
                let (prefix, suffix) = c.into_parts();
                let (head, tail) = suffix.split_on_last_line_end();
                if head.is_empty() {
                    // The suffix has no terminator; the cut falls inside the prefix.
                    let (aligned, rest) = prefix.split_on_last_line_end();
                    (ByteSlice::Single(aligned), rest.concat_with(tail))
                } else {
                    (ByteSlice::join(prefix, head), tail)
                }
            }
        }
    }

    /// Debug helper: raw text of the line under the cursor.
    ///
    /// Once a composite slice has switched to its suffix, a line that
    /// started in the prefix is returned without its prefix part.
    pub fn current_line(&self) -> String {
        match self {
            ByteSlice::Single(s) => s.current_line(),
            ByteSlice::Composite(c) => c.current_line(),
        }
    }
}

impl SingleSlice {
    /// Copies the unread bytes of `self` and `other` into one new slice.
    pub(crate) fn concat_with(self, other: SingleSlice) -> SingleSlice {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        let data = crate::util::combine(self.remaining(), other.remaining());
        SingleSlice::new(Chunk::from_vec(data, other.chunk().is_last()))
    }
}

impl Default for ByteSlice {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for ByteSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ByteSlice::Single(s) => s.fmt(f),
            ByteSlice::Composite(c) => c.fmt(f),
        }
    }
}

impl fmt::Display for ByteSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ByteSlice::Single(s) => s.fmt(f),
            ByteSlice::Composite(c) => c.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS22: &str = "field11,field12\nfield21,field22";
    const FIELDS33: &str =
        "field11,field12,field13\nfield21,field22,field23\nfield31,field32,field33";

    fn single(s: &str) -> SingleSlice {
        SingleSlice::from_vec(s.as_bytes().to_vec())
    }

    fn joined_at(content: &str, split: usize) -> ByteSlice {
        ByteSlice::join(single(&content[..split]), single(&content[split..]))
    }

    fn all_fields(slice: &mut ByteSlice, quote: Option<u8>) -> Vec<String> {
        let mut out = Vec::new();
        loop {
            match slice.next_field(b',', quote) {
                Some(f) => out.push(String::from_utf8_lossy(f.bytes).into_owned()),
                None => {
                    if !slice.next_line() {
                        break;
                    }
                }
            }
        }
        out
    }

    #[test]
    fn test_join_drops_empty_halves() {
        assert!(!ByteSlice::join(SingleSlice::empty(), single("a")).is_composite());
        assert!(!ByteSlice::join(single("a"), SingleSlice::empty()).is_composite());
        assert!(ByteSlice::join(single("a"), single("b")).is_composite());
    }

    #[test]
    fn test_single_slice_fields() {
        let mut slice = ByteSlice::Single(single(FIELDS22));
        assert_eq!(slice.current_line(), "field11,field12");
        assert_eq!(
            all_fields(&mut slice, None),
            vec!["field11", "field12", "field21", "field22"]
        );
    }

    #[test]
    fn test_multi_slice_field_split() {
        for split in 0..=FIELDS33.len() {
            let mut slice = joined_at(FIELDS33, split);
            assert_eq!(slice.to_string(), FIELDS33);
            assert_eq!(
                all_fields(&mut slice, None),
                vec![
                    "field11", "field12", "field13", "field21", "field22", "field23", "field31",
                    "field32", "field33"
                ],
                "failed on split index {split}"
            );
        }
    }

    #[test]
    fn test_multi_slice_quote_split() {
        let content = "f1,\"f2,f2\",f3,\"f\"\"4\"";
        for split in 0..=content.len() {
            let mut slice = joined_at(content, split);
            assert_eq!(slice.to_string(), content);
            assert_eq!(
                all_fields(&mut slice, Some(b'"')),
                vec!["f1", "f2,f2", "f3", "f\"\"4"],
                "failed on split index {split}"
            );
        }
    }

    #[test]
    fn test_multi_slice_skip() {
        for split in 0..=FIELDS33.len() {
            let mut slice = joined_at(FIELDS33, split);
            assert!(slice.skip_until(b',', None));
            assert_eq!(slice.next_field(b',', None).unwrap().bytes, b"field12");
            assert!(slice.next_line());
            assert_eq!(slice.next_field(b',', None).unwrap().bytes, b"field21");
            assert!(slice.skip_until(b',', None));
            assert_eq!(slice.next_field(b',', None).unwrap().bytes, b"field23");
        }
    }

    #[test]
    fn test_flip_releases_prefix_chunk() {
        let prefix = single("a,");
        let prefix_chunk = prefix.chunk().clone();
        let mut slice = ByteSlice::join(prefix, single("b\nc"));
        assert_eq!(prefix_chunk.use_count(), 2);

        assert_eq!(slice.next_field(b',', None).unwrap().bytes, b"a");
        assert!(slice.is_composite());
        assert_eq!(slice.next_field(b',', None).unwrap().bytes, b"b");
        assert!(!slice.is_composite(), "prefix exhausted, slice should flip");
        assert_eq!(prefix_chunk.use_count(), 1);
    }

    #[test]
    fn test_trailing_separator_survives_flip() {
        let mut slice = ByteSlice::join(single("a,"), single("\nb"));
        assert_eq!(slice.next_field(b',', None).unwrap().bytes, b"a");
        assert_eq!(slice.next_field(b',', None).unwrap().bytes, b"");
        assert!(slice.next_field(b',', None).is_none());
    }

    #[test]
    fn test_crlf_split_across_boundary() {
        let mut slice = ByteSlice::join(single("a\r"), single("\nb"));
        assert_eq!(slice.next_field(b',', None).unwrap().bytes, b"a");
        assert!(slice.next_line());
        assert_eq!(slice.next_field(b',', None).unwrap().bytes, b"b");
        assert!(!slice.next_line());
    }

    #[test]
    fn test_composite_split_on_last_line_end() {
        let slice = ByteSlice::join(single("x,"), single("y\nz,"));
        let (head, tail) = slice.split_on_last_line_end();
        assert_eq!(head.to_string(), "x,y\n");
        assert_eq!(tail.to_string(), "z,");
    }

    #[test]
    fn test_composite_split_without_terminator() {
        let slice = ByteSlice::join(single("x,"), single("y"));
        let (head, tail) = slice.split_on_last_line_end();
        assert!(head.is_empty());
        assert_eq!(tail.to_string(), "x,y");
    }

    #[test]
    fn test_current_line_in_composite() {
        let mut slice = ByteSlice::join(single("ab,c"), single("d,e\nf"));
        slice.next_field(b',', None);
        assert_eq!(slice.current_line(), "ab,cd,e");
    }
}
