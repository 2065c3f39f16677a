//! Cursor over a single chunk.

use std::fmt;

use super::RawField;
use super::scan;
use crate::chunk::Chunk;

/// A `[start, end)` window over one [`Chunk`] with a forward-only cursor.
///
/// Holding a `SingleSlice` keeps its chunk alive; the buffer returns to its
/// pool only after every slice over it has been dropped.
pub struct SingleSlice {
    chunk: Chunk,
    start: usize,
    end: usize,
    pos: usize,
    after_sep: bool,
}

impl SingleSlice {
    /// Wraps the valid bytes of `chunk`.
    pub fn new(chunk: Chunk) -> Self {
        let end = chunk.len();
        Self::window(chunk, 0, end)
    }

    /// Wraps an owned byte buffer; mainly for tests and small inputs.
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self::new(Chunk::from_vec(data, true))
    }

    /// An empty slice.
    pub fn empty() -> Self {
        Self::new(Chunk::empty())
    }

    pub(crate) fn window(chunk: Chunk, start: usize, end: usize) -> Self {
        Self {
            chunk,
            start,
            end,
            pos: start,
            after_sep: false,
        }
    }

    #[inline]
    fn view(&self) -> &[u8] {
        &self.chunk.as_bytes()[..self.end]
    }

    /// The unread bytes.
    #[inline]
    pub fn remaining(&self) -> &[u8] {
        &self.chunk.as_bytes()[self.pos..self.end]
    }

    /// Total size of the window in bytes.
    pub fn size(&self) -> usize {
        self.end - self.start
    }

    /// Returns true while unread bytes remain.
    #[inline]
    pub fn has_more_data(&self) -> bool {
        self.pos < self.end
    }

    /// Returns true once every byte has been read.
    pub fn is_empty(&self) -> bool {
        !self.has_more_data()
    }

    /// The chunk this slice reads from.
    pub fn chunk(&self) -> &Chunk {
        &self.chunk
    }

    pub(crate) fn set_after_sep(&mut self, after_sep: bool) {
        self.after_sep = after_sep;
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn end(&self) -> usize {
        self.end
    }

    pub(crate) fn advance_to(&mut self, pos: usize) {
        debug_assert!(pos >= self.pos && pos <= self.end);
        self.pos = pos;
    }

    /// Skips leading CR/LF bytes. Returns whether any were skipped.
    pub fn front_trim(&mut self) -> bool {
        let (pos, seen) = scan::trim_line_ends(self.view(), self.pos);
        self.pos = pos;
        seen
    }

    /// Moves past the rest of the current line and its terminator run.
    ///
    /// Returns false when the slice ended before any terminator.
    pub fn next_line(&mut self) -> bool {
        self.after_sep = false;
        self.pos = scan::skip_line_content(self.view(), self.pos);
        self.front_trim()
    }

    /// Moves past the next separator on the current line.
    ///
    /// Returns false if the line or slice ended first; the cursor then rests
    /// on the terminator.
    pub fn skip_until(&mut self, sep: u8, quote: Option<u8>) -> bool {
        match scan::scan_field(self.view(), self.pos, sep, quote) {
            Some(span) => {
                self.pos = span.next;
                self.after_sep = span.sep_consumed;
                span.sep_consumed
            }
            None => {
                self.after_sep = false;
                false
            }
        }
    }

    /// Returns the next field of the current line.
    pub fn next_field(&mut self, sep: u8, quote: Option<u8>) -> Option<RawField<'_>> {
        match scan::scan_field(self.view(), self.pos, sep, quote) {
            Some(span) => {
                self.pos = span.next;
                self.after_sep = span.sep_consumed;
                Some(RawField {
                    bytes: &self.chunk.as_bytes()[span.start..span.end],
                    quoted: span.quoted,
                })
            }
            None if self.after_sep => {
                // A separator right before the line end leaves one empty field.
                self.after_sep = false;
                Some(RawField {
                    bytes: &[],
                    quoted: false,
                })
            }
            None => None,
        }
    }

    /// Splits at the last line terminator.
    ///
    /// The first slice runs from the cursor through the terminator; the
    /// second holds the unterminated tail and never contains a whole line.
    /// Both keep the chunk alive.
    pub fn split_on_last_line_end(self) -> (SingleSlice, SingleSlice) {
        let cut = match scan::after_last_line_end(self.remaining()) {
            Some(i) => self.pos + i,
            None => self.pos,
        };
        let head = SingleSlice::window(self.chunk.clone(), self.pos, cut);
        let tail = SingleSlice::window(self.chunk, cut, self.end);
        (head, tail)
    }

    /// The raw text of the line the cursor is on.
    pub fn current_line(&self) -> String {
        let window = &self.chunk.as_bytes()[self.start..self.end];
        let (begin, end) = scan::line_around(window, self.pos - self.start);
        String::from_utf8_lossy(&window[begin..end]).into_owned()
    }

    pub(crate) fn window_bytes(&self) -> &[u8] {
        &self.chunk.as_bytes()[self.start..self.end]
    }

    pub(crate) fn consumed(&self) -> usize {
        self.pos - self.start
    }
}

impl Default for SingleSlice {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for SingleSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleSlice")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("pos", &self.pos)
            .finish()
    }
}

impl fmt::Display for SingleSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.window_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS22: &str = "field11,field12\nfield21,field22";

    fn slice(s: &str) -> SingleSlice {
        SingleSlice::from_vec(s.as_bytes().to_vec())
    }

    fn text(f: Option<RawField<'_>>) -> Option<String> {
        f.map(|f| String::from_utf8_lossy(f.bytes).into_owned())
    }

    #[test]
    fn test_split_on_last_line_end() {
        let s = slice("line1\nline2\nlastline");
        let (head, tail) = s.split_on_last_line_end();
        assert_eq!(head.to_string(), "line1\nline2\n");
        assert_eq!(tail.to_string(), "lastline");
        assert_eq!(head.chunk().use_count(), 2);
    }

    #[test]
    fn test_split_after_skipped_line() {
        let mut s = slice("line1\nline2\nlastline");
        assert!(s.next_line());
        let (head, tail) = s.split_on_last_line_end();
        assert_eq!(head.to_string(), "line2\n");
        assert_eq!(tail.to_string(), "lastline");
    }

    #[test]
    fn test_split_without_terminator() {
        let (head, tail) = slice("no newline").split_on_last_line_end();
        assert!(head.is_empty());
        assert_eq!(tail.to_string(), "no newline");
    }

    #[test]
    fn test_fields_and_lines() {
        let mut s = slice(FIELDS22);
        assert_eq!(s.current_line(), "field11,field12");
        assert_eq!(text(s.next_field(b',', None)).as_deref(), Some("field11"));
        assert_eq!(text(s.next_field(b',', None)).as_deref(), Some("field12"));
        assert!(s.next_field(b',', None).is_none());
        assert!(s.next_line());
        assert_eq!(text(s.next_field(b',', None)).as_deref(), Some("field21"));
        assert_eq!(text(s.next_field(b',', None)).as_deref(), Some("field22"));
        assert!(s.next_field(b',', None).is_none());
        assert!(!s.next_line());
    }

    #[test]
    fn test_skip_until() {
        let mut s = slice(FIELDS22);
        assert!(s.skip_until(b',', None));
        assert_eq!(text(s.next_field(b',', None)).as_deref(), Some("field12"));
    }

    #[test]
    fn test_skip_until_quoted() {
        let mut s = slice("f1,\"f2,f2\",f3");
        assert!(s.skip_until(b',', Some(b'"')));
        assert!(s.skip_until(b',', Some(b'"')));
        assert_eq!(text(s.next_field(b',', Some(b'"'))).as_deref(), Some("f3"));
    }

    #[test]
    fn test_skip_until_stops_at_line_end() {
        let mut s = slice("a\nb,c");
        assert!(!s.skip_until(b',', None));
        assert!(!s.skip_until(b',', None));
        assert!(s.next_line());
        assert_eq!(text(s.next_field(b',', None)).as_deref(), Some("b"));
    }

    #[test]
    fn test_empty_fields() {
        let mut s = slice("f1,,f2");
        assert_eq!(text(s.next_field(b',', Some(b'"'))).as_deref(), Some("f1"));
        assert_eq!(text(s.next_field(b',', Some(b'"'))).as_deref(), Some(""));
        assert_eq!(text(s.next_field(b',', Some(b'"'))).as_deref(), Some("f2"));
        assert!(s.next_field(b',', Some(b'"')).is_none());
    }

    #[test]
    fn test_trailing_empty_fields() {
        let mut s = slice("a,,\nb");
        assert_eq!(text(s.next_field(b',', None)).as_deref(), Some("a"));
        assert_eq!(text(s.next_field(b',', None)).as_deref(), Some(""));
        assert_eq!(text(s.next_field(b',', None)).as_deref(), Some(""));
        assert!(s.next_field(b',', None).is_none());
        assert!(s.next_line());
        assert_eq!(text(s.next_field(b',', None)).as_deref(), Some("b"));
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let mut s = slice("a\r\n\r\nb");
        assert_eq!(text(s.next_field(b',', None)).as_deref(), Some("a"));
        assert!(s.next_line());
        assert_eq!(text(s.next_field(b',', None)).as_deref(), Some("b"));
    }

    #[test]
    fn test_current_line_at_terminator() {
        let mut s = slice("x,y\nz");
        s.next_field(b',', None);
        s.next_field(b',', None);
        assert_eq!(s.current_line(), "x,y");
    }
}
