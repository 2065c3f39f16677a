//! Byte scanning shared by single and composite slices.
//!
//! The scanning rules are written once against [`Scan`], which is
//! implemented both for a plain byte slice and for two byte slices read as
//! one. Positions are relative to the start of the scanned view.

use memchr::{memchr, memchr2, memchr3};

pub(crate) const CR: u8 = b'\r';
pub(crate) const LF: u8 = b'\n';

#[inline]
pub(crate) fn is_eol(b: u8) -> bool {
    b == CR || b == LF
}

/// Random access plus fast searches over a logical byte sequence.
pub(crate) trait Scan {
    fn len(&self) -> usize;

    fn at(&self, i: usize) -> u8;

    /// First index `>= from` holding `a`, `b` or `c`, or `len()`.
    fn find3(&self, from: usize, a: u8, b: u8, c: u8) -> usize;

    /// First index `>= from` holding CR or LF, or `len()`.
    fn find_eol(&self, from: usize) -> usize;
}

impl Scan for [u8] {
    #[inline]
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    #[inline]
    fn at(&self, i: usize) -> u8 {
        self[i]
    }

    #[inline]
    fn find3(&self, from: usize, a: u8, b: u8, c: u8) -> usize {
        match memchr3(a, b, c, &self[from..]) {
            Some(i) => from + i,
            None => <[u8]>::len(self),
        }
    }

    #[inline]
    fn find_eol(&self, from: usize) -> usize {
        match memchr2(CR, LF, &self[from..]) {
            Some(i) => from + i,
            None => <[u8]>::len(self),
        }
    }
}

/// Two byte slices scanned as if they were contiguous.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Joined<'a> {
    pub head: &'a [u8],
    pub tail: &'a [u8],
}

impl Joined<'_> {
    #[inline]
    fn split_search(&self, from: usize, search: impl Fn(&[u8], usize) -> usize) -> usize {
        let hl = self.head.len();
        if from < hl {
            let i = search(self.head, from);
            if i < hl {
                return i;
            }
            hl + search(self.tail, 0)
        } else {
            hl + search(self.tail, from - hl)
        }
    }
}

impl Scan for Joined<'_> {
    #[inline]
    fn len(&self) -> usize {
        self.head.len() + self.tail.len()
    }

    #[inline]
    fn at(&self, i: usize) -> u8 {
        let hl = self.head.len();
        if i < hl { self.head[i] } else { self.tail[i - hl] }
    }

    fn find3(&self, from: usize, a: u8, b: u8, c: u8) -> usize {
        self.split_search(from, |s, f| s.find3(f, a, b, c))
    }

    fn find_eol(&self, from: usize) -> usize {
        self.split_search(from, |s, f| s.find_eol(f))
    }
}

/// Location of one field found by [`scan_field`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldSpan {
    /// First content byte.
    pub start: usize,
    /// One past the last content byte.
    pub end: usize,
    /// Cursor position after the field and its separator.
    pub next: usize,
    /// Whether a trailing separator was consumed.
    pub sep_consumed: bool,
    /// Whether the field was opened with the quote byte.
    pub quoted: bool,
}

/// Scans the field starting at `pos`.
///
/// Returns `None` when `pos` sits at a line terminator or the end of the
/// view. A field opened with `quote` runs until a quote followed by the
/// separator, a line terminator or the end of data; a doubled quote is an
/// escaped literal and does not close the field. The returned span excludes
/// the surrounding quotes but leaves escaped quotes doubled.
///
/// A quote inside quoted content that happens to be followed by the
/// separator closes the field even if the writer meant it literally. That
/// case cannot be told apart without lookahead past the separator and is
/// left as is.
pub(crate) fn scan_field<B: Scan + ?Sized>(
    buf: &B,
    pos: usize,
    sep: u8,
    quote: Option<u8>,
) -> Option<FieldSpan> {
    let len = buf.len();
    if pos >= len || is_eol(buf.at(pos)) {
        return None;
    }
    if let Some(q) = quote {
        if buf.at(pos) == q {
            return Some(scan_quoted(buf, pos, sep, q));
        }
    }
    let end = buf.find3(pos, sep, CR, LF);
    let sep_consumed = end < len && buf.at(end) == sep;
    Some(FieldSpan {
        start: pos,
        end,
        next: if sep_consumed { end + 1 } else { end },
        sep_consumed,
        quoted: false,
    })
}

fn scan_quoted<B: Scan + ?Sized>(buf: &B, pos: usize, sep: u8, q: u8) -> FieldSpan {
    let len = buf.len();
    let start = pos + 1;
    let unterminated = |end: usize| FieldSpan {
        start,
        end,
        next: end,
        sep_consumed: false,
        quoted: true,
    };

    let mut i = start;
    loop {
        i = buf.find3(i, q, CR, LF);
        if i >= len {
            return unterminated(len);
        }
        if buf.at(i) != q {
            return unterminated(i);
        }
        if i + 1 >= len {
            return FieldSpan {
                start,
                end: i,
                next: len,
                sep_consumed: false,
                quoted: true,
            };
        }
        let after = buf.at(i + 1);
        if after == q {
            i += 2;
        } else if after == sep {
            return FieldSpan {
                start,
                end: i,
                next: i + 2,
                sep_consumed: true,
                quoted: true,
            };
        } else if is_eol(after) {
            return FieldSpan {
                start,
                end: i,
                next: i + 1,
                sep_consumed: false,
                quoted: true,
            };
        } else {
            i += 1;
        }
    }
}

/// Advances from `pos` to the first line terminator, or the end of the view.
#[inline]
pub(crate) fn skip_line_content<B: Scan + ?Sized>(buf: &B, pos: usize) -> usize {
    buf.find_eol(pos)
}

/// Advances past a run of CR/LF bytes. Returns the new position and whether
/// any terminator byte was consumed.
#[inline]
pub(crate) fn trim_line_ends<B: Scan + ?Sized>(buf: &B, mut pos: usize) -> (usize, bool) {
    let len = buf.len();
    let from = pos;
    while pos < len && is_eol(buf.at(pos)) {
        pos += 1;
    }
    (pos, pos > from)
}

/// Index one past the last CR or LF in `buf`, or `None` if there is none.
#[inline]
pub(crate) fn after_last_line_end(buf: &[u8]) -> Option<usize> {
    memchr::memrchr2(CR, LF, buf).map(|i| i + 1)
}

/// Bounds of the line around `cursor`: from just after the previous
/// terminator to just before the next one.
pub(crate) fn line_around(buf: &[u8], cursor: usize) -> (usize, usize) {
    let cursor = cursor.min(buf.len());
    let begin = memchr::memrchr2(CR, LF, &buf[..cursor]).map_or(0, |i| i + 1);
    let end = buf[cursor..].find_eol(0) + cursor;
    (begin, end)
}

/// Returns true if `quote` occurs in `bytes`.
#[inline]
pub(crate) fn contains(bytes: &[u8], quote: u8) -> bool {
    memchr(quote, bytes).is_some()
}
