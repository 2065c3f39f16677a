//! A held-over line prefix joined with the next chunk.

use std::fmt;

use super::RawField;
use super::SingleSlice;
use super::scan::{self, FieldSpan, Joined};

/// Two slices read as one: the unterminated tail of the previous chunk and
/// the line-aligned head of the next.
///
/// Operations scan a [`Joined`] view starting at both cursors and map the
/// resulting position back onto them. A field whose bytes cross from the
/// prefix into the suffix is copied into a scratch buffer owned by the
/// slice; that is the only copy the tokenizer ever makes and it happens at
/// most once per chunk boundary.
pub struct CompositeSlice {
    prefix: SingleSlice,
    suffix: SingleSlice,
    scratch: Vec<u8>,
    after_sep: bool,
}

enum Located {
    Prefix(usize, usize),
    Suffix(usize, usize),
    Scratch,
}

impl CompositeSlice {
    pub(crate) fn new(prefix: SingleSlice, suffix: SingleSlice) -> Self {
        Self {
            prefix,
            suffix,
            scratch: Vec::new(),
            after_sep: false,
        }
    }

    /// True once every prefix byte has been read.
    #[inline]
    pub(crate) fn prefix_exhausted(&self) -> bool {
        self.prefix.is_empty()
    }

    /// Gives up the suffix, carrying the cursor state over.
    pub(crate) fn into_suffix(self) -> SingleSlice {
        let CompositeSlice {
            mut suffix,
            after_sep,
            ..
        } = self;
        suffix.set_after_sep(after_sep);
        suffix
    }

    pub(crate) fn into_parts(self) -> (SingleSlice, SingleSlice) {
        (self.prefix, self.suffix)
    }

    pub(crate) fn size(&self) -> usize {
        self.prefix.size() + self.suffix.size()
    }

    pub(crate) fn has_more_data(&self) -> bool {
        self.prefix.has_more_data() || self.suffix.has_more_data()
    }

    #[inline]
    fn joined(&self) -> Joined<'_> {
        Joined {
            head: self.prefix.remaining(),
            tail: self.suffix.remaining(),
        }
    }

    /// Moves both cursors to logical position `next` of the current view.
    fn advance(&mut self, next: usize) {
        let head = self.prefix.remaining().len();
        if next <= head {
            self.prefix.advance_to(self.prefix.pos() + next);
        } else {
            self.prefix.advance_to(self.prefix.end());
            self.suffix.advance_to(self.suffix.pos() + (next - head));
        }
    }

    pub(crate) fn front_trim(&mut self) -> bool {
        let (next, seen) = scan::trim_line_ends(&self.joined(), 0);
        self.advance(next);
        seen
    }

    pub(crate) fn next_line(&mut self) -> bool {
        self.after_sep = false;
        let next = scan::skip_line_content(&self.joined(), 0);
        self.advance(next);
        self.front_trim()
    }

    pub(crate) fn skip_until(&mut self, sep: u8, quote: Option<u8>) -> bool {
        match scan::scan_field(&self.joined(), 0, sep, quote) {
            Some(span) => {
                self.advance(span.next);
                self.after_sep = span.sep_consumed;
                span.sep_consumed
            }
            None => {
                self.after_sep = false;
                false
            }
        }
    }

    pub(crate) fn next_field(&mut self, sep: u8, quote: Option<u8>) -> Option<RawField<'_>> {
        let span = match scan::scan_field(&self.joined(), 0, sep, quote) {
            Some(span) => span,
            None if self.after_sep => {
                self.after_sep = false;
                return Some(RawField {
                    bytes: &[],
                    quoted: false,
                });
            }
            None => return None,
        };

        let located = self.locate(&span);
        self.advance(span.next);
        self.after_sep = span.sep_consumed;

        let bytes = match located {
            Located::Prefix(a, b) => &self.prefix.chunk().as_bytes()[a..b],
            Located::Suffix(a, b) => &self.suffix.chunk().as_bytes()[a..b],
            Located::Scratch => &self.scratch[..],
        };
        Some(RawField {
            bytes,
            quoted: span.quoted,
        })
    }

    /// Resolves a logical span to absolute chunk offsets, copying it into the
    /// scratch buffer when it crosses the prefix/suffix boundary.
    fn locate(&mut self, span: &FieldSpan) -> Located {
        let head = self.prefix.remaining().len();
        let p0 = self.prefix.pos();
        let s0 = self.suffix.pos();
        if span.end <= head {
            Located::Prefix(p0 + span.start, p0 + span.end)
        } else if span.start >= head {
            Located::Suffix(s0 + span.start - head, s0 + span.end - head)
        } else {
            self.scratch.clear();
            self.scratch
                .extend_from_slice(&self.prefix.remaining()[span.start..]);
            self.scratch
                .extend_from_slice(&self.suffix.remaining()[..span.end - head]);
            Located::Scratch
        }
    }

    pub(crate) fn current_line(&self) -> String {
        let mut whole = Vec::with_capacity(self.size());
        whole.extend_from_slice(self.prefix.window_bytes());
        whole.extend_from_slice(self.suffix.window_bytes());
        let cursor = self.prefix.consumed() + self.suffix.consumed();
        let (begin, end) = scan::line_around(&whole, cursor);
        String::from_utf8_lossy(&whole[begin..end]).into_owned()
    }
}

impl fmt::Debug for CompositeSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeSlice")
            .field("prefix", &self.prefix)
            .field("suffix", &self.suffix)
            .finish()
    }
}

impl fmt::Display for CompositeSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.suffix)
    }
}
