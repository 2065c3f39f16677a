//! Line-aligned work units from a serial chunk source.
//!
//! Each chunk pulled from the source is cut at its last line terminator.
//! The part before the cut, joined with whatever was held over from the
//! previous chunk, becomes a work unit; the part after the cut is held over.
//! A unit therefore only ever holds whole lines and can be tokenized without
//! looking at any other unit.
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use std::sync::Arc;
//! use quickcsv::{BufferPool, ReaderSource, Splitter};
//!
//! let pool = Arc::new(BufferPool::new(8));
//! let source = ReaderSource::new(Cursor::new(b"a,b\nc,d\ne,f".to_vec()), pool);
//!
//! let units: Vec<String> = Splitter::new(source)
//!     .map(|unit| unit.map(|u| u.to_string()))
//!     .collect::<Result<_, _>>()?;
//! assert_eq!(units, ["a,b\nc,d\n", "e,f"]);
//! # Ok::<(), quickcsv::CsvError>(())
//! ```

use std::mem;

use tracing::debug;

use crate::chunk::{Chunk, ChunkSource};
use crate::config::Dialect;
use crate::decode::Decoder;
use crate::error::CsvError;
use crate::field::Field;
use crate::slice::{ByteSlice, SingleSlice};

/// Splits a chunk source into ordered, line-aligned work units.
///
/// Only one caller may pull from a `Splitter` at a time; this is the single
/// serialization point of a parallel parse. Units come out in source order
/// and never share a line.
///
/// A line longer than one chunk is carried across as many chunks as it
/// takes. Its bytes are appended to a growing spill buffer, so each byte is
/// copied once and the chunks it came from go straight back to the pool.
pub struct Splitter<S> {
    source: S,
    carry: SingleSlice,
    spill: Vec<u8>,
    pending: Option<ByteSlice>,
    skip_records: usize,
    units: u64,
    finished: bool,
}

impl<S: ChunkSource> Splitter<S> {
    /// Creates a splitter over `source`.
    pub fn new(source: S) -> Self {
        Self {
            source,
            carry: SingleSlice::empty(),
            spill: Vec::new(),
            pending: None,
            skip_records: 0,
            units: 0,
            finished: false,
        }
    }

    /// Drops the next `count` records before the first unit is handed out.
    pub fn with_skip_records(mut self, count: usize) -> Self {
        self.skip_records = count;
        self
    }

    /// Sets the number of records still to be dropped.
    pub(crate) fn set_skip_records(&mut self, count: usize) {
        self.skip_records = count;
    }

    /// Number of units handed out so far.
    pub fn units(&self) -> u64 {
        self.units
    }

    /// Returns true once the source has been drained.
    pub fn is_finished(&self) -> bool {
        self.finished && self.pending.is_none()
    }

    /// Returns the next non-empty work unit, or `None` at the end of input.
    ///
    /// # Errors
    ///
    /// Source errors are returned as [`CsvError::Io`]; the splitter is
    /// finished afterwards.
    pub fn next_unit(&mut self) -> Result<Option<ByteSlice>, CsvError> {
        loop {
            let unit = match self.pending.take() {
                Some(unit) => unit,
                None => match self.pull()? {
                    Some(unit) => unit,
                    None => return Ok(None),
                },
            };
            if let Some(unit) = self.skip_leading(unit) {
                self.units += 1;
                debug!(unit = self.units, bytes = unit.size(), "emitting work unit");
                return Ok(Some(unit));
            }
        }
    }

    /// Reads the header on line `row` (zero-based) and consumes every line up
    /// to and including it.
    ///
    /// Returns `None` if the input ends before that line.
    pub fn read_header(
        &mut self,
        row: usize,
        dialect: Dialect,
        decoder: Decoder,
    ) -> Result<Option<Vec<String>>, CsvError> {
        let mut lines_before = row;
        loop {
            let mut unit = match self.pending.take() {
                Some(unit) => unit,
                None => match self.pull()? {
                    Some(unit) => unit,
                    None => return Ok(None),
                },
            };

            unit.front_trim();
            while lines_before > 0 && unit.has_more_data() {
                unit.next_line();
                lines_before -= 1;
            }
            if !unit.has_more_data() {
                continue;
            }

            let mut names = Vec::new();
            while let Some(raw) = unit.next_field(dialect.separator, dialect.quote) {
                let field = Field::new(raw, dialect.quote, decoder);
                names.push(field.as_str().into_owned());
            }
            unit.next_line();
            debug!(row, columns = names.len(), "read header");

            if unit.has_more_data() {
                self.pending = Some(unit);
            }
            return Ok(Some(names));
        }
    }

    /// Drops pending leading records from the front of `unit`.
    fn skip_leading(&mut self, mut unit: ByteSlice) -> Option<ByteSlice> {
        if self.skip_records == 0 {
            return Some(unit);
        }
        unit.front_trim();
        while self.skip_records > 0 && unit.has_more_data() {
            unit.next_line();
            self.skip_records -= 1;
        }
        unit.has_more_data().then_some(unit)
    }

    /// Pulls chunks until one completes a unit.
    fn pull(&mut self) -> Result<Option<ByteSlice>, CsvError> {
        loop {
            if self.finished {
                return Ok(None);
            }

            let chunk = match self.source.next_chunk() {
                Ok(chunk) => chunk,
                Err(e) => {
                    self.finished = true;
                    return Err(e.into());
                }
            };
            let is_last = chunk.is_last();
            let fresh = SingleSlice::new(chunk);

            let unit = if is_last {
                self.finished = true;
                ByteSlice::join(self.take_prefix(), fresh)
            } else {
                let (head, tail) = fresh.split_on_last_line_end();
                if head.is_empty() {
                    // No terminator in this chunk: the held-over line goes on.
                    self.spill_line(tail);
                    continue;
                }
                let prefix = self.take_prefix();
                self.carry = tail;
                ByteSlice::join(prefix, head)
            };

            if unit.has_more_data() {
                return Ok(Some(unit));
            }
        }
    }
}

impl<S> Splitter<S> {
    /// Moves the held-over bytes and `tail` into the spill buffer.
    fn spill_line(&mut self, tail: SingleSlice) {
        if self.spill.is_empty() {
            self.spill.extend_from_slice(mem::take(&mut self.carry).remaining());
        }
        self.spill.extend_from_slice(tail.remaining());
        debug!(bytes = self.spill.len(), "line spans chunk boundary");
    }

    /// The held-over start of the next line, leaving none behind.
    fn take_prefix(&mut self) -> SingleSlice {
        if self.spill.is_empty() {
            mem::take(&mut self.carry)
        } else {
            SingleSlice::new(Chunk::from_vec(mem::take(&mut self.spill), false))
        }
    }
}

impl<S: ChunkSource> Iterator for Splitter<S> {
    type Item = Result<ByteSlice, CsvError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_unit().transpose()
    }
}
