//! Records and the per-unit record cursor.

use std::fmt;

use crate::error::{BoxError, CsvError};
use crate::field::Field;
use crate::parser::{ErrorAction, ParseContext};
use crate::slice::{ByteSlice, RawField};
use crate::subset::{Column, Projection};

/// One record of the input, handed to the mapping function.
///
/// Without a field subset a record is read front to back with
/// [`next_field`](Record::next_field) and the `skip_*` methods. Each
/// returned [`Field`] borrows the record, so it must be used (or copied with
/// [`Field::to_owned_field`]) before the next call.
///
/// With a field subset the requested columns have already been extracted
/// and can be read in any order with [`get`](Record::get),
/// [`get_by_name`](Record::get_by_name) and [`column`](Record::column);
/// `next_field` walks them in declaration order.
pub struct Record<'a> {
    slice: &'a mut ByteSlice,
    ctx: &'a ParseContext,
    projected: Option<ProjectedRow<'a>>,
    next_logical: usize,
}

#[derive(Clone, Copy)]
struct ProjectedRow<'a> {
    projection: &'a Projection,
    arena: &'a [u8],
    spans: &'a [Option<Span>],
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Span {
    start: usize,
    end: usize,
    quoted: bool,
}

impl<'a> Record<'a> {
    #[inline]
    fn field(&self, raw: RawField<'a>) -> Field<'a> {
        Field::new(raw, self.ctx.dialect.quote, self.ctx.decoder)
    }

    /// Returns the next field, or `None` at the end of the record.
    pub fn next_field(&mut self) -> Option<Field<'_>> {
        if let Some(row) = self.projected {
            let logical = self.next_logical;
            if logical >= row.projection.len() {
                return None;
            }
            self.next_logical += 1;
            return self.get(logical);
        }
        let dialect = self.ctx.dialect;
        let decoder = self.ctx.decoder;
        self.slice
            .next_field(dialect.separator, dialect.quote)
            .map(|raw| Field::new(raw, dialect.quote, decoder))
    }

    /// Skips one field without decoding it.
    ///
    /// Returns true while more fields follow on this record.
    pub fn skip_field(&mut self) -> bool {
        if let Some(row) = self.projected {
            self.next_logical += 1;
            return self.next_logical < row.projection.len();
        }
        let dialect = self.ctx.dialect;
        self.slice.skip_until(dialect.separator, dialect.quote)
    }

    /// Skips `n` fields. Returns false if the record ended first.
    pub fn skip_fields(&mut self, n: usize) -> bool {
        (0..n).all(|_| self.skip_field())
    }

    /// Field declared at `index` of the subset.
    ///
    /// `None` if no subset is configured, `index` is out of range, or the
    /// row is too short to hold the column.
    pub fn get(&self, index: usize) -> Option<Field<'a>> {
        let row = self.projected?;
        let scan = row.projection.scan_position(index)?;
        let span = (*row.spans.get(scan)?)?;
        Some(self.field(RawField {
            bytes: &row.arena[span.start..span.end],
            quoted: span.quoted,
        }))
    }

    /// Field called `name` in the subset.
    pub fn get_by_name(&self, name: &str) -> Option<Field<'a>> {
        let row = self.projected?;
        let logical = row.projection.names().iter().position(|n| n == name)?;
        self.get(logical)
    }

    /// Field for a typed column.
    pub fn column<C: Column>(&self, column: C) -> Option<Field<'a>> {
        self.get(column.index())
    }

    /// The resolved header, when a subset is configured.
    pub fn header(&self) -> Option<&'a [String]> {
        self.projected.map(|row| row.projection.header())
    }

    /// Raw text of the record, for diagnostics.
    pub fn line(&self) -> String {
        self.slice.current_line()
    }
}

impl fmt::Debug for Record<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("line", &self.line())
            .field("projected", &self.projected.is_some())
            .finish()
    }
}

/// Walks the records of one work unit.
pub(crate) struct RecordCursor {
    slice: ByteSlice,
    ctx: std::sync::Arc<ParseContext>,
    started: bool,
    arena: Vec<u8>,
    spans: Vec<Option<Span>>,
}

impl RecordCursor {
    pub(crate) fn new(slice: ByteSlice, ctx: std::sync::Arc<ParseContext>) -> Self {
        Self {
            slice,
            ctx,
            started: false,
            arena: Vec::new(),
            spans: Vec::new(),
        }
    }

    /// Moves to the next record. Returns `None` once the unit is drained.
    pub(crate) fn next_record(&mut self) -> Option<Record<'_>> {
        if self.started {
            self.slice.next_line();
        } else {
            self.slice.front_trim();
            self.started = true;
        }
        if !self.slice.has_more_data() {
            return None;
        }

        self.project();
        let projected = self.ctx.projection.as_ref().map(|projection| ProjectedRow {
            projection,
            arena: &self.arena,
            spans: &self.spans,
        });
        Some(Record {
            slice: &mut self.slice,
            ctx: &self.ctx,
            projected,
            next_logical: 0,
        })
    }

    /// Copies the requested columns of the current line into the arena,
    /// jumping over the others with the skip schedule.
    fn project(&mut self) {
        let Some(projection) = self.ctx.projection.as_ref() else {
            return;
        };
        let (sep, quote) = (self.ctx.dialect.separator, self.ctx.dialect.quote);
        self.arena.clear();
        self.spans.clear();

        let mut in_line = true;
        for &skip in projection.skip_schedule() {
            let mut span = None;
            if in_line {
                in_line = (0..skip).all(|_| self.slice.skip_until(sep, quote));
            }
            if in_line {
                match self.slice.next_field(sep, quote) {
                    Some(raw) => {
                        let start = self.arena.len();
                        self.arena.extend_from_slice(raw.bytes);
                        span = Some(Span {
                            start,
                            end: self.arena.len(),
                            quoted: raw.quoted,
                        });
                    }
                    None => in_line = false,
                }
            }
            self.spans.push(span);
        }
    }

    /// Maps records until one succeeds, the handler aborts, or the unit ends.
    pub(crate) fn map_next<F, T, E>(&mut self, mapper: &mut F) -> Option<Result<T, CsvError>>
    where
        F: FnMut(&mut Record<'_>) -> Result<T, E>,
        E: Into<BoxError>,
    {
        loop {
            let result = {
                let mut record = self.next_record()?;
                mapper(&mut record)
            };
            match result {
                Ok(value) => return Some(Ok(value)),
                Err(e) => {
                    let err = CsvError::Mapping {
                        row: self.line(),
                        source: e.into(),
                    };
                    match self.ctx.mapping_handler.on_error(&err) {
                        ErrorAction::Skip => continue,
                        ErrorAction::Abort => return Some(Err(err)),
                    }
                }
            }
        }
    }

    /// Raw text of the record under the cursor.
    pub(crate) fn line(&self) -> String {
        self.slice.current_line()
    }
}
