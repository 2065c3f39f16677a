//! Sequential record iterator.

use std::sync::Arc;

use crate::chunk::ChunkSource;
use crate::error::{BoxError, CsvError};
use crate::parser::ParseContext;
use crate::parser::record::{Record, RecordCursor};
use crate::splitter::Splitter;

/// Lazily maps the records of a source, in order, on the calling thread.
///
/// Created by [`CsvParser::parse`](crate::CsvParser::parse). Each item is
/// the mapper's value for one record, or the error that ended the parse;
/// after an error the iterator is exhausted.
///
/// Dropping the iterator early releases every buffer it still holds.
pub struct ParsedRecords<S, F> {
    splitter: Splitter<S>,
    ctx: Arc<ParseContext>,
    mapper: F,
    current: Option<RecordCursor>,
    done: bool,
}

impl<S, F> ParsedRecords<S, F> {
    pub(crate) fn new(splitter: Splitter<S>, ctx: Arc<ParseContext>, mapper: F) -> Self {
        Self {
            splitter,
            ctx,
            mapper,
            current: None,
            done: false,
        }
    }

    /// Raw text of the record the last item came from.
    pub fn current_line(&self) -> String {
        self.current
            .as_ref()
            .map(RecordCursor::line)
            .unwrap_or_default()
    }
}

impl<S, F, T, E> Iterator for ParsedRecords<S, F>
where
    S: ChunkSource,
    F: FnMut(&mut Record<'_>) -> Result<T, E>,
    E: Into<BoxError>,
{
    type Item = Result<T, CsvError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }

            if self.current.is_none() {
                match self.splitter.next_unit() {
                    Ok(Some(unit)) => {
                        self.current = Some(RecordCursor::new(unit, Arc::clone(&self.ctx)));
                    }
                    Ok(None) => {
                        self.done = true;
                        return None;
                    }
                    Err(e) => {
                        self.done = true;
                        return Some(Err(e));
                    }
                }
            }
            let Some(cursor) = self.current.as_mut() else {
                continue;
            };

            match cursor.map_next(&mut self.mapper) {
                Some(Ok(value)) => return Some(Ok(value)),
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                // Unit drained: drop it so its chunks go back to the pool.
                None => self.current = None,
            }
        }
    }
}
