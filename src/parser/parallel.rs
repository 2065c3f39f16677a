//! Ordered parallel parsing over rayon.
//!
//! The splitter is driven as an unindexed producer: every split pulls one
//! work unit off the source and hands it to the left half, while the right
//! half keeps the splitter. Left halves come first in rayon's reduction
//! order, so collecting the results reproduces source order no matter which
//! thread decoded which unit.

use std::sync::Arc;

use rayon::iter::ParallelIterator;
use rayon::iter::plumbing::{Folder, UnindexedConsumer, UnindexedProducer, bridge_unindexed};

use crate::chunk::ChunkSource;
use crate::error::{BoxError, CsvError};
use crate::parser::ParseContext;
use crate::parser::record::{Record, RecordCursor};
use crate::slice::ByteSlice;
use crate::splitter::Splitter;

/// Maps the records of a source on the rayon thread pool.
///
/// Created by [`CsvParser::par_parse`](crate::CsvParser::par_parse).
/// Reading and splitting stay serial; tokenizing and mapping run in
/// parallel. Order-preserving consumers such as `collect` yield records in
/// source order.
///
/// A unit stops at its first aborting error. Other units may still be in
/// flight, so when several rows fail, which error a short-circuiting
/// `collect::<Result<_, _>>()` reports is not fixed.
pub struct ParRecords<S, F> {
    splitter: Splitter<S>,
    ctx: Arc<ParseContext>,
    mapper: F,
}

impl<S, F> ParRecords<S, F> {
    pub(crate) fn new(splitter: Splitter<S>, ctx: Arc<ParseContext>, mapper: F) -> Self {
        Self {
            splitter,
            ctx,
            mapper,
        }
    }
}

impl<S, F, T, E> ParallelIterator for ParRecords<S, F>
where
    S: ChunkSource + Send,
    F: Fn(&mut Record<'_>) -> Result<T, E> + Sync + Send,
    T: Send,
    E: Into<BoxError>,
{
    type Item = Result<T, CsvError>;

    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: UnindexedConsumer<Self::Item>,
    {
        let producer = UnitProducer {
            work: Work::Source(self.splitter),
            ctx: &self.ctx,
            mapper: &self.mapper,
        };
        bridge_unindexed(producer, consumer)
    }
}

enum Work<S> {
    /// The splitter, positioned at the next unread unit.
    Source(Splitter<S>),
    /// One work unit.
    Unit(ByteSlice),
    /// A source error to report in order.
    Failed(CsvError),
    Done,
}

struct UnitProducer<'a, S, F> {
    work: Work<S>,
    ctx: &'a Arc<ParseContext>,
    mapper: &'a F,
}

impl<S, F, T, E> UnindexedProducer for UnitProducer<'_, S, F>
where
    S: ChunkSource + Send,
    F: Fn(&mut Record<'_>) -> Result<T, E> + Sync,
    T: Send,
    E: Into<BoxError>,
{
    type Item = Result<T, CsvError>;

    fn split(self) -> (Self, Option<Self>) {
        let UnitProducer { work, ctx, mapper } = self;
        let producer = move |work| UnitProducer { work, ctx, mapper };
        match work {
            Work::Source(mut splitter) => match splitter.next_unit() {
                Ok(Some(unit)) => (
                    producer(Work::Unit(unit)),
                    Some(producer(Work::Source(splitter))),
                ),
                Ok(None) => (producer(Work::Done), None),
                Err(e) => (producer(Work::Failed(e)), None),
            },
            other => (producer(other), None),
        }
    }

    fn fold_with<FF>(self, mut folder: FF) -> FF
    where
        FF: Folder<Self::Item>,
    {
        match self.work {
            Work::Unit(unit) => fold_unit(unit, self.ctx, self.mapper, folder),
            Work::Failed(e) => folder.consume(Err(e)),
            Work::Done => folder,
            // Not split further: drain the rest of the source here.
            Work::Source(mut splitter) => {
                while !folder.full() {
                    match splitter.next_unit() {
                        Ok(Some(unit)) => folder = fold_unit(unit, self.ctx, self.mapper, folder),
                        Ok(None) => break,
                        Err(e) => {
                            folder = folder.consume(Err(e));
                            break;
                        }
                    }
                }
                folder
            }
        }
    }
}

fn fold_unit<F, T, E, FF>(
    unit: ByteSlice,
    ctx: &Arc<ParseContext>,
    mapper: &F,
    mut folder: FF,
) -> FF
where
    F: Fn(&mut Record<'_>) -> Result<T, E>,
    E: Into<BoxError>,
    FF: Folder<Result<T, CsvError>>,
{
    let mut cursor = RecordCursor::new(unit, Arc::clone(ctx));
    let mut mapper = mapper;
    while !folder.full() {
        match cursor.map_next(&mut mapper) {
            Some(Ok(value)) => folder = folder.consume(Ok(value)),
            Some(Err(e)) => {
                folder = folder.consume(Err(e));
                break;
            }
            None => break,
        }
    }
    folder
}
