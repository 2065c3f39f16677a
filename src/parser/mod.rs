//! Parser entry points.
//!
//! - [`CsvParser`] - Validates the configuration, resolves the header and
//!   hands out record iterators
//! - [`Record`] - What a mapping function sees for each line
//! - [`ParsedRecords`] - Sequential iterator of mapped values
//! - [`ParRecords`] - Ordered parallel iterator (feature `parallel`)
//! - [`ErrorHandler`] - Row-scoped error policy
//!
//! # Example
//!
//! ```
//! use quickcsv::{CsvParser, ParserConfig, Record};
//!
//! let data = "1,Berlin,3.6\n2,Paris,2.1\n";
//! let parser = CsvParser::new(ParserConfig::default());
//!
//! let cities = parser.parse_reader(data.as_bytes(), |r: &mut Record<'_>| {
//!     let id = r.next_field().map_or(Ok(0), |f| f.as_i32())?;
//!     let name = r.next_field().map(|f| f.as_str().into_owned()).unwrap_or_default();
//!     Ok::<_, quickcsv::DecodeError>((id, name))
//! })?;
//!
//! let cities: Vec<_> = cities.collect::<Result<_, _>>()?;
//! assert_eq!(cities, [(1, "Berlin".to_string()), (2, "Paris".to_string())]);
//! # Ok::<(), quickcsv::CsvError>(())
//! ```

mod handler;
#[cfg(feature = "parallel")]
mod parallel;
mod record;
mod sequential;

use std::convert::Infallible;
use std::io::Read;
use std::sync::Arc;

use tracing::debug;

pub use handler::{AbortOnError, ErrorAction, ErrorHandler, LogAndSkip};
#[cfg(feature = "parallel")]
pub use parallel::ParRecords;
pub use record::Record;
pub use sequential::ParsedRecords;

use crate::buffer::BufferPool;
use crate::chunk::{ChunkSource, ReaderSource};
use crate::config::{Dialect, ParserConfig};
use crate::decode::Decoder;
use crate::error::{BoxError, CsvError};
use crate::splitter::Splitter;
use crate::subset::{HeaderSource, Projection};

/// Per-parse state shared by every record cursor.
pub(crate) struct ParseContext {
    pub(crate) dialect: Dialect,
    pub(crate) decoder: Decoder,
    pub(crate) projection: Option<Projection>,
    pub(crate) mapping_handler: Arc<dyn ErrorHandler>,
}

impl ParseContext {
    pub(crate) fn new(config: &ParserConfig, projection: Option<Projection>) -> Self {
        Self {
            dialect: config.dialect(),
            decoder: config.decoder(),
            projection,
            mapping_handler: Arc::clone(config.mapping_handler()),
        }
    }
}

/// Parses delimited text from chunk sources.
///
/// A parser owns a [`BufferPool`] sized to the configured buffer size;
/// every source created with [`CsvParser::source`] reads into buffers from
/// that pool, so repeated parses reuse memory.
#[derive(Debug, Clone)]
pub struct CsvParser {
    config: ParserConfig,
    pool: Arc<BufferPool>,
}

impl CsvParser {
    /// Creates a parser. The configuration is validated when a parse starts.
    pub fn new(config: ParserConfig) -> Self {
        let pool = Arc::new(BufferPool::new(config.buffer_size()));
        Self { config, pool }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Returns the buffer pool shared by this parser's sources.
    pub fn pool(&self) -> &Arc<BufferPool> {
        &self.pool
    }

    /// Wraps `reader` in a chunk source backed by this parser's pool.
    pub fn source<R: Read>(&self, reader: R) -> ReaderSource<R> {
        ReaderSource::new(reader, Arc::clone(&self.pool))
    }

    /// Validates the configuration, reads the header if one is needed and
    /// resolves the field subset.
    fn prepare<S: ChunkSource>(
        &self,
        source: S,
    ) -> Result<(Splitter<S>, Arc<ParseContext>), CsvError> {
        self.config.validate()?;
        let mut splitter = Splitter::new(source);

        let projection = match self.config.field_subset() {
            None => None,
            Some(subset) => {
                let header = match subset.header_source() {
                    HeaderSource::Explicit(names) => names.clone(),
                    HeaderSource::FromSource { row } => splitter
                        .read_header(*row, self.config.dialect(), self.config.decoder())?
                        .ok_or(CsvError::MissingHeader { row: *row })?,
                };
                Some(subset.resolve(header)?)
            }
        };
        splitter.set_skip_records(self.config.skip_records());

        debug!(
            buffer_size = self.config.buffer_size(),
            projected = projection.is_some(),
            "parse prepared"
        );
        let ctx = Arc::new(ParseContext::new(&self.config, projection));
        Ok((splitter, ctx))
    }

    /// Maps every record of `source` with `mapper`, in order.
    ///
    /// Mapper failures go through the mapping handler; with the default
    /// handler the first failure ends the iteration.
    ///
    /// # Errors
    ///
    /// Fails before producing any record if the configuration is invalid,
    /// the header cannot be read, or a requested field is missing from it.
    pub fn parse<S, F, T, E>(&self, source: S, mapper: F) -> Result<ParsedRecords<S, F>, CsvError>
    where
        S: ChunkSource,
        F: FnMut(&mut Record<'_>) -> Result<T, E>,
        E: Into<BoxError>,
    {
        let (splitter, ctx) = self.prepare(source)?;
        Ok(ParsedRecords::new(splitter, ctx, mapper))
    }

    /// [`parse`](Self::parse) over a reader.
    pub fn parse_reader<R, F, T, E>(
        &self,
        reader: R,
        mapper: F,
    ) -> Result<ParsedRecords<ReaderSource<R>, F>, CsvError>
    where
        R: Read,
        F: FnMut(&mut Record<'_>) -> Result<T, E>,
        E: Into<BoxError>,
    {
        self.parse(self.source(reader), mapper)
    }

    /// Maps every record and passes each value to `sink`.
    ///
    /// Sink failures go through the consumer handler, mapper failures
    /// through the mapping handler.
    pub fn for_each<S, F, T, E, K, E2>(
        &self,
        source: S,
        mapper: F,
        mut sink: K,
    ) -> Result<(), CsvError>
    where
        S: ChunkSource,
        F: FnMut(&mut Record<'_>) -> Result<T, E>,
        E: Into<BoxError>,
        K: FnMut(T) -> Result<(), E2>,
        E2: Into<BoxError>,
    {
        let mut records = self.parse(source, mapper)?;
        while let Some(value) = records.next() {
            if let Err(e) = sink(value?) {
                let err = CsvError::Consumer {
                    row: records.current_line(),
                    source: e.into(),
                };
                match self.config.consumer_handler().on_error(&err) {
                    ErrorAction::Skip => continue,
                    ErrorAction::Abort => return Err(err),
                }
            }
        }
        Ok(())
    }

    /// Maps every record of `source` on the rayon thread pool.
    ///
    /// Collecting the returned iterator yields values in source order.
    ///
    /// # Errors
    ///
    /// Same setup errors as [`parse`](Self::parse).
    #[cfg(feature = "parallel")]
    pub fn par_parse<S, F, T, E>(&self, source: S, mapper: F) -> Result<ParRecords<S, F>, CsvError>
    where
        S: ChunkSource + Send,
        F: Fn(&mut Record<'_>) -> Result<T, E> + Sync + Send,
        T: Send,
        E: Into<BoxError>,
    {
        let (splitter, ctx) = self.prepare(source)?;
        Ok(ParRecords::new(splitter, ctx, mapper))
    }
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

/// Standard mapper: every field of the record as a `String`.
///
/// Convenient for tests and small inputs; mapping straight into a domain
/// type avoids the per-field allocations.
pub fn to_string_vec(record: &mut Record<'_>) -> Result<Vec<String>, Infallible> {
    let mut out = Vec::new();
    while let Some(field) = record.next_field() {
        out.push(field.as_str().into_owned());
    }
    Ok(out)
}
