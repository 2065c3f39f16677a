//! quickcsv
//!
//! High-throughput decoding of delimited text (CSV, TSV and friends).
//!
//! `quickcsv` is built for very large inputs where parsing speed matters more
//! than convenience. It reads into pooled buffers, hands out zero-copy field
//! views instead of allocating strings, and splits the input into
//! line-aligned work units that can be decoded in parallel without losing
//! record order.
//!
//! The crate intentionally:
//! - does NOT validate or repair malformed rows
//! - does NOT map rows to types for you (bring a mapping function)
//! - does NOT do RFC-perfect escaping beyond doubled quotes
//!
//! It only does one thing: **Read bytes → yield records**
//!
//! # Sequential
//!
//! ```no_run
//! use std::fs::File;
//! use quickcsv::{CsvError, CsvParser, ParserConfig, to_string_vec};
//!
//! fn main() -> Result<(), CsvError> {
//!     let parser = CsvParser::new(ParserConfig::default());
//!     let rows = parser.parse_reader(File::open("cities.csv")?, to_string_vec)?;
//!
//!     for row in rows {
//!         println!("{:?}", row?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Parallel (feature = "parallel")
//!
//! ```no_run
//! use std::fs::File;
//! use quickcsv::{CsvError, CsvParser, ParserConfig, Record};
//! use rayon::prelude::*;
//!
//! fn main() -> Result<(), CsvError> {
//!     let parser = CsvParser::new(ParserConfig::default());
//!     let source = parser.source(File::open("cities.csv")?);
//!
//!     // Records come back in file order.
//!     let populations: Vec<Option<i64>> = parser
//!         .par_parse(source, |r: &mut Record<'_>| {
//!             r.skip_fields(4);
//!             r.next_field().map_or(Ok(None), |f| f.opt_i64())
//!         })?
//!         .collect::<Result<_, _>>()?;
//!     println!("{} rows", populations.len());
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod buffer;
mod chunk;
mod config;
mod decode;
mod error;
mod field;
mod parser;
mod slice;
mod splitter;
mod subset;

mod util; // internal helpers

//
// Public surface
//

pub use buffer::{BufferPool, DEFAULT_BUFFER_SIZE, DEFAULT_RETAIN_LIMIT};
pub use chunk::{Chunk, ChunkSource, IterSource, ReaderSource};
pub use config::{Dialect, ParserConfig};
pub use decode::{Charset, DecodeError, Decoder, NumberParsing};
pub use error::{BoxError, CsvError};
pub use field::{Field, OwnedField};
pub use parser::{
    AbortOnError, CsvParser, ErrorAction, ErrorHandler, LogAndSkip, ParsedRecords, Record,
    to_string_vec,
};
pub use slice::{ByteSlice, CompositeSlice, RawField, SingleSlice};
pub use splitter::Splitter;
pub use subset::{Column, FieldSubset, HeaderSource, Projection};

#[cfg(feature = "parallel")]
pub use parser::ParRecords;
