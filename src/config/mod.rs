//! Configuration for parsing behavior.
//!
//! This module provides types to configure how input is parsed:
//!
//! - [`Dialect`] - Field separator and optional quote byte
//! - [`ParserConfig`] - Dialect plus charset, buffer size, header projection
//!   and error handling
//!
//! # Example
//!
//! ```
//! use quickcsv::{Charset, Dialect, ParserConfig};
//!
//! // Tab separated, Latin-1, 1 MiB buffers
//! let config = ParserConfig::default()
//!     .with_dialect(Dialect::tabs())
//!     .with_charset(Charset::Latin1)
//!     .with_buffer_size(1024 * 1024);
//! config.validate()?;
//!
//! # Ok::<(), quickcsv::CsvError>(())
//! ```

use std::fmt;
use std::sync::Arc;

use crate::buffer::DEFAULT_BUFFER_SIZE;
use crate::decode::{Charset, Decoder, NumberParsing};
use crate::error::CsvError;
use crate::parser::{AbortOnError, ErrorHandler};
use crate::slice::scan::is_eol;
use crate::subset::FieldSubset;

/// Field separator and quote byte.
///
/// # Example
///
/// ```
/// use quickcsv::Dialect;
///
/// let csv = Dialect::rfc4180();
/// assert_eq!(csv.separator, b',');
/// assert_eq!(csv.quote, Some(b'"'));
///
/// let pipes = Dialect::new(b'|', None);
/// assert_eq!(pipes.quote, None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dialect {
    /// Byte separating fields on a line.
    pub separator: u8,
    /// Byte that opens and closes quoted fields, if quoting is used.
    pub quote: Option<u8>,
}

impl Dialect {
    /// Creates a dialect.
    pub const fn new(separator: u8, quote: Option<u8>) -> Self {
        Self { separator, quote }
    }

    /// Comma separated with double quotes.
    pub const fn rfc4180() -> Self {
        Self::new(b',', Some(b'"'))
    }

    /// Tab separated without quoting.
    pub const fn tabs() -> Self {
        Self::new(b'\t', None)
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Self::rfc4180()
    }
}

/// Configuration for a parse.
///
/// Each buffer of `buffer_size` bytes is one split granule: the unit of
/// work handed to a worker during parallel parsing.
///
/// # Example
///
/// ```
/// use quickcsv::{FieldSubset, HeaderSource, LogAndSkip, NumberParsing, ParserConfig};
///
/// let config = ParserConfig::default()
///     .with_separator(b';')
///     .with_skip_records(2)
///     .with_number_parsing(NumberParsing::Precise)
///     .with_field_subset(FieldSubset::new(["id", "name"], HeaderSource::from_source()))
///     .with_mapping_handler(LogAndSkip);
///
/// assert_eq!(config.dialect().separator, b';');
/// assert_eq!(config.skip_records(), 2);
/// ```
#[derive(Clone)]
pub struct ParserConfig {
    dialect: Dialect,
    charset: Charset,
    numbers: NumberParsing,
    buffer_size: usize,
    skip_records: usize,
    subset: Option<FieldSubset>,
    mapping_handler: Arc<dyn ErrorHandler>,
    consumer_handler: Arc<dyn ErrorHandler>,
}

impl ParserConfig {
    /// Sets separator and quote together.
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Sets the field separator.
    pub fn with_separator(mut self, separator: u8) -> Self {
        self.dialect.separator = separator;
        self
    }

    /// Sets the quote byte.
    pub fn with_quote(mut self, quote: u8) -> Self {
        self.dialect.quote = Some(quote);
        self
    }

    /// Disables quote handling.
    pub fn without_quote(mut self) -> Self {
        self.dialect.quote = None;
        self
    }

    /// Sets the charset used to decode text.
    pub fn with_charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    /// Selects the numeric parsers.
    pub fn with_number_parsing(mut self, numbers: NumberParsing) -> Self {
        self.numbers = numbers;
        self
    }

    /// Sets the read buffer size in bytes.
    ///
    /// Note: This does not validate the configuration. Use
    /// [`ParserConfig::validate`] to check if the configuration is valid.
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Skips this many leading records (after the header, if one is read
    /// from the source).
    pub fn with_skip_records(mut self, count: usize) -> Self {
        self.skip_records = count;
        self
    }

    /// Projects each record onto a subset of named fields.
    pub fn with_field_subset(mut self, subset: FieldSubset) -> Self {
        self.subset = Some(subset);
        self
    }

    /// Handler consulted when the mapping function fails.
    pub fn with_mapping_handler<H: ErrorHandler + 'static>(mut self, handler: H) -> Self {
        self.mapping_handler = Arc::new(handler);
        self
    }

    /// Handler consulted when the sink passed to
    /// [`CsvParser::for_each`](crate::CsvParser::for_each) fails.
    pub fn with_consumer_handler<H: ErrorHandler + 'static>(mut self, handler: H) -> Self {
        self.consumer_handler = Arc::new(handler);
        self
    }

    /// Returns the dialect.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Returns the charset.
    pub fn charset(&self) -> Charset {
        self.charset
    }

    /// Returns the numeric parser selection.
    pub fn number_parsing(&self) -> NumberParsing {
        self.numbers
    }

    /// Returns the buffer size in bytes.
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Returns the number of leading records skipped.
    pub fn skip_records(&self) -> usize {
        self.skip_records
    }

    /// Returns the field subset, if one is configured.
    pub fn field_subset(&self) -> Option<&FieldSubset> {
        self.subset.as_ref()
    }

    pub(crate) fn decoder(&self) -> Decoder {
        Decoder::new(self.charset, self.numbers)
    }

    pub(crate) fn mapping_handler(&self) -> &Arc<dyn ErrorHandler> {
        &self.mapping_handler
    }

    pub(crate) fn consumer_handler(&self) -> &Arc<dyn ErrorHandler> {
        &self.consumer_handler
    }

    /// Validates the current configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CsvError::InvalidConfig`] if:
    /// - the buffer size is zero
    /// - the separator or quote is CR or LF
    /// - the separator equals the quote
    ///
    /// # Example
    ///
    /// ```
    /// use quickcsv::ParserConfig;
    ///
    /// let config = ParserConfig::default().with_buffer_size(0);
    /// assert!(config.validate().is_err());
    ///
    /// let config = ParserConfig::default().with_separator(b'"');
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), CsvError> {
        if self.buffer_size == 0 {
            return Err(CsvError::InvalidConfig {
                message: "buffer size must be non-zero",
            });
        }

        if is_eol(self.dialect.separator) {
            return Err(CsvError::InvalidConfig {
                message: "separator cannot be a line terminator",
            });
        }

        if let Some(q) = self.dialect.quote {
            if is_eol(q) {
                return Err(CsvError::InvalidConfig {
                    message: "quote cannot be a line terminator",
                });
            }
            if q == self.dialect.separator {
                return Err(CsvError::InvalidConfig {
                    message: "separator and quote must differ",
                });
            }
        }

        Ok(())
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            charset: Charset::default(),
            numbers: NumberParsing::default(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            skip_records: 0,
            subset: None,
            mapping_handler: Arc::new(AbortOnError),
            consumer_handler: Arc::new(AbortOnError),
        }
    }
}

impl fmt::Debug for ParserConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserConfig")
            .field("dialect", &self.dialect)
            .field("charset", &self.charset)
            .field("numbers", &self.numbers)
            .field("buffer_size", &self.buffer_size)
            .field("skip_records", &self.skip_records)
            .field("subset", &self.subset)
            .finish_non_exhaustive()
    }
}
