//! Error types for quickcsv.

use thiserror::Error;

/// Boxed error produced by caller-supplied mappers and sinks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while setting up or running a parse.
#[derive(Debug, Error)]
pub enum CsvError {
    /// An I/O error occurred while reading the chunk source.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration parameter.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },

    /// A requested field does not appear in the header.
    #[error("field not found in header: {name}")]
    MissingColumn {
        /// Name of the requested field.
        name: String,
    },

    /// The same field was requested more than once.
    #[error("field requested twice: {name}")]
    DuplicateColumn {
        /// Name of the repeated field.
        name: String,
    },

    /// The source ended before the header row was read.
    #[error("source ended before header row {row}")]
    MissingHeader {
        /// Zero-based line index where the header was expected.
        row: usize,
    },

    /// The mapping function failed and the handler chose to abort.
    #[error("failed to map row `{row}`: {source}")]
    Mapping {
        /// Text of the offending row.
        row: String,
        /// Error raised by the mapper.
        #[source]
        source: BoxError,
    },

    /// The downstream sink failed and the handler chose to abort.
    #[error("consumer failed on row `{row}`: {source}")]
    Consumer {
        /// Text of the row whose value was being consumed.
        row: String,
        /// Error raised by the sink.
        #[source]
        source: BoxError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: CsvError = io_err.into();
        assert!(matches!(err, CsvError::Io(_)));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_display() {
        let err = CsvError::MissingColumn {
            name: "C9".to_string(),
        };
        assert_eq!(err.to_string(), "field not found in header: C9");
    }

    #[test]
    fn test_mapping_error_keeps_source() {
        let err = CsvError::Mapping {
            row: "a,b".to_string(),
            source: "boom".into(),
        };
        assert!(err.to_string().contains("a,b"));
        assert_eq!(err.source().map(|e| e.to_string()), Some("boom".to_string()));
    }
}
