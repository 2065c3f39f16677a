//! Row-scoped error handling.
//!
//! Mapping and consumer failures are routed through an [`ErrorHandler`]
//! which decides whether the parse stops or moves on to the next record.
//! Scanning errors never reach a handler: the tokenizer does not fail, it
//! only delimits bytes.

use std::fmt;

use tracing::warn;

use crate::error::CsvError;

/// What to do after a row failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorAction {
    /// Stop the parse and return the error.
    Abort,
    /// Drop the row and continue with the next record.
    Skip,
}

/// Decides how a failed row is handled.
///
/// Implemented for closures, so ad-hoc policies need no new type:
///
/// ```
/// use quickcsv::{CsvError, ErrorAction, ParserConfig};
///
/// let config = ParserConfig::default().with_mapping_handler(|e: &CsvError| {
///     eprintln!("bad row: {e}");
///     ErrorAction::Skip
/// });
/// # let _ = config;
/// ```
pub trait ErrorHandler: Send + Sync {
    /// Called with a [`CsvError::Mapping`] or [`CsvError::Consumer`] error.
    fn on_error(&self, error: &CsvError) -> ErrorAction;
}

impl<F> ErrorHandler for F
where
    F: Fn(&CsvError) -> ErrorAction + Send + Sync,
{
    fn on_error(&self, error: &CsvError) -> ErrorAction {
        self(error)
    }
}

/// Stops at the first failing row. The default.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbortOnError;

impl ErrorHandler for AbortOnError {
    fn on_error(&self, _error: &CsvError) -> ErrorAction {
        ErrorAction::Abort
    }
}

/// Logs the failure at `warn` level and skips the row.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAndSkip;

impl ErrorHandler for LogAndSkip {
    fn on_error(&self, error: &CsvError) -> ErrorAction {
        warn!(%error, "skipping row");
        ErrorAction::Skip
    }
}

impl fmt::Debug for dyn ErrorHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ErrorHandler")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping_error() -> CsvError {
        CsvError::Mapping {
            row: "1,x".to_string(),
            source: "bad".into(),
        }
    }

    #[test]
    fn test_builtin_handlers() {
        assert_eq!(AbortOnError.on_error(&mapping_error()), ErrorAction::Abort);
        assert_eq!(LogAndSkip.on_error(&mapping_error()), ErrorAction::Skip);
    }

    #[test]
    fn test_closure_handler() {
        let handler = |e: &CsvError| match e {
            CsvError::Mapping { row, .. } if row.starts_with('1') => ErrorAction::Skip,
            _ => ErrorAction::Abort,
        };
        assert_eq!(handler.on_error(&mapping_error()), ErrorAction::Skip);
        let boxed: Box<dyn ErrorHandler> = Box::new(handler);
        assert_eq!(format!("{boxed:?}"), "ErrorHandler");
    }
}
