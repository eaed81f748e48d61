//! Error types for the sweep driver

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Main error type for the sweep driver.
///
/// Per-run invocation failures are not represented here: a failed run is
/// recorded as a [`crate::runner::RunFailure`] and the sweep continues.
#[derive(Error, Debug)]
pub enum SweepError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Measurement executable missing. Raised before any store I/O happens,
    /// so a misconfigured run leaves no record store behind.
    #[error("executable not found: {0}")]
    ExecutableNotFound(PathBuf),

    /// Record store missing at read time
    #[error("record store not found: {0}")]
    StoreNotFound(PathBuf),

    /// A data line the reader could not parse. Fatal to the whole read;
    /// the store itself is left untouched.
    #[error("malformed record at line {line_no}: {reason}: {content:?}")]
    MalformedRecord {
        /// 1-based line number in the store file (header is line 1)
        line_no: usize,
        /// The offending line, verbatim
        content: String,
        /// What the parser choked on
        reason: String,
    },

    /// Store has a header but no data lines to plot
    #[error("record store has no data lines: {0}")]
    EmptyStore(PathBuf),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Chart rendering error
    #[error("render error: {0}")]
    Render(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
