//! Error types for chainviz.
//!
//! This module defines the error taxonomy using `thiserror`. Errors compose via `?` and
//! `From` conversions.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error wrapping every fatal failure, returned by `main`
//!   - [`InputError`] - Diff stream reading failures (file not found, no stdin, IO)
//!   - [`ConfigError`] - Config file read or TOML failures
//!   - [`LoggingError`] - Tracing subscriber setup failures
//!   - [`TuiError`] - Terminal failures
//! - [`ParseError`] - Per-message decoding failures (bad UTF-8, malformed JSON). Never
//!   fatal, so not part of `AppError`.
//!
//! # Error Recovery Strategy
//!
//! Decode errors are **non-fatal**: the offending message is logged and discarded and the
//! stream stays open. Ordering anomalies are not errors at all; they are reported through
//! [`crate::world::ApplyOutcome`]. Dangling references inside a diff are absorbed by the
//! world state. Input, config and terminal errors are fatal and propagate to `main`.

use crate::config::ConfigError;
use crate::logging::LoggingError;
use crate::view::TuiError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error encompassing all fatal failure modes.
///
/// # Examples
///
/// ```no_run
/// use chainviz::model::error::{AppError, InputError};
///
/// fn run_app() -> Result<(), AppError> {
///     // InputError automatically converts to AppError via From
///     let _input = open_stream()?;
///     Ok(())
/// }
/// # fn open_stream() -> Result<(), InputError> { Ok(()) }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to read the diff stream.
    ///
    /// **Recovery**: Display the error and exit. There is no session without a stream.
    #[error("Failed to read input: {0}")]
    InputRead(#[from] InputError),

    /// The configuration file exists but could not be used.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Tracing could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// Terminal or TUI rendering error.
    ///
    /// **Recovery**: The TUI restores the terminal before this reaches `main`.
    #[error("Terminal error: {0}")]
    Tui(#[from] TuiError),
}

/// Errors encountered when opening or reading the diff stream.
///
/// # Recovery Patterns
///
/// - **FileNotFound**: Display error and exit (user provided invalid path)
/// - **NoInput**: Display usage help - user must provide a file path or pipe stdin
/// - **Io**: Generic I/O failures (permissions, broken pipe) - display and exit
#[derive(Debug, Error)]
pub enum InputError {
    /// The specified diff file does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use chainviz::model::error::InputError;
    ///
    /// let err = InputError::FileNotFound {
    ///     path: PathBuf::from("/tmp/missing.jsonl")
    /// };
    /// assert!(err.to_string().contains("/tmp/missing.jsonl"));
    /// ```
    #[error("File not found: {path}")]
    FileNotFound {
        /// The filesystem path that was not found.
        path: PathBuf,
    },

    /// No input source was provided.
    ///
    /// Occurs when no file argument is given and stdin is an interactive terminal rather
    /// than a pipe.
    ///
    /// **Recovery**: Display both invocation modes:
    /// - `chainviz /path/to/diffs.jsonl` (file mode)
    /// - `feed | chainviz` (stream mode)
    #[error("No input source: provide a file path or pipe data to stdin")]
    NoInput,

    /// Generic I/O error reading from the input source.
    ///
    /// The `#[from]` attribute lets `?` convert `std::io::Error` directly.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors encountered when decoding one diff message.
///
/// Decode errors are **non-fatal**: the message is discarded and the stream stays
/// open. All variants carry the 1-based line number of the message in the stream so
/// the log points at the exact payload.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The message is not valid JSON or does not match the diff schema.
    ///
    /// **Why `message` is `String` not `serde_json::Error`**: the parser error message is
    /// enough context, and it keeps `ParseError` free of `serde_json` state.
    ///
    /// # Examples
    ///
    /// ```
    /// use chainviz::model::error::ParseError;
    ///
    /// let err = ParseError::InvalidJson {
    ///     line: 42,
    ///     message: "missing field `diffIndex`".to_string()
    /// };
    /// assert!(err.to_string().contains("line 42"));
    /// assert!(err.to_string().contains("diffIndex"));
    /// ```
    #[error("Invalid JSON at line {line}: {message}")]
    InvalidJson {
        /// The 1-based line number of the message.
        line: usize,
        /// The JSON parser error message.
        message: String,
    },

    /// The line is not valid UTF-8, so it cannot be JSON.
    ///
    /// # Examples
    ///
    /// ```
    /// use chainviz::model::error::ParseError;
    ///
    /// let err = ParseError::InvalidUtf8 { line: 3 };
    /// assert_eq!(err.to_string(), "Invalid UTF-8 at line 3");
    /// ```
    #[error("Invalid UTF-8 at line {line}")]
    InvalidUtf8 {
        /// The 1-based line number of the message.
        line: usize,
    },
}

impl ParseError {
    /// Line number the error refers to.
    pub fn line(&self) -> usize {
        match self {
            ParseError::InvalidJson { line, .. } | ParseError::InvalidUtf8 { line } => *line,
        }
    }
}
