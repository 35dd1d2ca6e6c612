//! Error types for row-source intake.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading and parsing the delimited source files.
///
/// A malformed row aborts the whole run: the pipeline is a single-pass batch
/// and partial inputs would silently skew the produced samples.
#[derive(Debug, Error)]
pub enum DataError {
    /// A data row had the wrong field count or an unparseable field.
    #[error("malformed row at {path}:{line}: {reason}")]
    MalformedRow {
        /// Source file containing the row.
        path: PathBuf,
        /// Zero-based line number (the header is line 0).
        line: usize,
        /// Human-readable description of what failed to parse.
        reason: String,
    },

    /// The source file could not be read at all.
    #[error("failed to read {path}")]
    Io {
        /// Path that failed to open or read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl DataError {
    pub(crate) fn malformed(path: &std::path::Path, line: usize, reason: impl Into<String>) -> Self {
        DataError::MalformedRow {
            path: path.to_path_buf(),
            line,
            reason: reason.into(),
        }
    }
}
