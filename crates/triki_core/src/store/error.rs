//! Save store error types.

use crate::RecordError;
use derive_more::{Display, Error};
use std::path::PathBuf;
use tracing::instrument;

/// What went wrong in a save store operation.
#[derive(Debug, Display, Error)]
pub enum StoreErrorKind {
    /// Empty, too long, or containing a reserved character.
    #[display("invalid filename {_0:?}")]
    InvalidFilename(#[error(not(source))] String),

    /// The save file does not exist.
    #[display("save file not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),

    /// The filesystem refused an operation.
    #[display("I/O error on {}: {source}", path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file exists but does not hold a valid save record.
    #[display("corrupt save file {}: {source}", path.display())]
    Corrupt {
        /// File that failed to decode.
        path: PathBuf,
        /// Decoding failure.
        source: RecordError,
    },
}

/// Save store error with location tracking.
#[derive(Debug, Display, Error)]
#[display("Store error: {} at {}:{}", kind, file, line)]
pub struct StoreError {
    /// What went wrong.
    pub kind: StoreErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
    #[track_caller]
    #[instrument(skip(kind))]
    pub fn new(kind: StoreErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Whether the error is a missing save file.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, StoreErrorKind::NotFound(_))
    }
}

impl From<StoreErrorKind> for StoreError {
    #[track_caller]
    fn from(kind: StoreErrorKind) -> Self {
        Self::new(kind)
    }
}
