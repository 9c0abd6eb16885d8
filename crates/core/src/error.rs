//! Error types for batch PowerPoint to PDF conversion.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while preparing or running a conversion batch.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The archive container could not be created.
    #[error("Failed to open archive {path}: {reason}")]
    ArchiveOpen { path: PathBuf, reason: String },

    /// A produced PDF could not be added to the archive.
    #[error("Failed to write archive entry {entry}: {reason}")]
    ArchiveWrite { entry: String, reason: String },

    /// The archive was already finalized.
    #[error("Archive is already closed")]
    ArchiveClosed,

    /// The external converter failed for a source document.
    #[error("Conversion of {source_path} failed: {reason}")]
    Conversion { source_path: PathBuf, reason: String },

    /// The external converter did not finish in time.
    #[error("Conversion of {source_path} timed out after {seconds}s")]
    Timeout { source_path: PathBuf, seconds: u64 },

    /// An operation was requested in the wrong run state.
    #[error("Invalid run state: expected {expected}, found {actual}")]
    InvalidState {
        expected: &'static str,
        actual: crate::RunState,
    },
}
