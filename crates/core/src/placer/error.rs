//! Error types for the placer module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while guarding or publishing a destination.
#[derive(Debug, Error)]
pub enum PlacerError {
    /// Destination path has no file name component.
    #[error("Invalid destination path: {path}")]
    InvalidDestination { path: PathBuf },

    /// Failed to create destination directory.
    #[error("Failed to create directory: {path}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Creating the lock marker failed for a reason other than it already existing.
    #[error("Failed to create lock marker: {path}")]
    LockFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Staged output was not produced.
    #[error("Staging file not found: {path}")]
    StagingMissing { path: PathBuf },

    /// Failed to move/rename file.
    #[error("Failed to move file from {source} to {destination}")]
    MoveFailed {
        source: PathBuf,
        destination: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlacerError {
    /// Creates a move failed error.
    pub fn move_failed(source: PathBuf, destination: PathBuf, error: std::io::Error) -> Self {
        Self::MoveFailed {
            source,
            destination,
            error,
        }
    }
}
