//! Cross-process lock marker for a destination path.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

use super::error::PlacerError;

const LOCK_SUFFIX: &str = ".lock";

/// Outcome of a lock attempt.
#[derive(Debug)]
pub enum LockAttempt {
    /// This process now owns the destination.
    Acquired(DestinationLock),
    /// Another attempt holds the marker.
    Held { marker: PathBuf },
}

/// Exclusive ownership of a destination, backed by a marker file created with
/// create-new semantics.
///
/// The marker holds the owner's process id and is removed when the guard is
/// dropped, whichever way the owning scope exits.
#[derive(Debug)]
pub struct DestinationLock {
    marker: PathBuf,
    file: Option<File>,
}

impl DestinationLock {
    /// Marker path for `destination`: the same path with `.lock` appended.
    pub fn marker_path(destination: &Path) -> Result<PathBuf, PlacerError> {
        let name = destination
            .file_name()
            .ok_or_else(|| PlacerError::InvalidDestination {
                path: destination.to_path_buf(),
            })?;
        let mut marker: OsString = name.to_os_string();
        marker.push(LOCK_SUFFIX);
        Ok(destination.with_file_name(marker))
    }

    /// Attempts to take the lock for `destination`.
    ///
    /// Fails only when the marker cannot be created for a reason other than
    /// already existing.
    pub async fn acquire(destination: &Path) -> Result<LockAttempt, PlacerError> {
        let marker = Self::marker_path(destination)?;

        let file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&marker)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Ok(LockAttempt::Held { marker });
            }
            Err(e) => {
                return Err(PlacerError::LockFailed {
                    path: marker,
                    source: e,
                });
            }
        };

        let mut lock = Self {
            marker,
            file: Some(file),
        };

        // Owner pid is informational only
        if let Some(file) = lock.file.as_mut() {
            let pid = format!("{}\n", std::process::id());
            let written = match file.write_all(pid.as_bytes()).await {
                Ok(()) => file.flush().await,
                Err(e) => Err(e),
            };
            if let Err(e) = written {
                tracing::debug!("Failed to record owner in {}: {}", lock.marker.display(), e);
            }
        }

        Ok(LockAttempt::Acquired(lock))
    }

    /// Path of the marker file.
    pub fn path(&self) -> &Path {
        &self.marker
    }
}

impl Drop for DestinationLock {
    fn drop(&mut self) {
        // Close before removing; some platforms refuse to delete open files
        drop(self.file.take());

        match std::fs::remove_file(&self.marker) {
            Ok(()) => tracing::debug!("Released lock {}", self.marker.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!("Lock marker {} already removed", self.marker.display());
            }
            Err(e) => tracing::warn!(
                "Failed to clean up lock marker {}: {}",
                self.marker.display(),
                e
            ),
        }
    }
}
