//! Private staging files and their atomic promotion.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::error::PlacerError;

/// A uniquely-named file beside the destination that receives in-progress
/// output.
///
/// Staging in the destination's own directory keeps the final rename on one
/// filesystem, which is what makes publication atomic. The file is deleted
/// when the guard is dropped unless [`promote`](Self::promote) succeeded.
#[derive(Debug)]
pub struct StagingFile {
    path: PathBuf,
    armed: bool,
}

impl StagingFile {
    /// Reserves a staging path for `destination`:
    /// `<file name>.processing.<8 hex chars>` in the same directory.
    ///
    /// Nothing is created on disk; the transcoder writes the file.
    pub fn for_destination(destination: &Path) -> Result<Self, PlacerError> {
        let name = destination
            .file_name()
            .ok_or_else(|| PlacerError::InvalidDestination {
                path: destination.to_path_buf(),
            })?;

        let unique = uuid::Uuid::new_v4().simple().to_string();
        let mut staged: OsString = name.to_os_string();
        staged.push(format!(".processing.{}", &unique[..8]));

        Ok(Self {
            path: destination.with_file_name(staged),
            armed: true,
        })
    }

    /// Path of the staging file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the staged file, failing if the transcoder did not produce it.
    pub async fn staged_size(&self) -> Result<u64, PlacerError> {
        match fs::metadata(&self.path).await {
            Ok(meta) if meta.is_file() => Ok(meta.len()),
            Ok(_) => Err(PlacerError::StagingMissing {
                path: self.path.clone(),
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(PlacerError::StagingMissing {
                path: self.path.clone(),
            }),
            Err(e) => Err(PlacerError::Io(e)),
        }
    }

    /// Atomically renames the staged file onto `destination`.
    ///
    /// On failure the guard is dropped and the staged file removed.
    pub async fn promote(mut self, destination: &Path) -> Result<(), PlacerError> {
        fs::rename(&self.path, destination).await.map_err(|e| {
            PlacerError::move_failed(self.path.clone(), destination.to_path_buf(), e)
        })?;
        self.armed = false;
        Ok(())
    }
}

/// Creates the destination's parent directory if it does not exist.
pub async fn ensure_parent_dir(destination: &Path) -> Result<(), PlacerError> {
    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| PlacerError::DirectoryCreationFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
    }
    Ok(())
}

impl Drop for StagingFile {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!("Removed staging file {}", self.path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                "Failed to clean up staging file {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}
