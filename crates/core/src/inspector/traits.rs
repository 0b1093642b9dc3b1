//! Trait definitions for the inspector module.

use async_trait::async_trait;
use std::path::Path;

use super::types::MediaInfo;

/// An external media-inspection engine.
#[async_trait]
pub trait MediaProbe: Send + Sync {
    /// Returns the name of this probe implementation.
    fn name(&self) -> &str;

    /// Inspects `path`.
    ///
    /// Returns `None` on any failure; callers must treat that as "unknown".
    async fn probe(&self, path: &Path) -> Option<MediaInfo>;

    /// Whether `path` exists and contains at least one audio stream.
    async fn has_audio(&self, path: &Path) -> bool {
        if !path.exists() {
            return false;
        }
        self.probe(path)
            .await
            .map(|info| info.has_audio_stream)
            .unwrap_or(false)
    }
}
