//! Mock media probe for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::inspector::{MediaInfo, MediaProbe};

/// Mock implementation of the MediaProbe trait.
///
/// Paths without a configured result get the default, which starts out as
/// `None` (probe failure).
#[derive(Debug, Clone, Default)]
pub struct MockProbe {
    results: Arc<RwLock<HashMap<PathBuf, Option<MediaInfo>>>>,
    default_result: Arc<RwLock<Option<MediaInfo>>>,
    /// Every path probed, in order.
    probed: Arc<RwLock<Vec<PathBuf>>>,
}

impl MockProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a probe that reports `info` for every path.
    pub fn with_default(info: Option<MediaInfo>) -> Self {
        Self {
            default_result: Arc::new(RwLock::new(info)),
            ..Self::default()
        }
    }

    /// Set the result for a specific path.
    pub async fn set_result(&self, path: impl AsRef<Path>, info: Option<MediaInfo>) {
        self.results
            .write()
            .await
            .insert(path.as_ref().to_path_buf(), info);
    }

    pub async fn set_default(&self, info: Option<MediaInfo>) {
        *self.default_result.write().await = info;
    }

    pub async fn probed_paths(&self) -> Vec<PathBuf> {
        self.probed.read().await.clone()
    }

    pub async fn probe_count(&self) -> usize {
        self.probed.read().await.len()
    }
}

#[async_trait]
impl MediaProbe for MockProbe {
    fn name(&self) -> &str {
        "mock"
    }

    async fn probe(&self, path: &Path) -> Option<MediaInfo> {
        self.probed.write().await.push(path.to_path_buf());

        if let Some(result) = self.results.read().await.get(path) {
            return result.clone();
        }
        self.default_result.read().await.clone()
    }
}
