//! Types for the inspector module.

use serde::{Deserialize, Serialize};

/// Summary of a media file as reported by the probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    /// Duration in seconds; `None` when the probe reported no usable duration.
    pub duration_secs: Option<f64>,
    /// Whether at least one audio stream is present.
    pub has_audio_stream: bool,
    /// Primary container format name (e.g. "mp3", "mov").
    pub format_name: Option<String>,
}

impl MediaInfo {
    /// Audio-only media of known duration.
    pub fn audio(duration_secs: f64) -> Self {
        Self {
            duration_secs: Some(duration_secs),
            has_audio_stream: true,
            format_name: None,
        }
    }
}
