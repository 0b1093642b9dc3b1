//! Testing utilities and mock implementations.
//!
//! The mocks stand in for the external ffmpeg and ffprobe engines so the
//! pipeline can be exercised end to end without either installed.
//!
//! # Example
//!
//! ```rust,ignore
//! use bulletin_core::testing::{fixtures, MockProbe, MockTranscoder};
//!
//! let transcoder = MockTranscoder::new();
//! let probe = MockProbe::with_default(Some(MediaInfo::audio(60.0)));
//! let pipeline = AudioPipeline::new(audio, &converter, transcoder.clone(), probe.clone());
//! ```

mod mock_probe;
mod mock_transcoder;

pub use mock_probe::MockProbe;
pub use mock_transcoder::{MockBehavior, MockTranscoder, MOCK_OUTPUT};

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::path::{Path, PathBuf};

    use crate::config::AudioConfig;
    use crate::converter::{OutputFormat, QualityTier};

    /// Audio config with the given trims and otherwise defaults.
    pub fn audio_config(trim_start: f64, trim_end: f64) -> AudioConfig {
        AudioConfig {
            trim_start_seconds: trim_start,
            trim_end_seconds: trim_end,
            ..AudioConfig::default()
        }
    }

    /// Audio config producing the given format and tier.
    pub fn audio_config_for(format: OutputFormat, quality: QualityTier) -> AudioConfig {
        AudioConfig {
            format,
            quality,
            ..AudioConfig::default()
        }
    }

    /// Writes a stand-in source bulletin into `dir` and returns its path.
    pub fn source_file(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"source-bulletin").unwrap_or_else(|e| {
            panic!("failed to write fixture {}: {}", path.display(), e)
        });
        path
    }
}
