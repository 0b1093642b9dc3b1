//! Types for the converter module.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Target audio container for published bulletins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Mp3,
    M4a,
    Wav,
}

impl OutputFormat {
    /// Returns the ffmpeg audio codec name for this format.
    pub fn ffmpeg_codec(&self) -> &'static str {
        match self {
            Self::Mp3 => "libmp3lame",
            Self::M4a => "aac",
            Self::Wav => "pcm_s16le",
        }
    }

    /// Returns the format name, also used as the file extension and the `-f` value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::M4a => "m4a",
            Self::Wav => "wav",
        }
    }

    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    /// Returns the bitrate for the given quality tier, or `None` for uncompressed output.
    pub fn bitrate(&self, tier: QualityTier) -> Option<&'static str> {
        match self {
            Self::Mp3 => Some(match tier {
                QualityTier::High => "320k",
                QualityTier::Std => "192k",
                QualityTier::Med => "128k",
                QualityTier::Low => "96k",
            }),
            Self::M4a => Some(match tier {
                QualityTier::High => "256k",
                QualityTier::Std => "128k",
                QualityTier::Med => "96k",
                QualityTier::Low => "64k",
            }),
            Self::Wav => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encoding quality tier, mapped to a per-format bitrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    #[default]
    High,
    Std,
    Med,
    Low,
}

impl QualityTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Std => "std",
            Self::Med => "med",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Captured result of one transcoder invocation that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeOutput {
    /// Process exit code, `None` if terminated by a signal.
    pub exit_code: Option<i32>,
    /// Whether the process exited with status 0.
    pub success: bool,
    /// Captured standard error.
    pub stderr: String,
}

impl TranscodeOutput {
    /// A successful, silent run.
    pub fn ok() -> Self {
        Self {
            exit_code: Some(0),
            success: true,
            stderr: String::new(),
        }
    }

    /// A failed run with the given exit code and stderr.
    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            success: false,
            stderr: stderr.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mp3_bitrate_table() {
        assert_eq!(OutputFormat::Mp3.bitrate(QualityTier::High), Some("320k"));
        assert_eq!(OutputFormat::Mp3.bitrate(QualityTier::Std), Some("192k"));
        assert_eq!(OutputFormat::Mp3.bitrate(QualityTier::Med), Some("128k"));
        assert_eq!(OutputFormat::Mp3.bitrate(QualityTier::Low), Some("96k"));
    }

    #[test]
    fn test_m4a_bitrate_table() {
        assert_eq!(OutputFormat::M4a.bitrate(QualityTier::High), Some("256k"));
        assert_eq!(OutputFormat::M4a.bitrate(QualityTier::Std), Some("128k"));
        assert_eq!(OutputFormat::M4a.bitrate(QualityTier::Med), Some("96k"));
        assert_eq!(OutputFormat::M4a.bitrate(QualityTier::Low), Some("64k"));
    }

    #[test]
    fn test_wav_has_no_bitrate() {
        for tier in [
            QualityTier::High,
            QualityTier::Std,
            QualityTier::Med,
            QualityTier::Low,
        ] {
            assert_eq!(OutputFormat::Wav.bitrate(tier), None);
        }
        assert_eq!(OutputFormat::Wav.ffmpeg_codec(), "pcm_s16le");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(OutputFormat::default(), OutputFormat::Mp3);
        assert_eq!(QualityTier::default(), QualityTier::High);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&OutputFormat::M4a).unwrap();
        assert_eq!(json, "\"m4a\"");
        let tier: QualityTier = serde_json::from_str("\"med\"").unwrap();
        assert_eq!(tier, QualityTier::Med);
    }
}
