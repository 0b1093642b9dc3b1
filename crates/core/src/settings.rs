//! Effective processing parameters for a single bulletin.
//!
//! Global [`AudioConfig`] values are merged with optional per-item
//! [`ItemOverrides`]; an override wins field by field.

use serde::{Deserialize, Serialize};

use crate::config::AudioConfig;
use crate::converter::{OutputFormat, QualityTier};

/// Target used when only the legacy on/off normalisation flag is set.
pub const LEGACY_NORMALISE_LUFS: f64 = -16.0;

/// Per-item settings that take precedence over the global audio config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trim_start_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trim_end_seconds: Option<f64>,
}

/// Fully resolved settings for one processing attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EffectiveSettings {
    /// Seconds skipped at the start; never negative.
    pub trim_start_seconds: f64,
    /// Seconds dropped at the end; never negative.
    pub trim_end_seconds: f64,
    /// Loudness normalisation target, `None` disables normalisation.
    pub loudness_target_lufs: Option<f64>,
    pub output_format: OutputFormat,
    pub quality_tier: QualityTier,
}

impl EffectiveSettings {
    /// Merges `overrides` over `audio`.
    pub fn resolve(audio: &AudioConfig, overrides: Option<&ItemOverrides>) -> Self {
        let trim_start = overrides
            .and_then(|o| o.trim_start_seconds)
            .unwrap_or(audio.trim_start_seconds);
        let trim_end = overrides
            .and_then(|o| o.trim_end_seconds)
            .unwrap_or(audio.trim_end_seconds);

        Self {
            trim_start_seconds: sanitize_trim("trim_start_seconds", trim_start),
            trim_end_seconds: sanitize_trim("trim_end_seconds", trim_end),
            loudness_target_lufs: resolve_loudness(audio),
            output_format: audio.format,
            quality_tier: audio.quality,
        }
    }

    /// Works out the `-t` duration limit for the end trim.
    ///
    /// `source_duration` is the probed duration of the input, `None` when unknown.
    pub fn end_trim(&self, source_duration: Option<f64>) -> EndTrim {
        if self.trim_end_seconds <= 0.0 {
            return EndTrim::NotRequested;
        }
        match source_duration {
            None => EndTrim::UnknownDuration,
            Some(duration) => {
                let target = duration - self.trim_start_seconds - self.trim_end_seconds;
                if target > 0.0 {
                    EndTrim::Limit(target)
                } else {
                    EndTrim::TooShort { computed: target }
                }
            }
        }
    }
}

/// Result of the end-trim computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EndTrim {
    /// No end trim configured.
    NotRequested,
    /// Output duration limit in seconds.
    Limit(f64),
    /// Source duration could not be determined; end trim skipped.
    UnknownDuration,
    /// Trims consume the whole source; end trim skipped.
    TooShort { computed: f64 },
}

impl EndTrim {
    pub fn duration_limit(&self) -> Option<f64> {
        match self {
            Self::Limit(secs) => Some(*secs),
            _ => None,
        }
    }
}

fn resolve_loudness(audio: &AudioConfig) -> Option<f64> {
    if let Some(lufs) = audio.normalise_lufs {
        return Some(lufs);
    }
    let legacy = audio.normalise.unwrap_or(false) || audio.normalize.unwrap_or(false);
    legacy.then_some(LEGACY_NORMALISE_LUFS)
}

fn sanitize_trim(key: &str, value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        tracing::warn!("Ignoring invalid {} value {}, using 0", key, value);
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audio() -> AudioConfig {
        AudioConfig::default()
    }

    #[test]
    fn test_defaults() {
        let settings = EffectiveSettings::resolve(&audio(), None);
        assert_eq!(settings.trim_start_seconds, 0.0);
        assert_eq!(settings.trim_end_seconds, 0.0);
        assert_eq!(settings.loudness_target_lufs, None);
        assert_eq!(settings.output_format, OutputFormat::Mp3);
        assert_eq!(settings.quality_tier, QualityTier::High);
    }

    #[test]
    fn test_override_precedence() {
        let mut global = audio();
        global.trim_start_seconds = 4.0;
        global.trim_end_seconds = 2.0;
        let overrides = ItemOverrides {
            trim_start_seconds: Some(6.0),
            trim_end_seconds: None,
        };

        let settings = EffectiveSettings::resolve(&global, Some(&overrides));
        assert_eq!(settings.trim_start_seconds, 6.0);
        assert_eq!(settings.trim_end_seconds, 2.0);
    }

    #[test]
    fn test_override_zero_wins_over_global() {
        let mut global = audio();
        global.trim_start_seconds = 4.0;
        let overrides = ItemOverrides {
            trim_start_seconds: Some(0.0),
            trim_end_seconds: None,
        };
        let settings = EffectiveSettings::resolve(&global, Some(&overrides));
        assert_eq!(settings.trim_start_seconds, 0.0);
    }

    #[test]
    fn test_negative_trim_clamped() {
        let overrides = ItemOverrides {
            trim_start_seconds: Some(-3.0),
            trim_end_seconds: Some(f64::NAN),
        };
        let settings = EffectiveSettings::resolve(&audio(), Some(&overrides));
        assert_eq!(settings.trim_start_seconds, 0.0);
        assert_eq!(settings.trim_end_seconds, 0.0);
    }

    #[test]
    fn test_explicit_lufs_wins() {
        let mut global = audio();
        global.normalise_lufs = Some(-23.0);
        global.normalise = Some(true);
        let settings = EffectiveSettings::resolve(&global, None);
        assert_eq!(settings.loudness_target_lufs, Some(-23.0));
    }

    #[test]
    fn test_explicit_zero_lufs_is_kept() {
        let mut global = audio();
        global.normalise_lufs = Some(0.0);
        let settings = EffectiveSettings::resolve(&global, None);
        assert_eq!(settings.loudness_target_lufs, Some(0.0));
    }

    #[test]
    fn test_legacy_normalise_fallback() {
        let cases = [
            (Some(true), None, Some(-16.0)),
            (None, Some(true), Some(-16.0)),
            (Some(false), None, None),
            (None, Some(false), None),
            (Some(false), Some(true), Some(-16.0)),
            (None, None, None),
        ];
        for (normalise, normalize, expected) in cases {
            let mut global = audio();
            global.normalise = normalise;
            global.normalize = normalize;
            let settings = EffectiveSettings::resolve(&global, None);
            assert_eq!(
                settings.loudness_target_lufs, expected,
                "normalise={:?} normalize={:?}",
                normalise, normalize
            );
        }
    }

    #[test]
    fn test_format_and_quality_passthrough() {
        let mut global = audio();
        global.format = OutputFormat::M4a;
        global.quality = QualityTier::Low;
        let settings = EffectiveSettings::resolve(&global, None);
        assert_eq!(settings.output_format, OutputFormat::M4a);
        assert_eq!(settings.quality_tier, QualityTier::Low);
    }

    fn trims(start: f64, end: f64) -> EffectiveSettings {
        let mut global = audio();
        global.trim_start_seconds = start;
        global.trim_end_seconds = end;
        EffectiveSettings::resolve(&global, None)
    }

    #[test]
    fn test_end_trim_arithmetic() {
        let end_trim = trims(4.0, 2.0).end_trim(Some(60.0));
        assert_eq!(end_trim, EndTrim::Limit(54.0));
        assert_eq!(end_trim.duration_limit(), Some(54.0));
    }

    #[test]
    fn test_end_trim_unknown_duration() {
        let end_trim = trims(4.0, 2.0).end_trim(None);
        assert_eq!(end_trim, EndTrim::UnknownDuration);
        assert_eq!(end_trim.duration_limit(), None);
    }

    #[test]
    fn test_end_trim_over_trim() {
        let end_trim = trims(4.0, 2.0).end_trim(Some(5.0));
        assert_eq!(end_trim, EndTrim::TooShort { computed: -1.0 });
        assert_eq!(end_trim.duration_limit(), None);
    }

    #[test]
    fn test_end_trim_exact_fit_is_skipped() {
        let end_trim = trims(4.0, 2.0).end_trim(Some(6.0));
        assert!(matches!(end_trim, EndTrim::TooShort { .. }));
    }

    #[test]
    fn test_end_trim_not_requested() {
        let end_trim = trims(4.0, 0.0).end_trim(Some(60.0));
        assert_eq!(end_trim, EndTrim::NotRequested);
        assert_eq!(end_trim.duration_limit(), None);
    }
}
