use std::collections::HashSet;

use super::{types::Config, ConfigError};

/// Loudness range accepted by ffmpeg's loudnorm filter, in LUFS.
const LOUDNORM_MIN_LUFS: f64 = -70.0;
const LOUDNORM_MAX_LUFS: f64 = -5.0;

/// Validate configuration
/// Currently validates:
/// - Trim values are finite and non-negative (global and per programme)
/// - Timeouts are non-zero
/// - Programme names are non-empty and unique
/// - Programme output names are plain file stems
///
/// A loudness target outside loudnorm's accepted range is logged, not rejected.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    check_trim("audio.trim_start_seconds", config.audio.trim_start_seconds)?;
    check_trim("audio.trim_end_seconds", config.audio.trim_end_seconds)?;

    if let Some(lufs) = config.audio.normalise_lufs {
        if !lufs.is_finite() {
            return Err(ConfigError::ValidationError(
                "audio.normalise_lufs must be a finite number".to_string(),
            ));
        }
        if !(LOUDNORM_MIN_LUFS..=LOUDNORM_MAX_LUFS).contains(&lufs) {
            tracing::warn!(
                "audio.normalise_lufs = {} is outside loudnorm's accepted range ({} to {}); ffmpeg may reject it",
                lufs,
                LOUDNORM_MIN_LUFS,
                LOUDNORM_MAX_LUFS
            );
        }
    }

    if config.converter.transcode_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "converter.transcode_timeout_secs cannot be 0".to_string(),
        ));
    }
    if config.converter.probe_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "converter.probe_timeout_secs cannot be 0".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for (i, programme) in config.programmes.iter().enumerate() {
        if programme.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "programmes[{}].name cannot be empty",
                i
            )));
        }
        if !seen.insert(programme.name.to_lowercase()) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate programme name: {}",
                programme.name
            )));
        }
        if let Some(start) = programme.trim_start_seconds {
            check_trim(&format!("programmes[{}].trim_start_seconds", i), start)?;
        }
        if let Some(end) = programme.trim_end_seconds {
            check_trim(&format!("programmes[{}].trim_end_seconds", i), end)?;
        }
        let stem = programme.output_stem();
        if stem.contains('/') || stem.contains('\\') || stem == "." || stem == ".." {
            return Err(ConfigError::ValidationError(format!(
                "programmes[{}].output_name must be a plain file name, got {:?}",
                i, stem
            )));
        }
    }

    Ok(())
}

fn check_trim(key: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "{} must be a non-negative number, got {}",
            key, value
        )));
    }
    Ok(())
}
