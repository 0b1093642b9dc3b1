//! FFmpeg argument construction.

use std::path::Path;

use crate::settings::EffectiveSettings;

use super::config::ConverterConfig;

/// True-peak ceiling for loudness normalisation, in dBTP.
pub const LOUDNORM_TRUE_PEAK: f64 = -1.0;
/// Loudness range target for loudness normalisation, in LU.
pub const LOUDNORM_RANGE: f64 = 7.0;

/// Builds ffmpeg argument lists from resolved settings.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    log_level: String,
    extra_args: Vec<String>,
}

impl Default for CommandBuilder {
    fn default() -> Self {
        Self::new(&ConverterConfig::default())
    }
}

impl CommandBuilder {
    pub fn new(config: &ConverterConfig) -> Self {
        Self {
            log_level: config.ffmpeg_log_level.clone(),
            extra_args: config.extra_ffmpeg_args.clone(),
        }
    }

    /// Builds the argument list (without the program name) that transcodes
    /// `input` into `output`.
    ///
    /// `duration_limit` is the end-trim limit computed from the probed source
    /// duration; `None` leaves the end untouched.
    pub fn build(
        &self,
        input: &Path,
        output: &Path,
        settings: &EffectiveSettings,
        duration_limit: Option<f64>,
    ) -> Vec<String> {
        let mut args = vec![
            "-y".to_string(), // Overwrite output
            "-i".to_string(),
            input.to_string_lossy().to_string(),
        ];

        if settings.trim_start_seconds > 0.0 {
            args.extend([
                "-ss".to_string(),
                format_seconds(settings.trim_start_seconds),
            ]);
        }

        if let Some(limit) = duration_limit {
            args.extend(["-t".to_string(), format_seconds(limit)]);
        }

        if let Some(lufs) = settings.loudness_target_lufs {
            args.extend(["-af".to_string(), loudnorm_filter(lufs)]);
        }

        // Audio codec and bitrate
        let format = settings.output_format;
        args.extend(["-codec:a".to_string(), format.ffmpeg_codec().to_string()]);
        if let Some(bitrate) = format.bitrate(settings.quality_tier) {
            args.extend(["-b:a".to_string(), bitrate.to_string()]);
        }

        // Audio only
        args.push("-vn".to_string());

        // The staging file name carries no usable extension
        args.extend(["-f".to_string(), format.as_str().to_string()]);

        args.extend(["-loglevel".to_string(), self.log_level.clone()]);

        args.extend(self.extra_args.iter().cloned());

        // Output
        args.push(output.to_string_lossy().to_string());

        args
    }
}

/// Loudnorm filter expression for the given integrated loudness target.
pub fn loudnorm_filter(lufs: f64) -> String {
    format!(
        "loudnorm=I={}:TP={}:LRA={}",
        format_seconds(lufs),
        format_seconds(LOUDNORM_TRUE_PEAK),
        format_seconds(LOUDNORM_RANGE)
    )
}

/// Renders a number with at least one decimal place (`54` becomes `54.0`).
pub fn format_seconds(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Returns the value following `flag` in an argument list.
pub fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}
