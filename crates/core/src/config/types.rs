use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::converter::{ConverterConfig, OutputFormat, QualityTier};
use crate::settings::ItemOverrides;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub converter: ConverterConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub programmes: Vec<ProgrammeConfig>,
}

impl Config {
    /// Finds a programme by name (case-insensitive).
    pub fn programme(&self, name: &str) -> Option<&ProgrammeConfig> {
        self.programmes
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Published path for a programme: `<base_path>/<output_name>.<format>`.
    pub fn destination_for(&self, programme: &ProgrammeConfig) -> PathBuf {
        self.output.base_path.join(format!(
            "{}.{}",
            programme.output_stem(),
            self.audio.format.extension()
        ))
    }
}

/// Global audio post-processing settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AudioConfig {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub quality: QualityTier,
    /// Seconds cut from the start of every bulletin
    #[serde(default)]
    pub trim_start_seconds: f64,
    /// Seconds cut from the end of every bulletin
    #[serde(default)]
    pub trim_end_seconds: f64,
    /// Loudness normalisation target in LUFS; takes precedence over the legacy flags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalise_lufs: Option<f64>,
    /// Legacy on/off normalisation flag (British spelling)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalise: Option<bool>,
    /// Legacy on/off normalisation flag (American spelling)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalize: Option<bool>,
    /// Probe the transcoded file for an audio stream before publishing it
    #[serde(default)]
    pub verify_output: bool,
}

/// Output location configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_base_path")]
    pub base_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
        }
    }
}

fn default_base_path() -> PathBuf {
    PathBuf::from("output")
}

/// A bulletin programme and its per-item overrides
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProgrammeConfig {
    pub name: String,
    /// File stem of the published bulletin (default: name, lower-cased, spaces to underscores)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trim_start_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trim_end_seconds: Option<f64>,
}

impl ProgrammeConfig {
    pub fn output_stem(&self) -> String {
        match &self.output_name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => self.name.replace(' ', "_").to_lowercase(),
        }
    }

    pub fn overrides(&self) -> ItemOverrides {
        ItemOverrides {
            trim_start_seconds: self.trim_start_seconds,
            trim_end_seconds: self.trim_end_seconds,
        }
    }
}
