//! FFprobe-based media inspector.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tokio::time::{timeout, Duration};

use crate::converter::ConverterConfig;

use super::traits::MediaProbe;
use super::types::MediaInfo;

/// Runs ffprobe with JSON output and summarises the result.
pub struct FfprobeInspector {
    config: ConverterConfig,
}

impl FfprobeInspector {
    /// Creates a new inspector with the given configuration.
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Parses ffprobe JSON output into MediaInfo.
    pub fn parse_probe_output(output: &str) -> Result<MediaInfo, serde_json::Error> {
        #[derive(Deserialize)]
        struct ProbeOutput {
            #[serde(default)]
            format: Option<ProbeFormat>,
            #[serde(default)]
            streams: Vec<ProbeStream>,
        }

        #[derive(Deserialize)]
        struct ProbeFormat {
            format_name: Option<String>,
            duration: Option<String>,
        }

        #[derive(Deserialize)]
        struct ProbeStream {
            codec_type: Option<String>,
        }

        let probe: ProbeOutput = serde_json::from_str(output)?;

        let duration_secs = probe
            .format
            .as_ref()
            .and_then(|f| f.duration.as_ref())
            .and_then(|d| d.trim().parse::<f64>().ok())
            .filter(|d| d.is_finite() && *d > 0.0);

        let format_name = probe
            .format
            .as_ref()
            .and_then(|f| f.format_name.as_deref())
            .and_then(|name| name.split(',').next())
            .map(str::to_string);

        let has_audio_stream = probe
            .streams
            .iter()
            .any(|s| s.codec_type.as_deref() == Some("audio"));

        Ok(MediaInfo {
            duration_secs,
            has_audio_stream,
            format_name,
        })
    }
}

#[async_trait]
impl MediaProbe for FfprobeInspector {
    fn name(&self) -> &str {
        "ffprobe"
    }

    async fn probe(&self, path: &Path) -> Option<MediaInfo> {
        let command = Command::new(&self.config.ffprobe_path)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = match timeout(
            Duration::from_secs(self.config.probe_timeout_secs),
            command,
        )
        .await
        {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                tracing::error!(
                    "Failed to run {} on {}: {}",
                    self.config.ffprobe_path.display(),
                    path.display(),
                    e
                );
                return None;
            }
            Err(_) => {
                tracing::error!(
                    "ffprobe timed out after {} seconds on {}",
                    self.config.probe_timeout_secs,
                    path.display()
                );
                return None;
            }
        };

        if !output.status.success() {
            tracing::error!(
                "ffprobe failed on {}: {}",
                path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return None;
        }

        match Self::parse_probe_output(&String::from_utf8_lossy(&output.stdout)) {
            Ok(info) => Some(info),
            Err(e) => {
                tracing::error!("Failed to parse ffprobe output for {}: {}", path.display(), e);
                None
            }
        }
    }
}
