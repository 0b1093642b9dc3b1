//! FFmpeg-based transcoder implementation.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tokio::time::{timeout, Duration};

use super::config::ConverterConfig;
use super::error::ConverterError;
use super::traits::Transcoder;
use super::types::TranscodeOutput;

/// Runs the ffmpeg binary as a child process.
pub struct FfmpegTranscoder {
    config: ConverterConfig,
}

impl FfmpegTranscoder {
    /// Creates a new FFmpeg transcoder with the given configuration.
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    fn map_spawn_error(&self, e: std::io::Error) -> ConverterError {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConverterError::FfmpegNotFound {
                path: self.config.ffmpeg_path.clone(),
            }
        } else {
            ConverterError::Io(e)
        }
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn transcode(&self, args: &[String]) -> Result<TranscodeOutput, ConverterError> {
        let start = Instant::now();

        // The child is killed if the timeout drops the wait future
        let child = Command::new(&self.config.ffmpeg_path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.map_spawn_error(e))?;

        let timeout_duration = Duration::from_secs(self.config.transcode_timeout_secs);
        let output = match timeout(timeout_duration, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(ConverterError::Timeout {
                    timeout_secs: self.config.transcode_timeout_secs,
                });
            }
        };

        tracing::debug!(
            "ffmpeg exited with {:?} after {} ms",
            output.status.code(),
            start.elapsed().as_millis()
        );

        Ok(TranscodeOutput {
            exit_code: output.status.code(),
            success: output.status.success(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        let output = Command::new(&self.config.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.map_spawn_error(e))?;

        if !output.status.success() {
            return Err(ConverterError::Io(std::io::Error::other(format!(
                "{} -version exited with {:?}",
                self.config.ffmpeg_path.display(),
                output.status.code()
            ))));
        }

        Ok(())
    }
}
