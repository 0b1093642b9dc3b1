//! Pipeline processor implementation.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;

use crate::config::{AudioConfig, Config};
use crate::converter::{CommandBuilder, ConverterError, FfmpegTranscoder, Transcoder};
use crate::inspector::{FfprobeInspector, MediaProbe};
use crate::metrics;
use crate::placer::{ensure_parent_dir, DestinationLock, LockAttempt, PlacerError, StagingFile};
use crate::settings::{EffectiveSettings, EndTrim};

use super::types::{BatchReport, ItemReport, ProcessOutcome, ProcessingRequest, FAILED_LABEL};

/// Error type for pipeline operations.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Source bulletin does not exist.
    #[error("Input not found: {path}")]
    InputNotFound { path: PathBuf },

    /// Locking, staging or publication failed.
    #[error("Placement failed: {0}")]
    Placement(#[from] PlacerError),

    /// Transcoder could not be run to completion.
    #[error("Transcode failed: {0}")]
    Transcode(#[from] ConverterError),

    /// Transcoder exited non-zero.
    #[error("Transcoder exited unsuccessfully ({})", describe_exit(.exit_code))]
    TranscodeFailed {
        exit_code: Option<i32>,
        stderr: String,
    },

    /// Transcoded file has no audio stream.
    #[error("Transcoded output has no audio stream: {path}")]
    InvalidOutput { path: PathBuf },
}

fn describe_exit(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

/// Processes bulletins one request at a time.
///
/// A request publishes its destination at most once. Concurrent requests for
/// the same destination, in this process or any other, are serialised by the
/// lock marker beside the destination.
pub struct AudioPipeline<T: Transcoder, P: MediaProbe> {
    audio: AudioConfig,
    commands: CommandBuilder,
    transcoder: Arc<T>,
    probe: Arc<P>,
}

impl AudioPipeline<FfmpegTranscoder, FfprobeInspector> {
    /// Pipeline backed by the configured ffmpeg and ffprobe binaries.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.audio.clone(),
            CommandBuilder::new(&config.converter),
            FfmpegTranscoder::new(config.converter.clone()),
            FfprobeInspector::new(config.converter.clone()),
        )
    }
}

impl<T: Transcoder, P: MediaProbe> AudioPipeline<T, P> {
    /// Creates a new pipeline.
    pub fn new(audio: AudioConfig, commands: CommandBuilder, transcoder: T, probe: P) -> Self {
        Self {
            audio,
            commands,
            transcoder: Arc::new(transcoder),
            probe: Arc::new(probe),
        }
    }

    /// Checks that the transcoder can be started.
    pub async fn validate(&self) -> Result<(), ConverterError> {
        self.transcoder.validate().await
    }

    /// Processes one request and reports whether a valid artifact now exists
    /// at its destination.
    ///
    /// Every failure is logged and reported as `false`.
    pub async fn process(&self, request: &ProcessingRequest) -> bool {
        self.run(request).await.is_ok()
    }

    /// Processes one request, returning the detailed outcome.
    ///
    /// Failures are logged and counted before being returned.
    pub async fn run(&self, request: &ProcessingRequest) -> Result<ProcessOutcome, PipelineError> {
        let result = self.execute(request).await;
        match &result {
            Ok(outcome) => metrics::record_outcome(outcome.label()),
            Err(e) => {
                tracing::error!(
                    "Failed to process {} into {}: {}",
                    request.input_path().display(),
                    request.destination_path().display(),
                    e
                );
                metrics::record_outcome(FAILED_LABEL);
            }
        }
        result
    }

    /// Processes requests sequentially.
    pub async fn process_batch(&self, requests: &[ProcessingRequest]) -> BatchReport {
        let started_at = Utc::now();
        let mut items = Vec::with_capacity(requests.len());

        for request in requests {
            let item = match self.run(request).await {
                Ok(outcome) => ItemReport {
                    destination: request.destination_path().to_path_buf(),
                    outcome: outcome.label().to_string(),
                    success: true,
                    error: None,
                },
                Err(e) => ItemReport {
                    destination: request.destination_path().to_path_buf(),
                    outcome: FAILED_LABEL.to_string(),
                    success: false,
                    error: Some(e.to_string()),
                },
            };
            items.push(item);
        }

        let succeeded = items.iter().filter(|i| i.success).count();
        let failed = items.len() - succeeded;

        tracing::info!(
            "Batch finished: {} succeeded, {} failed of {}",
            succeeded,
            failed,
            items.len()
        );

        BatchReport {
            started_at,
            finished_at: Utc::now(),
            items,
            succeeded,
            failed,
        }
    }

    async fn execute(&self, request: &ProcessingRequest) -> Result<ProcessOutcome, PipelineError> {
        let input = request.input_path();
        let destination = request.destination_path();

        if destination.exists() {
            tracing::info!("{} already exists, skipping", destination.display());
            return Ok(ProcessOutcome::AlreadyPresent);
        }

        if !input.is_file() {
            return Err(PipelineError::InputNotFound {
                path: input.to_path_buf(),
            });
        }

        ensure_parent_dir(destination).await?;

        // Released on every return path below
        let _lock = match DestinationLock::acquire(destination).await? {
            LockAttempt::Acquired(lock) => lock,
            LockAttempt::Held { marker } => {
                tracing::info!(
                    "{} is being processed elsewhere ({}), deferring",
                    destination.display(),
                    marker.display()
                );
                return Ok(ProcessOutcome::Deferred);
            }
        };

        if destination.exists() {
            tracing::info!(
                "{} was published while waiting for the lock",
                destination.display()
            );
            return Ok(ProcessOutcome::AlreadyPresent);
        }

        let settings = EffectiveSettings::resolve(&self.audio, request.overrides());
        let end_trim = self.end_trim(input, &settings).await;

        let staging = StagingFile::for_destination(destination)?;
        let args = self.commands.build(
            input,
            staging.path(),
            &settings,
            end_trim.duration_limit(),
        );

        tracing::info!(
            "Transcoding {} to {} ({}, {})",
            input.display(),
            destination.display(),
            settings.output_format,
            settings.quality_tier
        );
        tracing::debug!("{} {}", self.transcoder.name(), args.join(" "));

        let started = Instant::now();
        let result = self.transcoder.transcode(&args).await;
        let elapsed = started.elapsed();

        let output = match result {
            Ok(output) => output,
            Err(e) => {
                metrics::observe_transcode(
                    settings.output_format.as_str(),
                    false,
                    elapsed.as_secs_f64(),
                );
                return Err(e.into());
            }
        };
        metrics::observe_transcode(
            settings.output_format.as_str(),
            output.success,
            elapsed.as_secs_f64(),
        );

        if !output.success {
            tracing::error!(
                "{} failed on {}: {}",
                self.transcoder.name(),
                input.display(),
                output.stderr.trim()
            );
            return Err(PipelineError::TranscodeFailed {
                exit_code: output.exit_code,
                stderr: output.stderr,
            });
        }

        let size_bytes = staging.staged_size().await?;

        if self.audio.verify_output && !self.probe.has_audio(staging.path()).await {
            return Err(PipelineError::InvalidOutput {
                path: staging.path().to_path_buf(),
            });
        }

        staging.promote(destination).await?;

        tracing::info!(
            "Published {} ({} bytes) in {}ms",
            destination.display(),
            size_bytes,
            elapsed.as_millis()
        );

        Ok(ProcessOutcome::Published {
            size_bytes,
            duration_ms: elapsed.as_millis() as u64,
            end_trim,
        })
    }

    /// Probes the source when an end trim is configured and logs when the
    /// trim has to be dropped.
    async fn end_trim(&self, input: &Path, settings: &EffectiveSettings) -> EndTrim {
        if settings.trim_end_seconds <= 0.0 {
            return EndTrim::NotRequested;
        }

        let duration = self
            .probe
            .probe(input)
            .await
            .and_then(|info| info.duration_secs);
        let end_trim = settings.end_trim(duration);

        match end_trim {
            EndTrim::UnknownDuration => tracing::warn!(
                "Could not determine duration of {}, skipping end trim",
                input.display()
            ),
            EndTrim::TooShort { computed } => tracing::warn!(
                "Trims leave {:.1}s of {}, skipping end trim",
                computed,
                input.display()
            ),
            EndTrim::Limit(limit) => {
                tracing::debug!("Limiting {} to {:.1}s", input.display(), limit)
            }
            EndTrim::NotRequested => {}
        }

        end_trim
    }
}
