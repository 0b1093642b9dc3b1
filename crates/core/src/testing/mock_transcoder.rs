//! Mock transcoder for testing.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::converter::{ConverterError, TranscodeOutput, Transcoder};

/// Bytes written to the output path by a successful mock run.
pub const MOCK_OUTPUT: &[u8] = b"ID3\x04\x00mock-bulletin-audio";

/// What the next mock invocations do.
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Write [`MOCK_OUTPUT`] to the output path and exit 0.
    Succeed,
    /// Exit 0 without writing anything.
    SucceedWithoutOutput,
    /// Exit non-zero, optionally leaving a partial output file behind.
    Fail {
        exit_code: i32,
        stderr: String,
        partial_output: bool,
    },
    /// Report a timeout after leaving a partial output file behind.
    Timeout,
    /// Report that the binary could not be started.
    NotFound,
}

/// Mock implementation of the Transcoder trait.
///
/// The output path is taken to be the last argument, as with ffmpeg. Clones
/// share state, so a clone handed to a pipeline can be inspected afterwards.
///
/// # Example
///
/// ```rust,ignore
/// use bulletin_core::testing::{MockBehavior, MockTranscoder};
///
/// let transcoder = MockTranscoder::new();
/// transcoder.set_behavior(MockBehavior::Timeout).await;
///
/// // ... run a pipeline with transcoder.clone() ...
///
/// assert_eq!(transcoder.invocation_count().await, 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockTranscoder {
    /// Argument lists of every invocation.
    invocations: Arc<RwLock<Vec<Vec<String>>>>,
    behavior: Arc<RwLock<MockBehavior>>,
    /// Simulated run time before the behaviour takes effect.
    delay: Arc<RwLock<Duration>>,
}

impl Default for MockTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTranscoder {
    /// Create a mock that succeeds instantly.
    pub fn new() -> Self {
        Self {
            invocations: Arc::new(RwLock::new(Vec::new())),
            behavior: Arc::new(RwLock::new(MockBehavior::Succeed)),
            delay: Arc::new(RwLock::new(Duration::ZERO)),
        }
    }

    /// Create a mock that exits with `exit_code` and `stderr`.
    pub fn failing(exit_code: i32, stderr: &str) -> Self {
        Self {
            behavior: Arc::new(RwLock::new(MockBehavior::Fail {
                exit_code,
                stderr: stderr.to_string(),
                partial_output: true,
            })),
            ..Self::new()
        }
    }

    pub async fn set_behavior(&self, behavior: MockBehavior) {
        *self.behavior.write().await = behavior;
    }

    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = delay;
    }

    /// Get all recorded argument lists.
    pub async fn invocations(&self) -> Vec<Vec<String>> {
        self.invocations.read().await.clone()
    }

    /// Arguments of the most recent invocation.
    pub async fn last_args(&self) -> Option<Vec<String>> {
        self.invocations.read().await.last().cloned()
    }

    pub async fn invocation_count(&self) -> usize {
        self.invocations.read().await.len()
    }

    async fn write_output(args: &[String], contents: &[u8]) -> Result<(), ConverterError> {
        if let Some(output) = args.last() {
            tokio::fs::write(PathBuf::from(output), contents).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Transcoder for MockTranscoder {
    fn name(&self) -> &str {
        "mock"
    }

    async fn transcode(&self, args: &[String]) -> Result<TranscodeOutput, ConverterError> {
        self.invocations.write().await.push(args.to_vec());

        let delay = *self.delay.read().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let behavior = self.behavior.read().await.clone();
        match behavior {
            MockBehavior::Succeed => {
                Self::write_output(args, MOCK_OUTPUT).await?;
                Ok(TranscodeOutput::ok())
            }
            MockBehavior::SucceedWithoutOutput => Ok(TranscodeOutput::ok()),
            MockBehavior::Fail {
                exit_code,
                stderr,
                partial_output,
            } => {
                if partial_output {
                    Self::write_output(args, b"ID3partial").await?;
                }
                Ok(TranscodeOutput::failed(exit_code, stderr))
            }
            MockBehavior::Timeout => {
                Self::write_output(args, b"ID3partial").await?;
                Err(ConverterError::Timeout { timeout_secs: 300 })
            }
            MockBehavior::NotFound => Err(ConverterError::FfmpegNotFound {
                path: PathBuf::from("ffmpeg"),
            }),
        }
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        match *self.behavior.read().await {
            MockBehavior::NotFound => Err(ConverterError::FfmpegNotFound {
                path: PathBuf::from("ffmpeg"),
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_succeed_writes_last_argument() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("out.mp3");
        let mock = MockTranscoder::new();

        let args = vec!["-y".to_string(), output.display().to_string()];
        let result = mock.transcode(&args).await.unwrap();

        assert!(result.success);
        assert_eq!(std::fs::read(&output).unwrap(), MOCK_OUTPUT);
        assert_eq!(mock.invocation_count().await, 1);
        assert_eq!(mock.last_args().await, Some(args));
    }

    #[tokio::test]
    async fn test_failing_leaves_partial_output() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("out.mp3");
        let mock = MockTranscoder::failing(1, "Invalid data found");

        let result = mock
            .transcode(&[output.display().to_string()])
            .await
            .unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(1));
        assert_eq!(result.stderr, "Invalid data found");
        assert!(output.exists());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let mock = MockTranscoder::new();
        let clone = mock.clone();
        clone.set_behavior(MockBehavior::Timeout).await;

        let temp = TempDir::new().unwrap();
        let output = temp.path().join("out.mp3");
        let result = mock.transcode(&[output.display().to_string()]).await;

        assert!(matches!(result, Err(ConverterError::Timeout { .. })));
        assert_eq!(clone.invocation_count().await, 1);
    }

    #[test]
    fn test_blocking_use() {
        let mock = MockTranscoder::new();
        let result = tokio_test::block_on(mock.transcode(&[]));
        assert!(result.unwrap().success);
    }
}
