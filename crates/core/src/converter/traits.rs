//! Trait definitions for the converter module.

use async_trait::async_trait;

use super::error::ConverterError;
use super::types::TranscodeOutput;

/// An external transcoding engine.
///
/// Implementations run the engine with a prepared argument list and report how
/// it exited; they never interpret the audio themselves.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Returns the name of this transcoder implementation.
    fn name(&self) -> &str;

    /// Runs the engine with `args` (program name excluded).
    ///
    /// Returns `Ok` whenever the process ran to completion, successful or not.
    /// Spawn failures and timeouts are errors.
    async fn transcode(&self, args: &[String]) -> Result<TranscodeOutput, ConverterError>;

    /// Validates that the transcoder is installed and runnable.
    async fn validate(&self) -> Result<(), ConverterError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTranscoder;

    #[async_trait]
    impl Transcoder for EchoTranscoder {
        fn name(&self) -> &str {
            "echo"
        }

        async fn transcode(&self, args: &[String]) -> Result<TranscodeOutput, ConverterError> {
            if args.is_empty() {
                return Ok(TranscodeOutput::failed(1, "no arguments"));
            }
            Ok(TranscodeOutput::ok())
        }

        async fn validate(&self) -> Result<(), ConverterError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_trait_object_dispatch() {
        let transcoder: Box<dyn Transcoder> = Box::new(EchoTranscoder);
        assert_eq!(transcoder.name(), "echo");

        let output = transcoder.transcode(&["-y".to_string()]).await.unwrap();
        assert!(output.success);

        let output = transcoder.transcode(&[]).await.unwrap();
        assert!(!output.success);
        assert_eq!(output.exit_code, Some(1));
    }
}
