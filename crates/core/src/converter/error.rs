//! Error types for the converter module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that prevent a transcoder invocation from completing.
///
/// A process that runs and exits non-zero is not an error at this level; it is
/// reported through [`TranscodeOutput`](super::TranscodeOutput).
#[derive(Debug, Error)]
pub enum ConverterError {
    /// FFmpeg binary not found.
    #[error("FFmpeg not found at path: {path}")]
    FfmpegNotFound { path: PathBuf },

    /// Conversion timed out; the child process has been killed.
    #[error("Conversion timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// I/O error while spawning or waiting on the process.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = ConverterError::FfmpegNotFound {
            path: PathBuf::from("/opt/ffmpeg"),
        };
        assert_eq!(err.to_string(), "FFmpeg not found at path: /opt/ffmpeg");
    }

    #[test]
    fn test_timeout_message() {
        let err = ConverterError::Timeout { timeout_secs: 300 };
        assert_eq!(err.to_string(), "Conversion timed out after 300 seconds");
    }
}
