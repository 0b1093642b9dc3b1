//! Converter module for transcoding bulletins with FFmpeg.
//!
//! This module provides the `Transcoder` trait, its ffmpeg-backed
//! implementation, and the `CommandBuilder` that turns resolved settings into
//! an ffmpeg argument list.
//!
//! # Features
//!
//! - Start trim (`-ss`) and end trim via a duration limit (`-t`)
//! - EBU R128 loudness normalisation (`loudnorm`)
//! - MP3, AAC (m4a) and PCM (wav) output with tiered bitrates
//! - Bounded run time; the child is killed on timeout
//!
//! # Example
//!
//! ```ignore
//! use bulletin_core::converter::{CommandBuilder, ConverterConfig, FfmpegTranscoder, Transcoder};
//!
//! let config = ConverterConfig::default();
//! let args = CommandBuilder::new(&config).build(
//!     Path::new("/downloads/news.m4a"),
//!     Path::new("/srv/news/news.mp3.processing.1a2b3c4d"),
//!     &settings,
//!     Some(54.0),
//! );
//!
//! let output = FfmpegTranscoder::new(config).transcode(&args).await?;
//! if !output.success {
//!     eprintln!("ffmpeg failed: {}", output.stderr);
//! }
//! ```

pub mod command;
mod config;
mod error;
mod ffmpeg;
mod traits;
mod types;

pub use command::CommandBuilder;
pub use config::ConverterConfig;
pub use error::ConverterError;
pub use ffmpeg::FfmpegTranscoder;
pub use traits::Transcoder;
pub use types::{OutputFormat, QualityTier, TranscodeOutput};
