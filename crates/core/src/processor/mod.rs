//! Processor module for the bulletin post-processing pipeline.
//!
//! This module provides the `AudioPipeline` which coordinates, per request:
//! - Locking: at most one attempt per destination path
//! - Transcoding: trim, normalise and encode into a private staging file
//! - Publication: an atomic rename of the staged file onto the destination
//!
//! Lock markers and staging files are removed on every exit path.
//!
//! # Example
//!
//! ```ignore
//! use bulletin_core::config::load_config;
//! use bulletin_core::processor::{AudioPipeline, ProcessingRequest};
//!
//! let config = load_config(Path::new("config.toml"))?;
//! let pipeline = AudioPipeline::from_config(&config);
//!
//! let programme = config.programme("Six O'Clock News").unwrap();
//! let request = ProcessingRequest::for_programme(&config, programme, "/downloads/six.m4a");
//!
//! if pipeline.process(&request).await {
//!     println!("Published {}", request.destination_path().display());
//! }
//! ```

mod pipeline;
mod types;

pub use pipeline::{AudioPipeline, PipelineError};
pub use types::{BatchReport, ItemReport, ProcessOutcome, ProcessingRequest, RunTotals, FAILED_LABEL};
