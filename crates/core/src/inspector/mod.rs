//! Inspector module for querying media files with FFprobe.
//!
//! The probe is a black box: a failed, timed-out or unparseable run yields
//! `None`, never an error, so callers can degrade gracefully.

mod ffprobe;
mod traits;
mod types;

pub use ffprobe::FfprobeInspector;
pub use traits::MediaProbe;
pub use types::MediaInfo;
