//! Placer module for guarding and publishing bulletin files.
//!
//! This module provides the two filesystem primitives the pipeline is built on:
//!
//! - [`DestinationLock`]: a marker file created with create-new semantics so at
//!   most one attempt, in any process, works on a destination at a time
//! - [`StagingFile`]: a private, uniquely-named file beside the destination that
//!   is either renamed onto it atomically or deleted
//!
//! Both are RAII guards: dropping them removes their file, so cleanup happens
//! on every exit path.
//!
//! # Example
//!
//! ```ignore
//! use bulletin_core::placer::{DestinationLock, LockAttempt, StagingFile};
//!
//! let LockAttempt::Acquired(_lock) = DestinationLock::acquire(&destination).await? else {
//!     return Ok(()); // someone else is publishing it
//! };
//!
//! let staging = StagingFile::for_destination(&destination)?;
//! write_output(staging.path()).await?;
//! staging.promote(&destination).await?;
//! ```

mod error;
mod lock;
mod staging;

pub use error::PlacerError;
pub use lock::{DestinationLock, LockAttempt};
pub use staging::{ensure_parent_dir, StagingFile};
