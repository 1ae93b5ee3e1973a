//! Sample streams
//!
//! How samples reach the estimator. The core itself never subscribes to a
//! sensor: these types are the pull-side plumbing a host or firmware uses
//! to feed it in arrival order.
//!
//! ## Module Organization
//!
//! - Core error type (this file)
//! - `memory` - replay a slice of recorded samples
//! - `interval` - fixed-interval delivery from a raw sensor with arrival stamping
//! - `processor` - drive any sample stream through a [`VelocityEstimator`](crate::VelocityEstimator)
//! - `file` - CSV / JSON Lines sample logs (requires `std`)

use core::fmt;

#[cfg(feature = "stream-memory")]
pub mod memory;

#[cfg(feature = "stream-interval")]
pub mod interval;

pub mod processor;

#[cfg(feature = "std")]
pub mod file;

#[cfg(feature = "stream-memory")]
pub use memory::MemoryStream;

#[cfg(feature = "stream-interval")]
pub use interval::IntervalSampler;

pub use processor::{ProcessingStats, SampleProcessor};

#[cfg(feature = "std")]
pub use file::{FileFormat, FileStream, FileStreamStats, ReadingUnits};

pub use crate::traits::Stream;

/// Errors that can occur while pulling samples
#[derive(Debug, Clone, PartialEq)]
pub enum StreamError<E> {
    /// Transport-level error (e.g., I/O error)
    Transport(E),
    /// Malformed record
    Format(&'static str),
    /// End of stream reached
    EndOfStream,
    /// Record longer than the line buffer
    Overflow,
}

impl<E> StreamError<E> {
    /// True for the end-of-stream marker
    pub fn is_end(&self) -> bool {
        matches!(self, Self::EndOfStream)
    }
}

impl<E: fmt::Display> fmt::Display for StreamError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "Transport error: {}", e),
            Self::Format(msg) => write!(f, "Format error: {}", msg),
            Self::EndOfStream => write!(f, "End of stream"),
            Self::Overflow => write!(f, "Record too long"),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug + fmt::Display> std::error::Error for StreamError<E> {}
