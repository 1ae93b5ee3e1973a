//! Core Traits
//!
//! The seams where the estimator meets the outside world:
//!
//! - [`time`] - where arrival timestamps come from
//! - [`stream`] - where samples come from
//!
//! The estimator itself is a concrete type. Only its inputs are abstract, so
//! the same core runs against a hardware FIFO, a recorded log, or a test
//! fixture.

pub mod stream;
pub mod time;

pub use stream::Stream;
pub use time::TimeSource;
