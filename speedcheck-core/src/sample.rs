//! Timestamped accelerometer samples

use crate::{
    constants::STANDARD_GRAVITY_MS2,
    time::Timestamp,
    vector::Vector3,
};

/// One raw accelerometer reading and its arrival time
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    /// Raw acceleration including gravity, m/s²
    pub acceleration: Vector3,
    /// Arrival time on the monotonic clock, microseconds
    pub timestamp: Timestamp,
}

impl Sample {
    /// Create a sample from a reading in m/s²
    pub const fn new(acceleration: Vector3, timestamp: Timestamp) -> Self {
        Self {
            acceleration,
            timestamp,
        }
    }

    /// Create a sample from a reading in units of g
    ///
    /// Phone sensor APIs commonly report multiples of standard gravity.
    pub fn from_g(reading: Vector3, timestamp: Timestamp) -> Self {
        Self::new(reading * STANDARD_GRAVITY_MS2, timestamp)
    }
}
