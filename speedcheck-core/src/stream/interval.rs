//! Fixed-interval sample delivery
//!
//! Wraps a raw sensor (a stream of acceleration vectors) and hands out at
//! most one reading per configured interval, stamped with the clock's
//! reading at the moment it was taken. The interval is only a schedule:
//! the stamps record when delivery really happened, so a late tick shows up
//! as a longer `dt` downstream instead of being hidden.

use crate::{
    config::EstimatorConfig,
    constants::US_PER_MS,
    sample::Sample,
    stream::Stream,
    time::{TimeSource, Timestamp},
    vector::Vector3,
};

/// Delivery counters
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IntervalStats {
    /// Samples handed out
    pub delivered: usize,
    /// Deliveries more than one full interval behind schedule
    pub overruns: usize,
}

/// Interval-paced, timestamping adapter over a raw sensor
///
/// ## Example
///
/// ```rust
/// use speedcheck_core::stream::{IntervalSampler, MemoryStream, Stream};
/// use speedcheck_core::time::ManualClock;
/// use speedcheck_core::Vector3;
///
/// let readings = [Vector3::new(0.0, 0.0, 9.8); 4];
/// let clock = ManualClock::new(0);
/// let mut sampler = IntervalSampler::new(MemoryStream::new(&readings), &clock, 50);
///
/// assert!(sampler.poll_next().is_ok());
/// // Too early for the next tick
/// assert!(matches!(sampler.poll_next(), Err(nb::Error::WouldBlock)));
///
/// clock.advance_ms(50);
/// assert_eq!(sampler.poll_next().unwrap().timestamp, 50_000);
/// ```
pub struct IntervalSampler<S, T> {
    /// Raw sensor
    inner: S,
    /// Arrival clock
    clock: T,
    /// Delivery interval in microseconds
    interval_us: u64,
    /// When the next delivery is due; `None` before the first
    next_due: Option<Timestamp>,
    stats: IntervalStats,
}

impl<S, T> IntervalSampler<S, T>
where
    S: Stream<Item = Vector3>,
    T: TimeSource,
{
    /// Deliver from `inner` every `interval_ms` milliseconds by `clock`
    ///
    /// An interval of zero delivers on every poll.
    pub fn new(inner: S, clock: T, interval_ms: u32) -> Self {
        Self {
            inner,
            clock,
            interval_us: interval_ms as u64 * US_PER_MS,
            next_due: None,
            stats: IntervalStats::default(),
        }
    }

    /// Use the sampling interval from an estimator configuration
    pub fn from_config(inner: S, clock: T, config: &EstimatorConfig) -> Self {
        Self::new(inner, clock, config.sample_interval_ms)
    }

    /// Delivery interval in microseconds
    pub fn interval_us(&self) -> u64 {
        self.interval_us
    }

    /// Delivery counters
    pub fn stats(&self) -> IntervalStats {
        self.stats
    }

    /// Give back the wrapped sensor
    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Advance the schedule after a delivery at `now`
    fn schedule_after(&mut self, now: Timestamp) {
        let next = match self.next_due {
            // Keep the cadence anchored to the schedule, not to jittery arrivals
            Some(due) if now < due.saturating_add(self.interval_us) => {
                due.saturating_add(self.interval_us)
            }
            Some(_) if self.interval_us > 0 => {
                self.stats.overruns += 1;
                log_debug!("sampler overrun at {}us, resyncing", now);
                now.saturating_add(self.interval_us)
            }
            _ => now.saturating_add(self.interval_us),
        };
        self.next_due = Some(next);
    }
}

impl<S, T> Stream for IntervalSampler<S, T>
where
    S: Stream<Item = Vector3>,
    T: TimeSource,
{
    type Item = Sample;
    type Error = S::Error;

    fn poll_next(&mut self) -> nb::Result<Self::Item, Self::Error> {
        let now = self.clock.now();

        if let Some(due) = self.next_due {
            if now < due {
                return Err(nb::Error::WouldBlock);
            }
        }

        let acceleration = self.inner.poll_next()?;
        self.schedule_after(now);
        self.stats.delivered += 1;

        Ok(Sample::new(acceleration, now))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
