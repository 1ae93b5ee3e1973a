//! Stream-to-estimator driver
//!
//! Connects any sample stream to a [`VelocityEstimator`], one sample per
//! call, in arrival order. This is the single serialization point the
//! estimator needs: whoever owns the processor owns the estimator.

use crate::{
    estimator::{Reading, VelocityEstimator},
    sample::Sample,
    stream::{Stream, StreamError},
    velocity::MotionBranch,
};

/// Counters for a processing session
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStats {
    /// Samples pulled from the stream and fed to the estimator
    pub samples_processed: usize,
    /// Samples that took the rest branch
    pub rest_samples: usize,
    /// Samples that integrated motion
    pub moving_samples: usize,
    /// Motion samples that only primed the clock
    pub priming_samples: usize,
    /// Samples refused by input validation
    pub rejected_samples: usize,
    /// Malformed records skipped
    pub skipped_records: usize,
    /// Stream errors returned from batch or drain calls
    pub stream_errors: usize,
}

/// Outcome of draining whatever a stream has ready
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drain {
    /// Samples processed during this call
    pub processed: usize,
    /// True if the stream reported end-of-stream
    pub finished: bool,
}

/// Feeds a stream of samples through an estimator
///
/// ## Usage
///
/// ```rust
/// use speedcheck_core::stream::{MemoryStream, SampleProcessor};
/// use speedcheck_core::{Sample, Vector3, VelocityEstimator};
///
/// let samples = [
///     Sample::new(Vector3::new(0.0, 0.0, 9.8), 0),
///     Sample::new(Vector3::new(0.0, 0.0, 9.8), 50_000),
/// ];
///
/// let mut processor = SampleProcessor::new(MemoryStream::new(&samples), VelocityEstimator::new());
/// let drain = processor.process_available(|reading| {
///     println!("{:.2} m/s", reading.speed);
/// }).unwrap();
///
/// assert!(drain.finished);
/// assert_eq!(drain.processed, 2);
/// ```
pub struct SampleProcessor<S> {
    stream: S,
    estimator: VelocityEstimator,
    stats: ProcessingStats,
}

impl<S: Stream<Item = Sample>> SampleProcessor<S> {
    /// Create a processor
    pub fn new(stream: S, estimator: VelocityEstimator) -> Self {
        Self {
            stream,
            estimator,
            stats: ProcessingStats::default(),
        }
    }

    /// Pull one sample and feed it
    ///
    /// Returns `Ok(None)` when the sample was refused by the estimator's
    /// input validation.
    pub fn process_next(&mut self) -> nb::Result<Option<Reading>, S::Error> {
        let sample = self.stream.poll_next()?;

        match self.estimator.try_process_sample(sample.acceleration, sample.timestamp) {
            Ok(reading) => {
                self.record(reading.branch);
                Ok(Some(reading))
            }
            Err(_) => {
                self.stats.rejected_samples += 1;
                Ok(None)
            }
        }
    }

    /// Pull up to `max_samples`, stopping early when the stream would block
    ///
    /// Returns how many samples reached the estimator; refused samples are
    /// pulled but not counted.
    pub fn process_batch(&mut self, max_samples: usize) -> Result<usize, S::Error> {
        let mut processed = 0;

        for _ in 0..max_samples {
            match self.process_next() {
                Ok(Some(_)) => processed += 1,
                Ok(None) => {}
                Err(nb::Error::WouldBlock) => break,
                Err(nb::Error::Other(e)) => {
                    self.stats.stream_errors += 1;
                    return Err(e);
                }
            }
        }

        Ok(processed)
    }

    fn record(&mut self, branch: MotionBranch) {
        self.stats.samples_processed += 1;
        match branch {
            MotionBranch::Rest => self.stats.rest_samples += 1,
            MotionBranch::Moving => self.stats.moving_samples += 1,
            MotionBranch::Priming => self.stats.priming_samples += 1,
        }
    }

    /// Processing counters
    pub fn stats(&self) -> &ProcessingStats {
        &self.stats
    }

    /// Reset counters; estimator state is untouched
    pub fn reset_stats(&mut self) {
        self.stats = ProcessingStats::default();
    }

    /// The estimator being driven
    pub fn estimator(&self) -> &VelocityEstimator {
        &self.estimator
    }

    /// The underlying stream
    pub fn stream(&self) -> &S {
        &self.stream
    }

    /// Take the estimator back, dropping the stream
    pub fn into_estimator(self) -> VelocityEstimator {
        self.estimator
    }
}

impl<S, E> SampleProcessor<S>
where
    S: Stream<Item = Sample, Error = StreamError<E>>,
{
    /// Process everything ready, calling `on_reading` after each sample
    ///
    /// Malformed records and oversize lines are counted and skipped.
    /// Returns when the stream would block or ends; transport errors are
    /// returned.
    pub fn process_available<F>(&mut self, mut on_reading: F) -> Result<Drain, StreamError<E>>
    where
        F: FnMut(&Reading),
    {
        let mut processed = 0;

        loop {
            match self.process_next() {
                Ok(Some(reading)) => {
                    processed += 1;
                    on_reading(&reading);
                }
                Ok(None) => {}
                Err(nb::Error::WouldBlock) => {
                    return Ok(Drain { processed, finished: false });
                }
                Err(nb::Error::Other(StreamError::EndOfStream)) => {
                    return Ok(Drain { processed, finished: true });
                }
                Err(nb::Error::Other(StreamError::Format(reason))) => {
                    self.stats.skipped_records += 1;
                    log_warn!("skipping malformed record: {}", reason);
                }
                Err(nb::Error::Other(StreamError::Overflow)) => {
                    self.stats.skipped_records += 1;
                    log_warn!("skipping oversize record");
                }
                Err(nb::Error::Other(e)) => {
                    self.stats.stream_errors += 1;
                    return Err(e);
                }
            }
        }
    }
}
