//! Memory-based sample streams
//!
//! Replays a slice of items in order. Useful for:
//! - unit and integration tests with known sequences
//! - re-running a recorded session through different tuning

use super::{Stream, StreamError};

/// Stream over a borrowed slice
///
/// ## Example
///
/// ```rust
/// use speedcheck_core::stream::{MemoryStream, Stream};
/// use speedcheck_core::{Sample, Vector3};
///
/// let samples = [
///     Sample::new(Vector3::new(0.0, 0.0, 9.8), 0),
///     Sample::new(Vector3::new(0.2, 0.0, 9.8), 50_000),
/// ];
///
/// let mut stream = MemoryStream::new(&samples);
/// while let Ok(sample) = stream.poll_next() {
///     // feed the estimator
/// #   let _ = sample;
/// }
/// ```
pub struct MemoryStream<'a, T> {
    /// Items to replay
    items: &'a [T],
    /// Current position
    position: usize,
}

impl<'a, T> MemoryStream<'a, T> {
    /// Create a stream over `items`
    pub fn new(items: &'a [T]) -> Self {
        Self { items, position: 0 }
    }

    /// Rewind to the beginning
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Items delivered so far
    pub fn position(&self) -> usize {
        self.position
    }

    /// True once every item has been delivered
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.items.len()
    }
}

impl<'a, T: Clone> Stream for MemoryStream<'a, T> {
    type Item = T;
    type Error = StreamError<()>;

    fn poll_next(&mut self) -> nb::Result<Self::Item, Self::Error> {
        let item = self
            .items
            .get(self.position)
            .cloned()
            .ok_or(nb::Error::Other(StreamError::EndOfStream))?;
        self.position += 1;
        Ok(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.items.len().saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}
