//! Stream Traits
//!
//! Samples are pulled, not pushed. The `nb` crate's two-level result lets a
//! sensor say "nothing yet" without an async runtime, which keeps the same
//! trait usable from a bare-metal main loop and from a host replay tool.
//!
//! ```rust
//! use speedcheck_core::traits::Stream;
//!
//! fn drain<S: Stream>(stream: &mut S) -> Result<usize, S::Error> {
//!     let mut count = 0;
//!     loop {
//!         match stream.poll_next() {
//!             Ok(_item) => count += 1,
//!             // Nothing buffered, come back on the next tick
//!             Err(nb::Error::WouldBlock) => return Ok(count),
//!             Err(nb::Error::Other(e)) => return Err(e),
//!         }
//!     }
//! }
//! ```

/// Pull-based source of items
///
/// ## Contract
///
/// - `poll_next` must not block indefinitely
/// - `WouldBlock` means "try again later" and is expected
/// - items come out in arrival order; consumers rely on it
/// - end-of-stream errors are sticky
pub trait Stream {
    /// Type of items produced by the stream
    type Item;

    /// Type of errors that can occur
    type Error;

    /// Attempt to pull the next item
    ///
    /// Returns:
    /// - `Ok(item)` - next item available
    /// - `Err(nb::Error::WouldBlock)` - no data available yet
    /// - `Err(nb::Error::Other(e))` - stream error or end of stream
    fn poll_next(&mut self) -> nb::Result<Self::Item, Self::Error>;

    /// Bounds on remaining items, as `Iterator::size_hint`
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, None)
    }
}
