//! MotionSink trait - Exporter output interface
//!
//! Defines the abstract interface for sinks.

use crate::{MotionError, MotionSample};

/// Motion output trait
///
/// All sink implementations must implement this trait.
pub trait MotionSink: Send {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Write one complete sample sequence
    ///
    /// # Errors
    /// Returns write error (should include context)
    fn write(&mut self, samples: &[MotionSample]) -> Result<(), MotionError>;

    /// Flush buffer (if any)
    fn flush(&mut self) -> Result<(), MotionError>;

    /// Close sink
    fn close(&mut self) -> Result<(), MotionError>;
}
