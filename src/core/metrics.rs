//! Handler metrics for observability
//!
//! The core never logs about itself. Write failures on the hot path are
//! discarded by the logger, so each handler counts them here instead.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters kept by every [`BaseHandler`](crate::handlers::BaseHandler).
///
/// # Example
///
/// ```
/// use loghq::HandlerMetrics;
///
/// let metrics = HandlerMetrics::new();
///
/// metrics.record_written(128);
/// metrics.record_write_error();
///
/// assert_eq!(metrics.records_written(), 1);
/// assert_eq!(metrics.bytes_written(), 128);
/// assert_eq!(metrics.write_errors(), 1);
/// ```
#[derive(Debug)]
pub struct HandlerMetrics {
    /// Records encoded and accepted by the sink
    records_written: AtomicU64,

    /// Records whose sink write failed
    write_errors: AtomicU64,

    /// Bytes accepted by the sink
    bytes_written: AtomicU64,
}

impl HandlerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            records_written: AtomicU64::new(0),
            write_errors: AtomicU64::new(0),
            bytes_written: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn records_written(&self) -> u64 {
        self.records_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_errors(&self) -> u64 {
        self.write_errors.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }

    /// Record a successful write of `bytes` bytes
    #[inline]
    pub fn record_written(&self, bytes: usize) {
        self.records_written.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    /// Record a failed write, returning the previous error count
    #[inline]
    pub fn record_write_error(&self) -> u64 {
        self.write_errors.fetch_add(1, Ordering::Relaxed)
    }

    /// Failed writes as a percentage (0.0 - 100.0) of all attempts.
    ///
    /// Returns 0.0 if nothing has been written.
    pub fn error_rate(&self) -> f64 {
        let errors = self.write_errors() as f64;
        let total = self.records_written() as f64 + errors;
        if total == 0.0 {
            0.0
        } else {
            (errors / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.records_written.store(0, Ordering::Relaxed);
        self.write_errors.store(0, Ordering::Relaxed);
        self.bytes_written.store(0, Ordering::Relaxed);
    }
}

impl Default for HandlerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for HandlerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            records_written: AtomicU64::new(self.records_written()),
            write_errors: AtomicU64::new(self.write_errors()),
            bytes_written: AtomicU64::new(self.bytes_written()),
        }
    }
}
