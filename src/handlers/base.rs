//! Encoder + sink + level filter

use crate::core::{Buffer, Encoder, Handler, HandlerMetrics, Level, LoggerError, Record, Result, Sink};
use std::fmt;
use std::sync::atomic::{AtomicI8, Ordering};
use std::sync::Arc;

/// Called with every sink error, after it is counted and before it is
/// returned.
pub type ErrorCallback = Arc<dyn Fn(&LoggerError) + Send + Sync>;

/// A handler built from one encoder and one sink.
///
/// `handle` encodes into a pooled [`Buffer`] and hands the bytes to the
/// sink in a single write. Every flavour (JSON, logfmt, console) is this
/// type with a different encoder.
pub struct BaseHandler<E> {
    pub(crate) encoder: E,
    pub(crate) sink: Arc<dyn Sink>,
    level: AtomicI8,
    metrics: HandlerMetrics,
    on_error: Option<ErrorCallback>,
}

impl<E: Encoder> BaseHandler<E> {
    /// Handler at `TRACE`, so the logger's own gate decides what is written.
    pub fn with_encoder(encoder: E, sink: impl Sink + 'static) -> Self {
        Self::with_shared_sink(encoder, Arc::new(sink))
    }

    pub fn with_shared_sink(encoder: E, sink: Arc<dyn Sink>) -> Self {
        Self {
            encoder,
            sink,
            level: AtomicI8::new(Level::TRACE.as_i8()),
            metrics: HandlerMetrics::new(),
            on_error: None,
        }
    }

    #[must_use]
    pub fn with_level(self, level: Level) -> Self {
        self.set_level(level);
        self
    }

    /// Install a callback invoked for each failed write.
    #[must_use]
    pub fn on_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&LoggerError) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(callback));
        self
    }

    /// Change the handler gate at runtime.
    pub fn set_level(&self, level: Level) {
        self.level.store(level.as_i8(), Ordering::Relaxed);
    }

    pub fn level(&self) -> Level {
        Level::from_i8(self.level.load(Ordering::Relaxed))
    }

    pub fn metrics(&self) -> &HandlerMetrics {
        &self.metrics
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    pub fn sink(&self) -> &Arc<dyn Sink> {
        &self.sink
    }
}

impl<E: Encoder> Handler for BaseHandler<E> {
    #[inline]
    fn enabled(&self, level: Level) -> bool {
        level.enabled(self.level())
    }

    fn handle(&self, record: &Record) -> Result<()> {
        let mut buf = Buffer::acquire();
        self.encoder.encode(&mut buf, record);
        let written = self.sink.write(buf.as_bytes());
        let len = buf.len();
        buf.release();

        match written {
            Ok(_) => {
                self.metrics.record_written(len);
                Ok(())
            }
            Err(e) => {
                self.metrics.record_write_error();
                let err = LoggerError::from(e);
                if let Some(callback) = &self.on_error {
                    callback(&err);
                }
                Err(err)
            }
        }
    }

    fn flush(&self) -> Result<()> {
        self.sink.sync().map_err(LoggerError::from)
    }

    fn close(&self) -> Result<()> {
        self.sink.close().map_err(LoggerError::from)
    }
}

impl<E: fmt::Debug> fmt::Debug for BaseHandler<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseHandler")
            .field("encoder", &self.encoder)
            .field("level", &Level::from_i8(self.level.load(Ordering::Relaxed)))
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}
