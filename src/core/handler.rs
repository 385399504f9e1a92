//! Handler trait for record processing

use super::{error::Result, level::Level, record::Record};
use std::sync::Arc;

/// Receives records from a [`Logger`](super::Logger).
///
/// `handle` borrows the record for the duration of the call only; the
/// record goes back to its pool as soon as `handle` returns.
pub trait Handler: Send + Sync {
    fn enabled(&self, level: Level) -> bool;

    fn handle(&self, record: &Record) -> Result<()>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }
}

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn enabled(&self, level: Level) -> bool {
        (**self).enabled(level)
    }

    fn handle(&self, record: &Record) -> Result<()> {
        (**self).handle(record)
    }

    fn flush(&self) -> Result<()> {
        (**self).flush()
    }

    fn close(&self) -> Result<()> {
        (**self).close()
    }
}

impl<H: Handler + ?Sized> Handler for Box<H> {
    fn enabled(&self, level: Level) -> bool {
        (**self).enabled(level)
    }

    fn handle(&self, record: &Record) -> Result<()> {
        (**self).handle(record)
    }

    fn flush(&self) -> Result<()> {
        (**self).flush()
    }

    fn close(&self) -> Result<()> {
        (**self).close()
    }
}
