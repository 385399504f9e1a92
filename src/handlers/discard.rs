//! No-op handler

use crate::core::{Handler, Level, Record, Result};

/// Accepts every level and drops every record, leaving the logger's own
/// level as the only gate. Default handler of a new [`Logger`](crate::Logger).
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardHandler;

impl Handler for DiscardHandler {
    #[inline]
    fn enabled(&self, _level: Level) -> bool {
        true
    }

    #[inline]
    fn handle(&self, _record: &Record) -> Result<()> {
        Ok(())
    }
}
