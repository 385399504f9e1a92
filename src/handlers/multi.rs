//! Fan-out handler

use crate::core::{Handler, Level, Record, Result};
use std::sync::Arc;

/// Sends each record to every child handler that accepts its level.
///
/// All children are visited even when one fails; the first error is
/// returned.
///
/// # Example
///
/// ```
/// use loghq::prelude::*;
/// use std::sync::Arc;
///
/// let json = Arc::new(LockedWriter::new(Vec::new()));
/// let handler = MultiHandler::new(vec![
///     Arc::new(ConsoleHandler::new().with_level(Level::WARN)) as Arc<dyn Handler>,
///     Arc::new(JsonHandler::new(json.clone())),
/// ]);
///
/// let logger = Logger::builder().handler(handler).build();
/// logger.info("only in json", &[]);
/// assert!(!json.lock().is_empty());
/// ```
#[derive(Clone, Default)]
pub struct MultiHandler {
    handlers: Vec<Arc<dyn Handler>>,
}

impl MultiHandler {
    pub fn new(handlers: Vec<Arc<dyn Handler>>) -> Self {
        Self { handlers }
    }

    #[must_use]
    pub fn push(mut self, handler: impl Handler + 'static) -> Self {
        self.handlers.push(Arc::new(handler));
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    fn visit_all(&self, mut f: impl FnMut(&dyn Handler) -> Option<Result<()>>) -> Result<()> {
        let mut first = Ok(());
        for handler in &self.handlers {
            if let Some(Err(e)) = f(handler.as_ref()) {
                if first.is_ok() {
                    first = Err(e);
                }
            }
        }
        first
    }
}

impl Handler for MultiHandler {
    fn enabled(&self, level: Level) -> bool {
        self.handlers.iter().any(|h| h.enabled(level))
    }

    fn handle(&self, record: &Record) -> Result<()> {
        self.visit_all(|h| h.enabled(record.level).then(|| h.handle(record)))
    }

    fn flush(&self) -> Result<()> {
        self.visit_all(|h| Some(h.flush()))
    }

    fn close(&self) -> Result<()> {
        self.visit_all(|h| Some(h.close()))
    }
}

impl std::fmt::Debug for MultiHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiHandler")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
