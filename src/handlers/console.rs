//! Console handler

use super::base::BaseHandler;
use crate::core::{Sink, TimestampFormat};
use crate::encoders::ConsoleEncoder;
use crate::sinks::{Stderr, Stdout};
use std::sync::Arc;

/// Colored, icon-prefixed output for terminals. Writes to stderr unless
/// redirected with [`stdout`](BaseHandler::stdout) or
/// [`with_sink`](BaseHandler::with_sink).
///
/// # Example
///
/// ```
/// use loghq::prelude::*;
///
/// let logger = Logger::builder()
///     .handler(ConsoleHandler::new().stdout().no_color())
///     .build();
/// logger.success("deployed", &["version".into(), "1.4.2".into()]);
/// ```
pub type ConsoleHandler = BaseHandler<ConsoleEncoder>;

impl BaseHandler<ConsoleEncoder> {
    pub fn new() -> Self {
        Self::with_encoder(ConsoleEncoder::new(), Stderr)
    }

    #[must_use]
    pub fn stdout(self) -> Self {
        self.with_sink(Stdout)
    }

    #[must_use]
    pub fn with_sink(mut self, sink: impl Sink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    #[must_use]
    pub fn no_color(mut self) -> Self {
        self.encoder = self.encoder.no_color();
        self
    }

    #[must_use]
    pub fn with_time_format(mut self, format: TimestampFormat) -> Self {
        self.encoder = self.encoder.with_time_format(format);
        self
    }
}

impl Default for BaseHandler<ConsoleEncoder> {
    fn default() -> Self {
        Self::new()
    }
}
