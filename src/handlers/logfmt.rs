//! Logfmt handler

use super::base::BaseHandler;
use crate::core::{Sink, TimestampFormat};
use crate::encoders::LogfmtEncoder;

/// Writes `key=value` lines.
pub type LogfmtHandler = BaseHandler<LogfmtEncoder>;

impl BaseHandler<LogfmtEncoder> {
    pub fn new(sink: impl Sink + 'static) -> Self {
        Self::with_encoder(LogfmtEncoder::new(), sink)
    }

    #[must_use]
    pub fn with_time_format(mut self, format: TimestampFormat) -> Self {
        self.encoder = self.encoder.with_time_format(format);
        self
    }
}
