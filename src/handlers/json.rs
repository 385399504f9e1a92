//! JSON handler

use super::base::BaseHandler;
use crate::core::{Sink, TimestampFormat};
use crate::encoders::JsonEncoder;
use std::borrow::Cow;

/// Writes one JSON object per record.
///
/// # Example
///
/// ```
/// use loghq::prelude::*;
/// use std::sync::Arc;
///
/// let sink = Arc::new(LockedWriter::new(Vec::new()));
/// let handler = JsonHandler::new(sink.clone())
///     .with_keys("ts", "severity", "message")
///     .with_level(Level::INFO);
///
/// let logger = Logger::builder().handler(handler).add_caller(false).build();
/// logger.info("ready", &["port".into(), 8080.into()]);
///
/// let out = String::from_utf8(sink.lock().clone()).unwrap();
/// assert!(out.contains(r#""severity":"INFO","message":"ready","port":8080"#));
/// ```
pub type JsonHandler = BaseHandler<JsonEncoder>;

impl BaseHandler<JsonEncoder> {
    pub fn new(sink: impl Sink + 'static) -> Self {
        Self::with_encoder(JsonEncoder::new(), sink)
    }

    /// Rename the time, level and message keys; empty names are ignored.
    #[must_use]
    pub fn with_keys(
        mut self,
        time: impl Into<Cow<'static, str>>,
        level: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.encoder = self.encoder.with_keys(time, level, message);
        self
    }

    #[must_use]
    pub fn with_caller_key(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.encoder = self.encoder.with_caller_key(key);
        self
    }

    #[must_use]
    pub fn with_stack_key(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.encoder = self.encoder.with_stack_key(key);
        self
    }

    #[must_use]
    pub fn with_time_format(mut self, format: TimestampFormat) -> Self {
        self.encoder = self.encoder.with_time_format(format);
        self
    }
}
