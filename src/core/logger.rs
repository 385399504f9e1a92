//! Main logger implementation

use super::{
    caller::{Caller, Frames},
    context::LogContext,
    error::Result,
    field::{Arg, Field},
    handler::Handler,
    level::Level,
    record::Record,
};
use crate::handlers::DiscardHandler;
use chrono::Local;
use std::borrow::Cow;
use std::panic::Location;
use std::sync::atomic::{AtomicI8, Ordering};
use std::sync::Arc;

/// Structured logger.
///
/// A logger is cheap to derive: [`with`](Logger::with),
/// [`with_fields`](Logger::with_fields), [`with_context`](Logger::with_context)
/// and `clone` share the handler and copy the bound fields. Each logger owns
/// its level cell, seeded from the parent when derived, so `set_level` on a
/// parent is not seen by children derived earlier.
///
/// # Example
/// ```
/// use loghq::prelude::*;
///
/// let logger = Logger::builder()
///     .level(Level::DEBUG)
///     .handler(JsonHandler::new(LockedWriter::new(Vec::new())))
///     .build();
///
/// logger.info("request", &["method".into(), "GET".into(), "status".into(), 200.into()]);
/// logger.with_fields([("service", "api")]).debug("ready", &[]);
/// ```
pub struct Logger {
    level: AtomicI8,
    handler: Arc<dyn Handler>,
    add_caller: bool,
    stack_level: Level,
    caller_skip: usize,
    fields: Vec<Field>,
    context: Option<LogContext>,
}

impl Logger {
    /// Info level, discard handler, caller capture on, stacks from Error up.
    #[must_use]
    pub fn new() -> Self {
        LoggerBuilder::new().build()
    }

    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    fn derive(&self) -> Logger {
        Logger {
            level: AtomicI8::new(self.level.load(Ordering::Relaxed)),
            handler: Arc::clone(&self.handler),
            add_caller: self.add_caller,
            stack_level: self.stack_level,
            caller_skip: self.caller_skip,
            fields: self.fields.clone(),
            context: self.context.clone(),
        }
    }

    /// Derived logger with `(key, value)` pairs bound to every record.
    #[must_use]
    pub fn with_fields<I, K, V>(&self, fields: I) -> Logger
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Cow<'static, str>>,
        V: Into<Arg>,
    {
        let mut derived = self.derive();
        derived
            .fields
            .extend(fields.into_iter().map(|(k, v)| v.into().into_field(k)));
        derived
    }

    /// Derived logger with typed fields bound to every record.
    #[must_use]
    pub fn with(&self, fields: impl IntoIterator<Item = Field>) -> Logger {
        let mut derived = self.derive();
        derived.fields.extend(fields);
        derived
    }

    /// Derived logger whose records also carry the context's fields, after
    /// the bound fields.
    #[must_use]
    pub fn with_context(&self, context: &LogContext) -> Logger {
        let mut derived = self.derive();
        derived.context = Some(context.clone());
        derived
    }

    pub fn set_level(&self, level: Level) {
        self.level.store(level.as_i8(), Ordering::Relaxed);
    }

    #[must_use]
    pub fn level(&self) -> Level {
        Level::from_i8(self.level.load(Ordering::Relaxed))
    }

    /// True when a call at `level` passes this logger's gate.
    #[inline]
    #[must_use]
    pub fn enabled(&self, level: Level) -> bool {
        level.enabled(self.level())
    }

    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Emit one record. Handler errors are dropped; count them with the
    /// handler's metrics or error callback.
    ///
    /// A `FATAL` record flushes the handler and exits the process with
    /// status 1.
    #[track_caller]
    pub fn log(&self, level: Level, message: &str, kvs: &[Arg]) {
        if !self.enabled(level) {
            return;
        }
        if self.handler.enabled(level) {
            self.emit(level, message, kvs, Location::caller());
        }
        if level == Level::FATAL {
            let _ = self.handler.flush();
            std::process::exit(1);
        }
    }

    fn emit(&self, level: Level, message: &str, kvs: &[Arg], location: &'static Location<'static>) {
        let mut record = Record::acquire();
        record.time = Local::now();
        record.level = level;
        record.message.push_str(message);

        record.add_fields(&self.fields);
        if let Some(context) = &self.context {
            record.add_fields(context.fields());
        }
        record.add_kvs(kvs);

        let wants_stack = level >= self.stack_level;
        let frames = if wants_stack || (self.add_caller && self.caller_skip > 0) {
            Some(Frames::capture())
        } else {
            None
        };

        if self.add_caller {
            let resolved = match (&frames, self.caller_skip) {
                (Some(frames), skip) if skip > 0 => frames.caller(skip),
                _ => None,
            };
            record.caller = Some(resolved.unwrap_or_else(|| Caller::from_location(location)));
        }
        if let (true, Some(frames)) = (wants_stack, &frames) {
            record.stack = frames.format(self.caller_skip);
        }

        let _ = self.handler.handle(&record);
        record.release();
    }

    #[track_caller]
    #[inline]
    pub fn trace(&self, message: &str, kvs: &[Arg]) {
        self.log(Level::TRACE, message, kvs);
    }

    #[track_caller]
    #[inline]
    pub fn debug(&self, message: &str, kvs: &[Arg]) {
        self.log(Level::DEBUG, message, kvs);
    }

    #[track_caller]
    #[inline]
    pub fn info(&self, message: &str, kvs: &[Arg]) {
        self.log(Level::INFO, message, kvs);
    }

    #[track_caller]
    #[inline]
    pub fn success(&self, message: &str, kvs: &[Arg]) {
        self.log(Level::SUCCESS, message, kvs);
    }

    #[track_caller]
    #[inline]
    pub fn warn(&self, message: &str, kvs: &[Arg]) {
        self.log(Level::WARN, message, kvs);
    }

    #[track_caller]
    #[inline]
    pub fn error(&self, message: &str, kvs: &[Arg]) {
        self.log(Level::ERROR, message, kvs);
    }

    /// Log at `FATAL`, then exit the process.
    #[track_caller]
    #[inline]
    pub fn fatal(&self, message: &str, kvs: &[Arg]) {
        self.log(Level::FATAL, message, kvs);
    }

    pub fn flush(&self) -> Result<()> {
        self.handler.flush()
    }

    pub fn close(&self) -> Result<()> {
        self.handler.close()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Logger {
    /// Shares the handler; the level cell is a snapshot.
    fn clone(&self) -> Self {
        self.derive()
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("add_caller", &self.add_caller)
            .field("stack_level", &self.stack_level)
            .field("caller_skip", &self.caller_skip)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use loghq::prelude::*;
///
/// let logger = Logger::builder()
///     .level(Level::DEBUG)
///     .handler(ConsoleHandler::new().no_color())
///     .add_caller(false)
///     .stack_level(Level::FATAL)
///     .build();
/// ```
pub struct LoggerBuilder {
    level: Level,
    handler: Arc<dyn Handler>,
    add_caller: bool,
    stack_level: Level,
    caller_skip: usize,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            level: Level::INFO,
            handler: Arc::new(DiscardHandler),
            add_caller: true,
            stack_level: Level::ERROR,
            caller_skip: 0,
        }
    }

    /// Set minimum log level
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set the handler records are delivered to
    #[must_use = "builder methods return a new value"]
    pub fn handler<H: Handler + 'static>(mut self, handler: H) -> Self {
        self.handler = Arc::new(handler);
        self
    }

    /// Use a handler that is also held elsewhere
    #[must_use = "builder methods return a new value"]
    pub fn shared_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handler = handler;
        self
    }

    /// Enable or disable call-site capture
    #[must_use = "builder methods return a new value"]
    pub fn add_caller(mut self, enabled: bool) -> Self {
        self.add_caller = enabled;
        self
    }

    /// Capture a stack trace for records at or above this level
    #[must_use = "builder methods return a new value"]
    pub fn stack_level(mut self, level: Level) -> Self {
        self.stack_level = level;
        self
    }

    /// Report the caller this many frames above the logging call, for
    /// logging helpers that wrap a `Logger`
    #[must_use = "builder methods return a new value"]
    pub fn caller_skip(mut self, skip: usize) -> Self {
        self.caller_skip = skip;
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        Logger {
            level: AtomicI8::new(self.level.as_i8()),
            handler: self.handler,
            add_caller: self.add_caller,
            stack_level: self.stack_level,
            caller_skip: self.caller_skip,
            fields: Vec::new(),
            context: None,
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
