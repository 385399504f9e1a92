//! Process-wide default logger
//!
//! The default starts as a [`ConsoleHandler`] logger on stderr at `INFO`.
//! [`set_default`] swaps it atomically; callers holding the previous
//! `Arc<Logger>` keep using it until they drop it.

use super::{
    context::LogContext,
    error::Result,
    field::{Arg, Field},
    level::Level,
    logger::Logger,
};
use crate::handlers::ConsoleHandler;
use arc_swap::ArcSwap;
use std::borrow::Cow;
use std::sync::{Arc, OnceLock};

static DEFAULT_LOGGER: OnceLock<ArcSwap<Logger>> = OnceLock::new();

fn slot() -> &'static ArcSwap<Logger> {
    DEFAULT_LOGGER.get_or_init(|| {
        ArcSwap::from_pointee(Logger::builder().handler(ConsoleHandler::new()).build())
    })
}

/// The current default logger.
pub fn default() -> Arc<Logger> {
    slot().load_full()
}

/// Replace the default logger for every later call.
///
/// ```
/// use loghq::prelude::*;
///
/// loghq::set_default(Logger::builder().level(Level::WARN).build());
/// assert_eq!(loghq::default().level(), Level::WARN);
/// ```
pub fn set_default(logger: Logger) {
    slot().store(Arc::new(logger));
}

#[track_caller]
pub fn trace(message: &str, kvs: &[Arg]) {
    slot().load().log(Level::TRACE, message, kvs);
}

#[track_caller]
pub fn debug(message: &str, kvs: &[Arg]) {
    slot().load().log(Level::DEBUG, message, kvs);
}

#[track_caller]
pub fn info(message: &str, kvs: &[Arg]) {
    slot().load().log(Level::INFO, message, kvs);
}

#[track_caller]
pub fn success(message: &str, kvs: &[Arg]) {
    slot().load().log(Level::SUCCESS, message, kvs);
}

#[track_caller]
pub fn warn(message: &str, kvs: &[Arg]) {
    slot().load().log(Level::WARN, message, kvs);
}

#[track_caller]
pub fn error(message: &str, kvs: &[Arg]) {
    slot().load().log(Level::ERROR, message, kvs);
}

/// Log at `FATAL` through the default logger, then exit the process.
#[track_caller]
pub fn fatal(message: &str, kvs: &[Arg]) {
    slot().load().log(Level::FATAL, message, kvs);
}

pub fn with(fields: impl IntoIterator<Item = Field>) -> Logger {
    slot().load().with(fields)
}

pub fn with_fields<I, K, V>(fields: I) -> Logger
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<Cow<'static, str>>,
    V: Into<Arg>,
{
    slot().load().with_fields(fields)
}

pub fn with_context(context: &LogContext) -> Logger {
    slot().load().with_context(context)
}

pub fn flush() -> Result<()> {
    slot().load().flush()
}

pub fn close() -> Result<()> {
    slot().load().close()
}
