//! # loghq
//!
//! Fast structured logging: pooled records and buffers on the hot path,
//! JSON, logfmt and colored console encoders, and a size-rotated log file
//! with gzip compression and age/count retention.
//!
//! ## Features
//!
//! - **Cheap when disabled**: a below-threshold call is one atomic load
//! - **Typed fields**: strings, numbers, durations, timestamps and errors
//!   stored inline, with `Display`/`Debug` fallback for anything else
//! - **Derived loggers**: bound fields and [`LogContext`]s shared across threads
//! - **Rotating files**: [`FileWriter`] rotates, compresses and prunes on a
//!   background thread while writes continue
//!
//! ## Example
//!
//! ```
//! use loghq::prelude::*;
//! use std::sync::Arc;
//!
//! let out = Arc::new(LockedWriter::new(Vec::new()));
//! let logger = Logger::builder()
//!     .level(Level::DEBUG)
//!     .handler(JsonHandler::new(out.clone()))
//!     .build();
//!
//! let api = logger.with_fields([("service", "api")]);
//! api.info("request", &["method".into(), "GET".into(), "status".into(), 200.into()]);
//!
//! let line = String::from_utf8(out.lock().clone()).unwrap();
//! assert!(line.contains(r#""service":"api","method":"GET","status":200"#));
//! ```

pub mod core;
pub mod encoders;
pub mod handlers;
pub mod macros;
pub mod sinks;

#[cfg(test)]
pub(crate) mod test_support;

pub mod prelude {
    pub use crate::core::{
        Arg, Field, FieldValue, Handler, Level, LogContext, Logger, LoggerBuilder, LoggerError,
        Result, Sink, TimestampFormat,
    };
    pub use crate::handlers::{
        ConsoleHandler, DiscardHandler, JsonHandler, LogfmtHandler, MultiHandler,
    };
    pub use crate::sinks::{FileConfig, FileWriter, LockedWriter, Stderr, Stdout};
}

pub use crate::core::global::{
    close, debug, default, error, fatal, flush, info, set_default, success, trace, warn, with,
    with_context, with_fields,
};
pub use crate::core::{
    AnyValue, Arg, Buffer, Caller, Encoder, Field, FieldEncoder, FieldValue, Handler,
    HandlerMetrics, Level, LogContext, Logger, LoggerBuilder, LoggerError, Record, Result, Sink,
    TimestampFormat,
};
pub use encoders::{ConsoleEncoder, JsonEncoder, LogfmtEncoder};
pub use handlers::{
    BaseHandler, ConsoleHandler, DiscardHandler, ErrorCallback, JsonHandler, LogfmtHandler,
    MultiHandler,
};
pub use sinks::{FileConfig, FileWriter, LockedWriter, Stderr, Stdout};
