//! Core logger types and traits

pub mod buffer;
pub mod caller;
pub mod context;
pub mod encoder;
pub mod error;
pub mod field;
pub mod global;
pub mod handler;
pub mod level;
pub mod logger;
pub mod metrics;
pub(crate) mod pool;
pub mod record;
pub mod sink;
pub mod timestamp;

pub use buffer::{Buffer, MAX_POOLED_CAPACITY};
pub use caller::{shorten_path, Caller};
pub use context::LogContext;
pub use encoder::Encoder;
pub use error::{LoggerError, Result};
pub use field::{fields_from_kvs, AnyValue, Arg, Field, FieldEncoder, FieldValue, MISSING_VALUE};
pub use handler::Handler;
pub use level::Level;
pub use logger::{Logger, LoggerBuilder};
pub use metrics::HandlerMetrics;
pub use record::{Record, INLINE_FIELDS};
pub use sink::Sink;
pub use timestamp::TimestampFormat;
