//! Handler implementations

pub mod base;
pub mod console;
pub mod discard;
pub mod json;
pub mod logfmt;
pub mod multi;

pub use base::{BaseHandler, ErrorCallback};
pub use console::ConsoleHandler;
pub use discard::DiscardHandler;
pub use json::JsonHandler;
pub use logfmt::LogfmtHandler;
pub use multi::MultiHandler;
