//! Logging macros for ergonomic log message formatting.
//!
//! Every macro takes a logger first, then either `format!` arguments or a
//! message followed by `; key => value` pairs.
//!
//! # Examples
//!
//! ```
//! use loghq::prelude::*;
//! use loghq::info;
//!
//! let logger = Logger::new();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments, formatted only when INFO is enabled
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // Structured fields
//! info!(logger, "request"; "method" => "GET", "status" => 200);
//! ```

/// Log at an explicit level.
///
/// # Examples
///
/// ```
/// # use loghq::prelude::*;
/// # let logger = Logger::new();
/// use loghq::log;
/// log!(logger, Level::INFO, "Simple message");
/// log!(logger, Level::ERROR, "Error code: {}", 500);
/// log!(logger, Level::WARN, "slow query"; "table" => "users", "ms" => 1200);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $msg:expr; $($key:expr => $value:expr),+ $(,)?) => {
        $logger.log(
            $level,
            $msg,
            &[$($crate::Arg::from($key), $crate::Arg::from($value)),+],
        )
    };
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level = $level;
        if logger.enabled(level) {
            logger.log(level, &::std::format!($($arg)+), &[]);
        }
    }};
}

/// Log a trace-level message.
///
/// # Examples
///
/// ```
/// # use loghq::prelude::*;
/// # let logger = Logger::builder().level(Level::TRACE).build();
/// use loghq::trace;
/// trace!(logger, "Entering function: calculate()");
/// trace!(logger, "Variable value: {}", 42);
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::TRACE, $($arg)+)
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use loghq::prelude::*;
/// # let logger = Logger::new();
/// use loghq::debug;
/// debug!(logger, "Debug information");
/// debug!(logger, "cache"; "hits" => 10, "misses" => 2);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::DEBUG, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use loghq::prelude::*;
/// # let logger = Logger::new();
/// use loghq::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::INFO, $($arg)+)
    };
}

/// Log a success-level message (`OK`).
///
/// # Examples
///
/// ```
/// # use loghq::prelude::*;
/// # let logger = Logger::new();
/// use loghq::success;
/// success!(logger, "Migration complete");
/// success!(logger, "deployed"; "version" => "1.4.2");
/// ```
#[macro_export]
macro_rules! success {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::SUCCESS, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use loghq::prelude::*;
/// # let logger = Logger::new();
/// use loghq::warn;
/// warn!(logger, "Low disk space");
/// warn!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::WARN, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use loghq::prelude::*;
/// # let logger = Logger::new();
/// use loghq::error;
/// error!(logger, "Failed to connect to database");
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::ERROR, $($arg)+)
    };
}

/// Log a fatal-level message, then exit the process with status 1.
///
/// # Examples
///
/// ```no_run
/// # use loghq::prelude::*;
/// # let logger = Logger::new();
/// use loghq::fatal;
/// fatal!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::FATAL, $($arg)+)
    };
}
