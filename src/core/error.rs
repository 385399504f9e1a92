//! Error types
//!
//! Setup failures (bad file path, unwritable directory) come back from
//! constructors. Write failures on the logging path are counted by the
//! handler and passed to its error callback, never raised to the caller of
//! `Logger::info` and friends.

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Sink or file IO error, passed through unmodified
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// File writer error with path
    #[error("File writer error for '{path}': {message}")]
    FileWriterError { path: String, message: String },

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a file writer error
    pub fn file_writer(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileWriterError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// The underlying IO error, if this error came from a sink or file operation
    pub fn io_error(&self) -> Option<&std::io::Error> {
        match self {
            LoggerError::IoError(e) => Some(e),
            LoggerError::IoOperation { source, .. } => Some(source),
            _ => None,
        }
    }
}
