//! Structured logging context
//!
//! A `LogContext` is an immutable, cheaply clonable set of fields. Extending
//! a context returns a new one; the original is never modified, so a context
//! can be handed across threads and attached to any number of loggers.

use super::field::{fields_from_kvs, Arg, Field};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct LogContext {
    fields: Arc<[Field]>,
}

impl LogContext {
    /// Create a new empty log context
    pub fn new() -> Self {
        Self {
            fields: Arc::from(Vec::new()),
        }
    }

    pub fn from_fields(fields: impl IntoIterator<Item = Field>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
        }
    }

    /// Copy of this context with `fields` appended.
    ///
    /// ```
    /// use loghq::{Field, LogContext};
    ///
    /// let base = LogContext::new().with_fields([Field::string("request_id", "r-1")]);
    /// let child = base.with_fields([Field::int("attempt", 2)]);
    ///
    /// assert_eq!(base.len(), 1);
    /// assert_eq!(child.len(), 2);
    /// ```
    #[must_use]
    pub fn with_fields(&self, fields: impl IntoIterator<Item = Field>) -> Self {
        Self {
            fields: self.fields.iter().cloned().chain(fields).collect(),
        }
    }

    /// Copy of this context with one more field.
    #[must_use]
    pub fn with_field(&self, key: impl Into<Cow<'static, str>>, value: impl Into<Arg>) -> Self {
        self.with_fields([value.into().into_field(key)])
    }

    /// Copy of this context with fields parsed from an alternating key/value
    /// list.
    #[must_use]
    pub fn with_kvs(&self, kvs: &[Arg]) -> Self {
        self.with_fields(fields_from_kvs(kvs))
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Default for LogContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}={}", field.key, field.value)?;
        }
        Ok(())
    }
}
