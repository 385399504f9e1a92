//! Pooled log event

use super::caller::Caller;
use super::field::{for_each_kv, Arg, Field};
use super::level::Level;
use super::pool::{Pool, POOL_CAPACITY};
use chrono::{DateTime, Local};
use std::sync::OnceLock;

/// Fields stored inline before spilling to the overflow vector.
pub const INLINE_FIELDS: usize = 16;

/// Message and stack strings that grew beyond this are not kept on reset.
const MAX_RETAINED_TEXT: usize = 16 * 1024;

static RECORD_POOL: OnceLock<Pool<Box<Record>>> = OnceLock::new();

fn pool() -> &'static Pool<Box<Record>> {
    RECORD_POOL.get_or_init(|| Pool::new(POOL_CAPACITY))
}

/// One log event.
///
/// The first sixteen fields live in a fixed inline array; later fields go to
/// an overflow vector that is dropped (not just cleared) on reset. Handlers
/// receive a `&Record` and must not keep it past `handle`.
#[derive(Debug, Clone, Default)]
pub struct Record {
    pub time: DateTime<Local>,
    pub level: Level,
    pub message: String,
    pub caller: Option<Caller>,
    pub stack: String,
    inline: [Field; INLINE_FIELDS],
    inline_len: usize,
    overflow: Vec<Field>,
}

impl Record {
    /// Standalone record stamped with the current time.
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            time: Local::now(),
            level,
            message: message.into(),
            ..Self::default()
        }
    }

    /// Take a record from the shared pool. It is reset before it is returned.
    #[must_use]
    pub fn acquire() -> Box<Record> {
        let mut record = pool().take().unwrap_or_default();
        record.reset();
        record
    }

    /// Return the record to the shared pool.
    pub fn release(self: Box<Self>) {
        pool().give(self);
    }

    /// Clear every field back to its zero state.
    pub fn reset(&mut self) {
        self.time = DateTime::<Local>::default();
        self.level = Level::INFO;
        reset_text(&mut self.message);
        self.caller = None;
        reset_text(&mut self.stack);
        for slot in &mut self.inline[..self.inline_len] {
            *slot = Field::default();
        }
        self.inline_len = 0;
        self.overflow = Vec::new();
    }

    pub fn add_field(&mut self, field: Field) {
        if self.inline_len < INLINE_FIELDS {
            self.inline[self.inline_len] = field;
            self.inline_len += 1;
        } else {
            self.overflow.push(field);
        }
    }

    pub fn add_fields(&mut self, fields: &[Field]) {
        for field in fields {
            self.add_field(field.clone());
        }
    }

    /// Append fields parsed from an alternating key/value list.
    pub fn add_kvs(&mut self, kvs: &[Arg]) {
        for_each_kv(kvs, |field| self.add_field(field));
    }

    #[must_use]
    pub fn num_fields(&self) -> usize {
        self.inline_len + self.overflow.len()
    }

    #[must_use]
    pub fn field_at(&self, index: usize) -> Option<&Field> {
        if index < self.inline_len {
            Some(&self.inline[index])
        } else {
            self.overflow.get(index - self.inline_len)
        }
    }

    /// Fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.inline[..self.inline_len].iter().chain(self.overflow.iter())
    }

    #[must_use]
    pub fn inline_len(&self) -> usize {
        self.inline_len
    }

    #[must_use]
    pub fn overflow_capacity(&self) -> usize {
        self.overflow.capacity()
    }
}

fn reset_text(s: &mut String) {
    if s.capacity() > MAX_RETAINED_TEXT {
        *s = String::new();
    } else {
        s.clear();
    }
}
