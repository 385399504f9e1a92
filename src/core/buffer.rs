//! Pooled byte buffer used as the encoder output target.

use super::pool::{Pool, POOL_CAPACITY};
use std::fmt::{self, Write as _};
use std::sync::OnceLock;

const DEFAULT_CAPACITY: usize = 1024;

/// Buffers that grew beyond this are not returned to the pool.
pub const MAX_POOLED_CAPACITY: usize = 16 * 1024;

static BUFFER_POOL: OnceLock<Pool<Buffer>> = OnceLock::new();

fn pool() -> &'static Pool<Buffer> {
    BUFFER_POOL.get_or_init(|| Pool::new(POOL_CAPACITY))
}

/// Growable byte sink with append helpers that do not allocate beyond the
/// buffer's own growth.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buffer {
    bytes: Vec<u8>,
}

impl Buffer {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    /// Take a buffer from the shared pool, emptied before it is handed out.
    #[must_use]
    pub fn acquire() -> Self {
        match pool().take() {
            Some(mut buf) => {
                buf.reset();
                buf
            }
            None => Buffer::new(),
        }
    }

    /// Give the buffer back to the shared pool. Oversized buffers are dropped
    /// so the pool never pins large allocations.
    pub fn release(self) {
        if self.bytes.capacity() > MAX_POOLED_CAPACITY {
            return;
        }
        pool().give(self);
    }

    #[inline]
    pub fn append_byte(&mut self, b: u8) {
        self.bytes.push(b);
    }

    #[inline]
    pub fn append_bytes(&mut self, p: &[u8]) {
        self.bytes.extend_from_slice(p);
    }

    #[inline]
    pub fn append_str(&mut self, s: &str) {
        self.bytes.extend_from_slice(s.as_bytes());
    }

    pub fn append_int(&mut self, i: i64) {
        let _ = write!(self, "{}", i);
    }

    pub fn append_uint(&mut self, u: u64) {
        let _ = write!(self, "{}", u);
    }

    /// Shortest representation that round-trips, never in exponent form.
    pub fn append_float(&mut self, f: f64) {
        let _ = write!(self, "{}", f);
    }

    pub fn append_bool(&mut self, v: bool) {
        self.append_str(if v { "true" } else { "false" });
    }

    pub fn append_display(&mut self, value: &dyn fmt::Display) {
        let _ = write!(self, "{}", value);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn reset(&mut self) {
        self.bytes.clear();
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.bytes.truncate(len);
    }
}

impl fmt::Write for Buffer {
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append_str(s);
        Ok(())
    }
}

impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
