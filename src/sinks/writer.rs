//! Mutex-wrapped writer sink

use crate::core::sink::Sink;
use parking_lot::{Mutex, MutexGuard};
use std::io::{self, Write};

/// Adapts any [`Write`] into a [`Sink`] by serializing access through a
/// mutex. Each record is written with one `write_all`.
///
/// # Example
///
/// ```
/// use loghq::prelude::*;
/// use std::sync::Arc;
///
/// let sink = Arc::new(LockedWriter::new(Vec::new()));
/// let logger = Logger::builder()
///     .handler(LogfmtHandler::new(sink.clone()))
///     .add_caller(false)
///     .build();
/// logger.info("ready", &[]);
///
/// let out = String::from_utf8(sink.lock().clone()).unwrap();
/// assert!(out.contains("level=info msg=ready"));
/// ```
#[derive(Debug, Default)]
pub struct LockedWriter<W> {
    inner: Mutex<W>,
}

impl<W: Write + Send> LockedWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: Mutex::new(writer),
        }
    }

    /// Direct access to the wrapped writer, for inspection in tests or to
    /// interleave non-log output.
    pub fn lock(&self) -> MutexGuard<'_, W> {
        self.inner.lock()
    }

    pub fn into_inner(self) -> W {
        self.inner.into_inner()
    }
}

impl<W: Write + Send> Sink for LockedWriter<W> {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        self.inner.lock().write_all(buf)?;
        Ok(buf.len())
    }

    fn sync(&self) -> io::Result<()> {
        self.inner.lock().flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_writes_are_not_interleaved() {
        let sink = Arc::new(LockedWriter::new(Vec::new()));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let sink = Arc::clone(&sink);
                thread::spawn(move || {
                    let line = format!("thread-{}-{}\n", i, "x".repeat(64));
                    for _ in 0..100 {
                        sink.write(line.as_bytes()).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let out = String::from_utf8(sink.lock().clone()).unwrap();
        assert_eq!(out.lines().count(), 800);
        assert!(out.lines().all(|l| l.starts_with("thread-") && l.ends_with(&"x".repeat(64))));
    }

    #[test]
    fn test_into_inner() {
        let sink = LockedWriter::new(Vec::new());
        sink.write(b"abc").unwrap();
        sink.sync().unwrap();
        assert_eq!(sink.into_inner(), b"abc");
    }
}
