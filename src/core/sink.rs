//! Sink trait for log output destinations

use std::io;
use std::sync::Arc;

/// Byte destination written to by handlers.
///
/// Methods take `&self`: a sink is shared across threads and does its own
/// locking.
pub trait Sink: Send + Sync {
    fn write(&self, buf: &[u8]) -> io::Result<usize>;

    /// Force buffered bytes to durable storage.
    fn sync(&self) -> io::Result<()>;

    fn close(&self) -> io::Result<()> {
        self.sync()
    }
}

impl<S: Sink + ?Sized> Sink for Arc<S> {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        (**self).write(buf)
    }

    fn sync(&self) -> io::Result<()> {
        (**self).sync()
    }

    fn close(&self) -> io::Result<()> {
        (**self).close()
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        (**self).write(buf)
    }

    fn sync(&self) -> io::Result<()> {
        (**self).sync()
    }

    fn close(&self) -> io::Result<()> {
        (**self).close()
    }
}
