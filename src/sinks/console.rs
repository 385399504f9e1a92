//! Standard stream sinks

use crate::core::sink::Sink;
use std::io::{self, Write};

/// Process standard output. Each write takes the stdout lock, so records
/// from different threads never interleave.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stdout;

/// Process standard error.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stderr;

impl Sink for Stdout {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().lock().write_all(buf)?;
        Ok(buf.len())
    }

    fn sync(&self) -> io::Result<()> {
        io::stdout().flush()
    }
}

impl Sink for Stderr {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().lock().write_all(buf)?;
        Ok(buf.len())
    }

    fn sync(&self) -> io::Result<()> {
        io::stderr().flush()
    }
}
