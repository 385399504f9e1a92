//! Handlers and sinks that capture output for unit tests.

use crate::core::{Caller, Field, Handler, Level, LoggerError, Record, Result, Sink};
use parking_lot::Mutex;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Owned copy of a record, taken inside `handle`.
#[derive(Debug, Clone)]
pub struct Captured {
    pub level: Level,
    pub message: String,
    pub fields: Vec<Field>,
    pub caller: Option<Caller>,
    pub stack: String,
}

impl Captured {
    pub fn rendered_fields(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|f| format!("{}={}", f.key, f.value))
            .collect()
    }
}

#[derive(Debug)]
pub struct RecordingHandler {
    level: Level,
    failure: Option<String>,
    records: Mutex<Vec<Captured>>,
    flushes: AtomicUsize,
    closes: AtomicUsize,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::with_level(Level::TRACE)
    }

    pub fn with_level(level: Level) -> Self {
        Self {
            level,
            failure: None,
            records: Mutex::new(Vec::new()),
            flushes: AtomicUsize::new(0),
            closes: AtomicUsize::new(0),
        }
    }

    /// Records everything, then reports a write failure.
    pub fn failing() -> Self {
        Self::failing_with("recording handler failure")
    }

    pub fn failing_with(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::new()
        }
    }

    pub fn records(&self) -> Vec<Captured> {
        self.records.lock().clone()
    }

    pub fn flushes(&self) -> usize {
        self.flushes.load(Ordering::Relaxed)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::Relaxed)
    }
}

impl Handler for RecordingHandler {
    fn enabled(&self, level: Level) -> bool {
        level.enabled(self.level)
    }

    fn handle(&self, record: &Record) -> Result<()> {
        self.records.lock().push(Captured {
            level: record.level,
            message: record.message.clone(),
            fields: record.fields().cloned().collect(),
            caller: record.caller.clone(),
            stack: record.stack.clone(),
        });
        match &self.failure {
            Some(message) => Err(LoggerError::writer(message.clone())),
            None => Ok(()),
        }
    }

    fn flush(&self) -> Result<()> {
        self.flushes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn close(&self) -> Result<()> {
        self.closes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// In-memory sink that counts calls.
#[derive(Debug, Default)]
pub struct MemorySink {
    bytes: Mutex<Vec<u8>>,
    writes: AtomicUsize,
    syncs: AtomicUsize,
    closed: AtomicBool,
    fail: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every write fails with `BrokenPipe`.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    pub fn syncs(&self) -> usize {
        self.syncs.load(Ordering::Relaxed)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Relaxed)
    }
}

impl Sink for MemorySink {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        if self.fail {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"));
        }
        self.writes.fetch_add(1, Ordering::Relaxed);
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn sync(&self) -> io::Result<()> {
        self.syncs.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn close(&self) -> io::Result<()> {
        self.closed.store(true, Ordering::Relaxed);
        Ok(())
    }
}
