//! Size-rotated log file with age/count retention
//!
//! The active file is renamed to `<stem>-<YYYY-MM-DDTHH-MM-SS><ext>` when the
//! next write would push it over `max_size`, and a fresh file is opened at
//! the original path. Compression and retention run on one maintenance
//! thread per writer, so they never hold the write lock and never overlap
//! each other on the same backup set.

use crate::core::error::{LoggerError, Result};
use crate::core::sink::Sink;
use chrono::{Local, NaiveDateTime};
use crossbeam_channel::{unbounded, Sender};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime};

/// Default rotation threshold (100 MiB).
pub const DEFAULT_MAX_SIZE: u64 = 100 * 1024 * 1024;

/// Default age retention (7 days).
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Default count retention.
pub const DEFAULT_MAX_BACKUPS: usize = 5;

const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";
const BACKUP_TIME_LEN: usize = "2006-01-02T15-04-05".len();
const COMPRESSED_SUFFIX: &str = ".gz";
const COMPRESS_CHUNK: usize = 64 * 1024;

/// Configuration for [`FileWriter`]
///
/// # Examples
///
/// ```
/// use loghq::FileConfig;
/// use std::time::Duration;
///
/// let config = FileConfig::new("/var/log/app.log")
///     .with_max_size(50 * 1024 * 1024)
///     .with_max_age(Duration::from_secs(24 * 3600))
///     .with_max_backups(10)
///     .with_compression(true);
/// assert_eq!(config.max_backups, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Active log file path
    pub path: PathBuf,
    /// Rotation threshold in bytes; 0 selects [`DEFAULT_MAX_SIZE`]
    pub max_size: u64,
    /// Backups older than this are removed; zero keeps them regardless of age
    pub max_age: Duration,
    /// Backups kept after age pruning; 0 keeps any number
    pub max_backups: usize,
    /// Gzip rotated files
    pub compress: bool,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            max_size: DEFAULT_MAX_SIZE,
            max_age: DEFAULT_MAX_AGE,
            max_backups: DEFAULT_MAX_BACKUPS,
            compress: false,
        }
    }
}

impl FileConfig {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size(mut self, bytes: u64) -> Self {
        self.max_size = bytes;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age(mut self, age: Duration) -> Self {
        self.max_age = age;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    /// Rotation threshold with the zero default applied.
    #[must_use]
    pub fn effective_max_size(&self) -> u64 {
        if self.max_size == 0 {
            DEFAULT_MAX_SIZE
        } else {
            self.max_size
        }
    }

    /// Stem and extension (with its dot) of the active file name.
    fn name_parts(&self) -> (String, String) {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = self
            .path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        (stem, ext)
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

#[derive(Debug)]
struct FileState {
    file: Option<File>,
    size: u64,
}

#[derive(Debug)]
enum Job {
    Compress(PathBuf),
    Cleanup(Option<Sender<usize>>),
    Barrier(Sender<()>),
}

#[derive(Debug)]
struct Maintenance {
    jobs: Sender<Job>,
    worker: JoinHandle<()>,
}

/// Rotating file sink
///
/// `write`, `sync` and `close` serialize on one mutex. A write that would
/// push the file strictly over `max_size` first rotates it (an empty file is
/// never rotated), so a single write is never split across files.
///
/// # Examples
///
/// ```no_run
/// use loghq::prelude::*;
///
/// let writer = FileWriter::new(FileConfig::new("/var/log/app.log").with_compression(true))?;
/// let logger = Logger::builder().handler(JsonHandler::new(writer)).build();
/// logger.info("started", &[]);
/// # Ok::<(), loghq::LoggerError>(())
/// ```
#[derive(Debug)]
pub struct FileWriter {
    config: FileConfig,
    state: Mutex<FileState>,
    maintenance: Mutex<Option<Maintenance>>,
    closed: AtomicBool,
    rotations: AtomicU64,
    rotation_failures: AtomicU64,
}

impl FileWriter {
    /// Open (or create) the active file, creating its directory if needed.
    ///
    /// # Errors
    ///
    /// Returns error if the path is empty, the directory cannot be created
    /// or the file cannot be opened
    pub fn new(config: FileConfig) -> Result<Self> {
        if config.path.as_os_str().is_empty() {
            return Err(LoggerError::config("FileWriter", "file path is required"));
        }

        if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
        }

        let (file, size) = open_append(&config.path).map_err(|e| {
            LoggerError::file_writer(
                config.path.display().to_string(),
                format!("Failed to open: {}", e),
            )
        })?;

        Ok(Self {
            config,
            state: Mutex::new(FileState {
                file: Some(file),
                size,
            }),
            maintenance: Mutex::new(None),
            closed: AtomicBool::new(false),
            rotations: AtomicU64::new(0),
            rotation_failures: AtomicU64::new(0),
        })
    }

    pub fn write(&self, buf: &[u8]) -> io::Result<usize> {
        if self.closed.load(Ordering::Acquire) {
            return Err(closed_error());
        }
        let mut state = self.state.lock();

        let len = buf.len() as u64;
        if state.size > 0 && state.size + len > self.config.effective_max_size() {
            self.rotate_locked(&mut state);
        }

        if state.file.is_none() {
            let (file, size) = open_append(&self.config.path)?;
            state.file = Some(file);
            state.size = size;
        }

        match state.file.as_mut() {
            Some(file) => {
                file.write_all(buf)?;
                state.size += len;
                Ok(buf.len())
            }
            None => Err(closed_error()),
        }
    }

    pub fn sync(&self) -> io::Result<()> {
        let state = self.state.lock();
        match &state.file {
            Some(file) => file.sync_all(),
            None => Ok(()),
        }
    }

    /// Close the active file and stop the maintenance thread once its queued
    /// jobs are done. Later writes fail.
    pub fn close(&self) -> io::Result<()> {
        let result = {
            let mut state = self.state.lock();
            self.closed.store(true, Ordering::Release);
            match state.file.take() {
                Some(file) => file.sync_all(),
                None => Ok(()),
            }
        };

        if let Some(maintenance) = self.maintenance.lock().take() {
            drop(maintenance.jobs);
            let _ = maintenance.worker.join();
        }
        result
    }

    /// Rotate now regardless of size.
    pub fn rotate(&self) -> io::Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(closed_error());
        }
        let mut state = self.state.lock();
        self.rotate_locked(&mut state);
        if state.file.is_none() {
            let (file, size) = open_append(&self.config.path)?;
            state.file = Some(file);
            state.size = size;
        }
        Ok(())
    }

    /// Run a retention pass on the maintenance thread and wait for it.
    /// Returns the number of backups removed.
    pub fn cleanup(&self) -> usize {
        let (tx, rx) = crossbeam_channel::bounded(1);
        match self.dispatch(Job::Cleanup(Some(tx))) {
            Ok(()) => rx.recv().unwrap_or(0),
            Err(_) => prune_backups(&self.config),
        }
    }

    /// Block until every compression and cleanup queued so far has finished.
    pub fn wait_for_maintenance(&self) {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let sent = match self.maintenance.lock().as_ref() {
            Some(maintenance) => maintenance.jobs.send(Job::Barrier(tx)).is_ok(),
            None => false,
        };
        if sent {
            let _ = rx.recv();
        }
    }

    #[must_use]
    pub fn config(&self) -> &FileConfig {
        &self.config
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Bytes in the active file, as tracked by the writer.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.state.lock().size
    }

    #[must_use]
    pub fn rotation_count(&self) -> u64 {
        self.rotations.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn rotation_failures(&self) -> u64 {
        self.rotation_failures.load(Ordering::Relaxed)
    }

    /// Rename the active file away and open a fresh one. A failed rename
    /// re-opens the original so the pending write still lands; the next
    /// oversized write retries.
    fn rotate_locked(&self, state: &mut FileState) {
        state.file = None;

        let backup = next_backup_path(&self.config);
        match fs::rename(&self.config.path, &backup) {
            Ok(()) => {
                self.rotations.fetch_add(1, Ordering::Relaxed);
                if self.config.compress {
                    let _ = self.dispatch(Job::Compress(backup));
                }
                let _ = self.dispatch(Job::Cleanup(None));
            }
            Err(_) => {
                self.rotation_failures.fetch_add(1, Ordering::Relaxed);
            }
        }

        match open_append(&self.config.path) {
            Ok((file, size)) => {
                state.file = Some(file);
                state.size = size;
            }
            Err(_) => state.size = 0,
        }
    }

    /// Queue a job on the maintenance thread, starting it on first use.
    /// Hands the job back when the writer is closed or no thread could be
    /// started.
    fn dispatch(&self, job: Job) -> std::result::Result<(), Job> {
        if self.closed.load(Ordering::Acquire) {
            return Err(job);
        }
        let mut maintenance = self.maintenance.lock();
        if maintenance.is_none() {
            match spawn_maintenance(self.config.clone()) {
                Ok(started) => *maintenance = Some(started),
                Err(_) => return Err(job),
            }
        }
        match maintenance.as_ref() {
            Some(m) => m.jobs.send(job).map_err(|e| e.into_inner()),
            None => Err(job),
        }
    }
}

impl Sink for FileWriter {
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        FileWriter::write(self, buf)
    }

    fn sync(&self) -> io::Result<()> {
        FileWriter::sync(self)
    }

    fn close(&self) -> io::Result<()> {
        FileWriter::close(self)
    }
}

impl Drop for FileWriter {
    fn drop(&mut self) {
        // Best effort: flush the file and let queued jobs finish.
        let _ = self.close();
    }
}

fn closed_error() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "file writer is closed")
}

fn open_append(path: &Path) -> io::Result<(File, u64)> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let size = file.metadata()?.len();
    Ok((file, size))
}

fn spawn_maintenance(config: FileConfig) -> io::Result<Maintenance> {
    let (jobs, queue) = unbounded::<Job>();
    let worker = thread::Builder::new()
        .name("loghq-file-maintenance".to_string())
        .spawn(move || {
            for job in queue {
                match job {
                    Job::Compress(path) => {
                        let _ = compress_file(&path);
                    }
                    Job::Cleanup(reply) => {
                        let removed = prune_backups(&config);
                        if let Some(reply) = reply {
                            let _ = reply.send(removed);
                        }
                    }
                    Job::Barrier(done) => {
                        let _ = done.send(());
                    }
                }
            }
        })?;
    Ok(Maintenance { jobs, worker })
}

/// First free backup name for the current second, `_N`-suffixed when an
/// earlier rotation in the same second already took it.
fn next_backup_path(config: &FileConfig) -> PathBuf {
    let (stem, ext) = config.name_parts();
    let stamp = Local::now().format(BACKUP_TIME_FORMAT).to_string();
    let dir = config.dir();

    let taken = |name: &str| {
        dir.join(name).exists() || dir.join(format!("{}{}", name, COMPRESSED_SUFFIX)).exists()
    };

    let mut name = format!("{}-{}{}", stem, stamp, ext);
    let mut n = 1;
    while taken(&name) {
        name = format!("{}-{}_{}{}", stem, stamp, n, ext);
        n += 1;
    }
    dir.join(name)
}

/// Sort key of `<stem>-<timestamp>[_N]<ext>[.gz]`: the timestamp and the
/// same-second counter (0 when absent). `None` for anything else.
fn backup_order<'a>(name: &'a str, stem: &str, ext: &str) -> Option<(&'a str, u64)> {
    let rest = name.strip_prefix(stem)?.strip_prefix('-')?;
    let rest = rest.strip_suffix(COMPRESSED_SUFFIX).unwrap_or(rest);
    let middle = rest.strip_suffix(ext)?;
    let stamp = middle.get(..BACKUP_TIME_LEN)?;
    let counter = middle.get(BACKUP_TIME_LEN..)?;
    NaiveDateTime::parse_from_str(stamp, BACKUP_TIME_FORMAT).ok()?;
    match counter.strip_prefix('_') {
        None if counter.is_empty() => Some((stamp, 0)),
        None => None,
        Some(digits) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
            Some((stamp, digits.parse().ok()?))
        }
        Some(_) => None,
    }
}

fn is_backup_name(name: &str, stem: &str, ext: &str) -> bool {
    backup_order(name, stem, ext).is_some()
}

/// Backups of `config.path` currently on disk, in directory order.
pub fn list_backups(config: &FileConfig) -> Vec<PathBuf> {
    let (stem, ext) = config.name_parts();
    let prefix = config.dir().join(format!("{}-", stem));
    // The extension is checked by name below; a trailing `*{ext}*` would
    // turn into an invalid `**` for extension-less paths.
    let pattern = format!("{}*", glob::Pattern::escape(&prefix.to_string_lossy()));

    let Ok(paths) = glob::glob(&pattern) else {
        return Vec::new();
    };
    paths
        .filter_map(|entry| entry.ok())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| is_backup_name(name, &stem, &ext))
        })
        .collect()
}

/// Apply age then count retention to the backups of `config.path`.
/// Files that vanish mid-scan are skipped. Returns the number removed.
pub fn prune_backups(config: &FileConfig) -> usize {
    let mut removed = 0;

    if !config.max_age.is_zero() {
        let now = SystemTime::now();
        for path in list_backups(config) {
            let Ok(modified) = fs::metadata(&path).and_then(|m| m.modified()) else {
                continue;
            };
            let expired = now
                .duration_since(modified)
                .is_ok_and(|age| age > config.max_age);
            if expired && fs::remove_file(&path).is_ok() {
                removed += 1;
            }
        }
    }

    if config.max_backups > 0 {
        let mut backups = list_backups(config);
        if backups.len() > config.max_backups {
            let (stem, ext) = config.name_parts();
            backups.sort_by_cached_key(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .and_then(|name| backup_order(name, &stem, &ext))
                    .map(|(stamp, counter)| (stamp.to_owned(), counter))
            });
            let excess = backups.len() - config.max_backups;
            for path in &backups[..excess] {
                if fs::remove_file(path).is_ok() {
                    removed += 1;
                }
            }
        }
    }

    removed
}

/// Gzip `path` to `path.gz` with transactional safety using streaming I/O.
///
/// Output goes to `path.gz.tmp` first and is renamed into place; the
/// original is removed only after that succeeds. On failure the temp file
/// is removed and the original is left untouched.
pub fn compress_file(path: &Path) -> Result<PathBuf> {
    let gz_path = with_suffix(path, COMPRESSED_SUFFIX);
    let temp_gz_path = with_suffix(path, ".gz.tmp");

    let input = File::open(path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to open file for compression: {}", path.display()),
            e,
        )
    })?;
    let mut reader = BufReader::with_capacity(COMPRESS_CHUNK, input);

    let output = File::create(&temp_gz_path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!(
                "Failed to create temporary compressed file: {}",
                temp_gz_path.display()
            ),
            e,
        )
    })?;
    let mut encoder = flate2::write::GzEncoder::new(
        BufWriter::with_capacity(COMPRESS_CHUNK, output),
        flate2::Compression::default(),
    );

    let streamed = (|| -> io::Result<()> {
        let mut chunk = vec![0u8; COMPRESS_CHUNK];
        loop {
            let n = reader.read(&mut chunk)?;
            if n == 0 {
                break;
            }
            encoder.write_all(&chunk[..n])?;
        }
        encoder.finish()?.flush()
    })();

    if let Err(e) = streamed {
        let _ = fs::remove_file(&temp_gz_path);
        return Err(LoggerError::io_operation(
            "compress log file",
            format!("Failed to compress: {}", path.display()),
            e,
        ));
    }

    fs::rename(&temp_gz_path, &gz_path).map_err(|e| {
        let _ = fs::remove_file(&temp_gz_path);
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to rename compressed file to: {}", gz_path.display()),
            e,
        )
    })?;

    // Both copies may exist if this fails; the next cleanup pass handles it.
    let _ = fs::remove_file(path);
    Ok(gz_path)
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
