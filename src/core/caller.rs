//! Call-site and stack capture

use std::backtrace::Backtrace;
use std::borrow::Cow;
use std::fmt;
use std::panic::Location;

/// Frames kept in a captured stack trace.
const MAX_STACK_DEPTH: usize = 32;

/// Function-path fragments of frames that belong to the logging pipeline.
const INTERNAL_MODULES: [&str; 3] = [
    concat!(env!("CARGO_CRATE_NAME"), "::core::caller::"),
    concat!(env!("CARGO_CRATE_NAME"), "::core::logger::"),
    concat!(env!("CARGO_CRATE_NAME"), "::core::global::"),
];

/// Source location of a log call, with the file shortened to its last two
/// path segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub file: Cow<'static, str>,
    pub line: u32,
}

impl Caller {
    pub fn new(file: impl Into<Cow<'static, str>>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Build from a `#[track_caller]` location without allocating.
    #[must_use]
    pub fn from_location(location: &'static Location<'static>) -> Self {
        Self {
            file: Cow::Borrowed(shorten_path(location.file())),
            line: location.line(),
        }
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Keep the last two segments of a path: `/src/app/server.rs` becomes
/// `app/server.rs`.
#[must_use]
pub fn shorten_path(path: &str) -> &str {
    let is_sep = |c: char| c == '/' || c == '\\';
    let Some(last) = path.rfind(is_sep) else {
        return path;
    };
    match path[..last].rfind(is_sep) {
        Some(prev) => &path[prev + 1..],
        None => path,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Frame {
    function: String,
    location: Option<(String, u32)>,
}

/// Frames of the current thread's stack, starting at the first frame outside
/// the logging pipeline.
pub(crate) struct Frames(Vec<Frame>);

impl Frames {
    pub(crate) fn capture() -> Self {
        let trace = Backtrace::force_capture().to_string();
        let mut frames = parse_backtrace(&trace);
        let internal = frames
            .iter()
            .take_while(|frame| is_internal(&frame.function))
            .count();
        frames.drain(..internal);
        Frames(frames)
    }

    /// Caller `skip` frames above the user call site. `None` when that frame
    /// has no location or the stack is shallower than `skip`.
    pub(crate) fn caller(&self, skip: usize) -> Option<Caller> {
        let (file, line) = self.0.get(skip)?.location.as_ref()?;
        Some(Caller::new(shorten_path(file).to_owned(), *line))
    }

    /// Multi-line trace, one `function\n\tfile:line\n` block per frame.
    pub(crate) fn format(&self, skip: usize) -> String {
        let mut out = String::with_capacity(512);
        for frame in self.0.iter().skip(skip).take(MAX_STACK_DEPTH) {
            out.push_str(&frame.function);
            out.push('\n');
            if let Some((file, line)) = &frame.location {
                out.push('\t');
                out.push_str(file);
                out.push(':');
                out.push_str(&line.to_string());
                out.push('\n');
            }
        }
        out
    }
}

fn is_internal(function: &str) -> bool {
    if function.contains("::tests::") {
        return false;
    }
    function.starts_with("std::backtrace")
        || function.contains("backtrace_rs")
        || INTERNAL_MODULES.iter().any(|module| function.contains(module))
}

/// Parse the `Display` form of a `Backtrace`:
///
/// ```text
///    3: app::handler::serve
///              at ./src/handler.rs:42:9
/// ```
fn parse_backtrace(trace: &str) -> Vec<Frame> {
    let mut frames: Vec<Frame> = Vec::new();
    for line in trace.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(location) = line.strip_prefix("at ") {
            if let Some(frame) = frames.last_mut() {
                frame.location = parse_location(location);
            }
            continue;
        }
        let function = match line.split_once(": ") {
            Some((index, name)) if index.bytes().all(|b| b.is_ascii_digit()) => name,
            _ => line,
        };
        frames.push(Frame {
            function: function.to_owned(),
            location: None,
        });
    }
    frames
}

/// `path:line:column` or `path:line`.
fn parse_location(location: &str) -> Option<(String, u32)> {
    let mut parts = location.rsplitn(3, ':');
    let last = parts.next()?;
    let middle = parts.next()?;
    match parts.next() {
        Some(path) => Some((path.to_owned(), middle.parse().ok()?)),
        None => Some((middle.to_owned(), last.parse().ok()?)),
    }
}
