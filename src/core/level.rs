//! Log level definitions

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Log severity.
///
/// A level is a signed integer so that ordering is plain integer comparison
/// and values outside the named range stay representable (encoders clamp
/// them when they need a table entry).
///
/// ```
/// use loghq::Level;
///
/// assert!(Level::ERROR > Level::WARN);
/// assert!(Level::WARN.enabled(Level::INFO));
/// assert_eq!(Level::parse("warning"), Level::WARN);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(i8);

const LEVEL_NAMES: [&str; 7] = ["TRACE", "DEBUG", "INFO", "OK", "WARN", "ERROR", "FATAL"];
const LEVEL_NAMES_LOWER: [&str; 7] = ["trace", "debug", "info", "ok", "warn", "error", "fatal"];

impl Level {
    pub const TRACE: Level = Level(-2);
    pub const DEBUG: Level = Level(-1);
    pub const INFO: Level = Level(0);
    pub const SUCCESS: Level = Level(1);
    pub const WARN: Level = Level(2);
    pub const ERROR: Level = Level(3);
    pub const FATAL: Level = Level(4);

    /// All named levels, lowest first.
    pub const ALL: [Level; 7] = [
        Level::TRACE,
        Level::DEBUG,
        Level::INFO,
        Level::SUCCESS,
        Level::WARN,
        Level::ERROR,
        Level::FATAL,
    ];

    /// Build a level from its raw value.
    #[must_use]
    pub const fn from_i8(value: i8) -> Self {
        Level(value)
    }

    #[must_use]
    pub const fn as_i8(self) -> i8 {
        self.0
    }

    /// True when this level is at or above `threshold`.
    #[inline]
    #[must_use]
    pub const fn enabled(self, threshold: Level) -> bool {
        self.0 >= threshold.0
    }

    /// Table index of a named level, `None` when out of range.
    fn named_index(self) -> Option<usize> {
        let idx = self.0 as i16 + 2;
        if (0..LEVEL_NAMES.len() as i16).contains(&idx) {
            Some(idx as usize)
        } else {
            None
        }
    }

    /// Table index clamped to the named range: anything below Trace maps to
    /// Trace, anything above Fatal maps to Fatal.
    #[must_use]
    pub fn clamped_index(self) -> usize {
        let idx = self.0 as i16 + 2;
        idx.clamp(0, LEVEL_NAMES.len() as i16 - 1) as usize
    }

    /// Canonical upper-case name, `None` for out-of-range values.
    #[must_use]
    pub fn name(self) -> Option<&'static str> {
        self.named_index().map(|i| LEVEL_NAMES[i])
    }

    /// Lower-case name used by the logfmt encoder. Out-of-range values use the
    /// clamped name.
    #[must_use]
    pub fn as_lower_str(self) -> &'static str {
        LEVEL_NAMES_LOWER[self.clamped_index()]
    }

    /// Lenient parse: case-insensitive, accepts `ok`/`success` and `warning`,
    /// falls back to `INFO` for anything it does not recognise.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        s.parse().unwrap_or(Level::INFO)
    }

    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self.clamped_index() {
            0 => BrightBlack,
            1 => Cyan,
            2 => Blue,
            3 => Green,
            4 => Yellow,
            _ => Red,
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::INFO
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "LEVEL({})", self.0),
        }
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TRACE" => Ok(Level::TRACE),
            "DEBUG" => Ok(Level::DEBUG),
            "INFO" => Ok(Level::INFO),
            "OK" | "SUCCESS" => Ok(Level::SUCCESS),
            "WARN" | "WARNING" => Ok(Level::WARN),
            "ERROR" => Ok(Level::ERROR),
            "FATAL" => Ok(Level::FATAL),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
