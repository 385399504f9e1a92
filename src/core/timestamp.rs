//! Timestamp formatting utilities
//!
//! Provides the configurable timestamp formats used by the encoders for the
//! record time and for timestamp fields.

use super::buffer::Buffer;
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

const RFC3339_NANO: &str = "%Y-%m-%dT%H:%M:%S%.f%:z";
const RFC3339: &str = "%Y-%m-%dT%H:%M:%S%:z";
const DATE_TIME: &str = "%Y-%m-%d %H:%M:%S";

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use loghq::TimestampFormat;
/// use chrono::{TimeZone, Utc};
///
/// let t = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
/// assert_eq!(TimestampFormat::DateTime.format(&t), "2025-01-08 10:30:45");
/// assert_eq!(TimestampFormat::Rfc3339.format(&t), "2025-01-08T10:30:45+00:00");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// RFC 3339 with as many fractional digits as needed and the offset:
    /// `2025-01-08T10:30:45.123456789+01:00`
    #[default]
    Rfc3339Nano,

    /// RFC 3339 to the second: `2025-01-08T10:30:45+01:00`
    Rfc3339,

    /// Local wall-clock style: `2025-01-08 10:30:45`
    DateTime,

    /// Unix timestamp in seconds: `1736332245`
    Unix,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Unix timestamp in microseconds: `1736332245123456`
    UnixMicros,

    /// Custom strftime format
    ///
    /// ```
    /// use loghq::TimestampFormat;
    ///
    /// // Apache log format
    /// let format = TimestampFormat::Custom("%d/%b/%Y:%H:%M:%S %z".to_string());
    /// ```
    Custom(String),
}

impl TimestampFormat {
    /// Format a timestamp into a new string.
    #[must_use]
    pub fn format<Tz>(&self, datetime: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let mut out = String::with_capacity(40);
        let _ = self.write_to(&mut out, datetime);
        out
    }

    /// Append a timestamp to an encoder buffer without an intermediate string.
    pub fn append<Tz>(&self, buf: &mut Buffer, datetime: &DateTime<Tz>)
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        // An invalid custom pattern leaves whatever chrono managed to write.
        let _ = self.write_to(buf, datetime);
    }

    /// Write a timestamp to any `fmt::Write`, such as an escaping adapter.
    pub fn write_to<W, Tz>(&self, out: &mut W, datetime: &DateTime<Tz>) -> fmt::Result
    where
        W: fmt::Write,
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        match self {
            TimestampFormat::Rfc3339Nano => write!(out, "{}", datetime.format(RFC3339_NANO)),
            TimestampFormat::Rfc3339 => write!(out, "{}", datetime.format(RFC3339)),
            TimestampFormat::DateTime => write!(out, "{}", datetime.format(DATE_TIME)),
            TimestampFormat::Unix => write!(out, "{}", datetime.timestamp()),
            TimestampFormat::UnixMillis => write!(out, "{}", datetime.timestamp_millis()),
            TimestampFormat::UnixMicros => write!(out, "{}", datetime.timestamp_micros()),
            TimestampFormat::Custom(pattern) => write!(out, "{}", datetime.format(pattern)),
        }
    }

    /// Check if this is a Unix-based numeric format
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            TimestampFormat::Unix | TimestampFormat::UnixMillis | TimestampFormat::UnixMicros
        )
    }
}
