//! Logfmt encoder

use super::{append_logfmt_display, append_logfmt_value, non_finite, requote_logfmt_tail};
use crate::core::{AnyValue, Buffer, Encoder, FieldEncoder, Record, TimestampFormat};
use chrono::{DateTime, FixedOffset, TimeZone};
use std::fmt;
use std::time::Duration;

/// `time=.. level=<lower> msg=.. [caller=..] k=v ...`, one record per line.
///
/// Stack traces are not written: they would break the one-line format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogfmtEncoder {
    time_format: TimestampFormat,
}

impl Default for LogfmtEncoder {
    fn default() -> Self {
        Self {
            time_format: TimestampFormat::Rfc3339,
        }
    }
}

impl LogfmtEncoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_time_format(mut self, format: TimestampFormat) -> Self {
        self.time_format = format;
        self
    }

    pub fn time_format(&self) -> &TimestampFormat {
        &self.time_format
    }
}

impl Encoder for LogfmtEncoder {
    fn encode(&self, buf: &mut Buffer, record: &Record) {
        buf.append_str("time=");
        append_time(buf, &self.time_format, &record.time);

        buf.append_str(" level=");
        buf.append_str(record.level.as_lower_str());

        buf.append_str(" msg=");
        append_logfmt_value(buf, &record.message);

        if let Some(caller) = &record.caller {
            buf.append_str(" caller=");
            append_logfmt_display(buf, caller);
        }

        let mut fields = LogfmtFields {
            buf: &mut *buf,
            time_format: &self.time_format,
        };
        for field in record.fields() {
            field.encode(&mut fields);
        }

        buf.append_byte(b'\n');
    }
}

fn append_time<Tz>(buf: &mut Buffer, format: &TimestampFormat, time: &DateTime<Tz>)
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let start = buf.len();
    format.append(buf, time);
    requote_logfmt_tail(buf, start);
}

struct LogfmtFields<'a> {
    buf: &'a mut Buffer,
    time_format: &'a TimestampFormat,
}

impl LogfmtFields<'_> {
    fn key(&mut self, key: &str) {
        self.buf.append_byte(b' ');
        self.buf.append_str(key);
        self.buf.append_byte(b'=');
    }
}

impl FieldEncoder for LogfmtFields<'_> {
    fn encode_str(&mut self, key: &str, value: &str) {
        self.key(key);
        append_logfmt_value(self.buf, value);
    }

    fn encode_int(&mut self, key: &str, value: i64) {
        self.key(key);
        self.buf.append_int(value);
    }

    fn encode_float(&mut self, key: &str, value: f64) {
        self.key(key);
        match non_finite(value) {
            Some(name) => self.buf.append_str(name),
            None => self.buf.append_float(value),
        }
    }

    fn encode_bool(&mut self, key: &str, value: bool) {
        self.key(key);
        self.buf.append_bool(value);
    }

    fn encode_duration(&mut self, key: &str, value: Duration) {
        self.key(key);
        self.buf.append_display(&format_args!("{:?}", value));
    }

    fn encode_time(&mut self, key: &str, value: &DateTime<FixedOffset>) {
        self.key(key);
        append_time(self.buf, self.time_format, value);
    }

    fn encode_error(&mut self, key: &str, message: &str) {
        self.key(key);
        append_logfmt_value(self.buf, message);
    }

    fn encode_any(&mut self, key: &str, value: &AnyValue) {
        self.key(key);
        append_logfmt_display(self.buf, value);
    }
}
