//! JSON lines encoder

use super::{append_json_string, non_finite, JsonEscaper};
use crate::core::{AnyValue, Buffer, Encoder, FieldEncoder, Record, TimestampFormat};
use chrono::{DateTime, FixedOffset, TimeZone};
use std::borrow::Cow;
use std::fmt::{self, Write as _};
use std::time::Duration;

/// One JSON object per record:
/// `{"time":..,"level":..,"msg":..,"caller":..,<fields>,"stack":..}`.
///
/// Written by hand into the buffer; nothing goes through a serializer.
/// Field keys are emitted as given, so duplicates stay duplicated.
///
/// # Example
///
/// ```
/// use loghq::{Buffer, Encoder, JsonEncoder, Level, Record};
///
/// let mut record = Record::new(Level::INFO, "request");
/// record.add_kvs(&["method".into(), "GET".into(), "status".into(), 200.into()]);
///
/// let mut buf = Buffer::new();
/// JsonEncoder::new().with_keys("ts", "", "message").encode(&mut buf, &record);
///
/// let line = std::str::from_utf8(buf.as_bytes()).unwrap();
/// assert!(line.starts_with(r#"{"ts":""#));
/// assert!(line.ends_with("\"level\":\"INFO\",\"message\":\"request\",\"method\":\"GET\",\"status\":200}\n"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonEncoder {
    time_key: Cow<'static, str>,
    level_key: Cow<'static, str>,
    message_key: Cow<'static, str>,
    caller_key: Cow<'static, str>,
    stack_key: Cow<'static, str>,
    time_format: TimestampFormat,
}

impl Default for JsonEncoder {
    fn default() -> Self {
        Self {
            time_key: Cow::Borrowed("time"),
            level_key: Cow::Borrowed("level"),
            message_key: Cow::Borrowed("msg"),
            caller_key: Cow::Borrowed("caller"),
            stack_key: Cow::Borrowed("stack"),
            time_format: TimestampFormat::Rfc3339Nano,
        }
    }
}

fn replace_key(slot: &mut Cow<'static, str>, key: impl Into<Cow<'static, str>>) {
    let key = key.into();
    if !key.is_empty() {
        *slot = key;
    }
}

impl JsonEncoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rename the time, level and message keys. Empty names keep the current
    /// key.
    #[must_use]
    pub fn with_keys(
        mut self,
        time: impl Into<Cow<'static, str>>,
        level: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        replace_key(&mut self.time_key, time);
        replace_key(&mut self.level_key, level);
        replace_key(&mut self.message_key, message);
        self
    }

    #[must_use]
    pub fn with_caller_key(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        replace_key(&mut self.caller_key, key);
        self
    }

    #[must_use]
    pub fn with_stack_key(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        replace_key(&mut self.stack_key, key);
        self
    }

    /// Format for the record time and timestamp fields. Numeric formats are
    /// written as bare JSON numbers.
    #[must_use]
    pub fn with_time_format(mut self, format: TimestampFormat) -> Self {
        self.time_format = format;
        self
    }

    pub fn time_format(&self) -> &TimestampFormat {
        &self.time_format
    }
}

fn append_key(buf: &mut Buffer, key: &str) {
    append_json_string(buf, key);
    buf.append_byte(b':');
}

fn append_time<Tz>(buf: &mut Buffer, format: &TimestampFormat, time: &DateTime<Tz>)
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    if format.is_numeric() {
        format.append(buf, time);
    } else {
        buf.append_byte(b'"');
        let _ = format.write_to(&mut JsonEscaper(&mut *buf), time);
        buf.append_byte(b'"');
    }
}

impl Encoder for JsonEncoder {
    fn encode(&self, buf: &mut Buffer, record: &Record) {
        buf.append_byte(b'{');

        append_key(buf, &self.time_key);
        append_time(buf, &self.time_format, &record.time);

        buf.append_byte(b',');
        append_key(buf, &self.level_key);
        buf.append_byte(b'"');
        buf.append_display(&record.level);
        buf.append_byte(b'"');

        buf.append_byte(b',');
        append_key(buf, &self.message_key);
        append_json_string(buf, &record.message);

        if let Some(caller) = &record.caller {
            buf.append_byte(b',');
            append_key(buf, &self.caller_key);
            buf.append_byte(b'"');
            let _ = write!(JsonEscaper(&mut *buf), "{}", caller);
            buf.append_byte(b'"');
        }

        let mut fields = JsonFields {
            buf: &mut *buf,
            time_format: &self.time_format,
        };
        for field in record.fields() {
            fields.buf.append_byte(b',');
            field.encode(&mut fields);
        }

        if !record.stack.is_empty() {
            buf.append_byte(b',');
            append_key(buf, &self.stack_key);
            append_json_string(buf, &record.stack);
        }

        buf.append_str("}\n");
    }
}

struct JsonFields<'a> {
    buf: &'a mut Buffer,
    time_format: &'a TimestampFormat,
}

impl FieldEncoder for JsonFields<'_> {
    fn encode_str(&mut self, key: &str, value: &str) {
        append_key(self.buf, key);
        append_json_string(self.buf, value);
    }

    fn encode_int(&mut self, key: &str, value: i64) {
        append_key(self.buf, key);
        self.buf.append_int(value);
    }

    fn encode_float(&mut self, key: &str, value: f64) {
        append_key(self.buf, key);
        match non_finite(value) {
            Some(name) => append_json_string(self.buf, name),
            None => self.buf.append_float(value),
        }
    }

    fn encode_bool(&mut self, key: &str, value: bool) {
        append_key(self.buf, key);
        self.buf.append_bool(value);
    }

    fn encode_duration(&mut self, key: &str, value: Duration) {
        append_key(self.buf, key);
        self.buf.append_byte(b'"');
        let _ = write!(JsonEscaper(&mut *self.buf), "{:?}", value);
        self.buf.append_byte(b'"');
    }

    fn encode_time(&mut self, key: &str, value: &DateTime<FixedOffset>) {
        append_key(self.buf, key);
        append_time(self.buf, self.time_format, value);
    }

    fn encode_error(&mut self, key: &str, message: &str) {
        append_key(self.buf, key);
        append_json_string(self.buf, message);
    }

    fn encode_any(&mut self, key: &str, value: &AnyValue) {
        append_key(self.buf, key);
        self.buf.append_byte(b'"');
        let _ = write!(JsonEscaper(&mut *self.buf), "{}", value);
        self.buf.append_byte(b'"');
    }
}
