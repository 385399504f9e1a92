//! Human-oriented console encoder

use super::non_finite;
use crate::core::{AnyValue, Buffer, Encoder, FieldEncoder, Level, Record, TimestampFormat};
use chrono::{DateTime, FixedOffset};
use std::sync::OnceLock;
use std::time::Duration;

const RESET: &str = "\x1b[0m";
const DIM: &str = "\x1b[2m";

const ICONS: [&str; 7] = ["◦", "◇", "●", "✓", "▲", "✗", "✗"];
const PADDED: [&str; 7] = ["TRACE ", "DEBUG ", "INFO  ", "OK    ", "WARN  ", "ERROR ", "FATAL "];

/// ANSI foreground sequence per level, built from the level colors.
fn level_styles() -> &'static [String; 7] {
    static STYLES: OnceLock<[String; 7]> = OnceLock::new();
    STYLES.get_or_init(|| {
        std::array::from_fn(|idx| {
            let color = Level::ALL[idx].color_code().to_fg_str();
            if Level::ALL[idx] == Level::FATAL {
                format!("\x1b[1;{}m", color)
            } else {
                format!("\x1b[{}m", color)
            }
        })
    })
}

/// Icon-prefixed, optionally colored terminal lines:
///
/// ```text
///  2025-01-08 10:30:45 ● INFO  request  method=GET status=200  caller=api/http.rs:88
/// ```
///
/// Values are written as-is, without quoting. Stack traces follow the line
/// unindented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleEncoder {
    no_color: bool,
    time_format: TimestampFormat,
}

impl Default for ConsoleEncoder {
    fn default() -> Self {
        Self {
            no_color: false,
            time_format: TimestampFormat::DateTime,
        }
    }
}

impl ConsoleEncoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit no ANSI escape sequences at all.
    #[must_use]
    pub fn no_color(mut self) -> Self {
        self.no_color = true;
        self
    }

    #[must_use]
    pub fn with_time_format(mut self, format: TimestampFormat) -> Self {
        self.time_format = format;
        self
    }

    pub fn is_colored(&self) -> bool {
        !self.no_color
    }

    fn style(&self, buf: &mut Buffer, code: &str) {
        if !self.no_color {
            buf.append_str(code);
        }
    }
}

impl Encoder for ConsoleEncoder {
    fn encode(&self, buf: &mut Buffer, record: &Record) {
        let idx = record.level.clamped_index();

        self.style(buf, DIM);
        buf.append_byte(b' ');
        self.time_format.append(buf, &record.time);
        self.style(buf, RESET);
        buf.append_byte(b' ');

        self.style(buf, &level_styles()[idx]);
        buf.append_str(ICONS[idx]);
        buf.append_byte(b' ');
        buf.append_str(PADDED[idx]);
        self.style(buf, RESET);

        buf.append_str(&record.message);

        if record.num_fields() > 0 {
            buf.append_str("  ");
            let mut fields = ConsoleFields {
                buf: &mut *buf,
                no_color: self.no_color,
                first: true,
            };
            for field in record.fields() {
                field.encode(&mut fields);
            }
        }

        if let Some(caller) = &record.caller {
            buf.append_str("  ");
            self.style(buf, DIM);
            buf.append_str("caller=");
            self.style(buf, RESET);
            buf.append_display(caller);
        }

        buf.append_byte(b'\n');

        if !record.stack.is_empty() {
            self.style(buf, DIM);
            buf.append_str(&record.stack);
            self.style(buf, RESET);
        }
    }
}

struct ConsoleFields<'a> {
    buf: &'a mut Buffer,
    no_color: bool,
    first: bool,
}

impl ConsoleFields<'_> {
    fn key(&mut self, key: &str) {
        if !self.first {
            self.buf.append_byte(b' ');
        }
        self.first = false;

        if self.no_color {
            self.buf.append_str(key);
            self.buf.append_byte(b'=');
        } else {
            self.buf.append_str(DIM);
            self.buf.append_str(key);
            self.buf.append_byte(b'=');
            self.buf.append_str(RESET);
        }
    }
}

impl FieldEncoder for ConsoleFields<'_> {
    fn encode_str(&mut self, key: &str, value: &str) {
        self.key(key);
        self.buf.append_str(value);
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
        TimestampFormat::Rfc3339.append(self.buf, value);
    }

    fn encode_error(&mut self, key: &str, message: &str) {
        self.key(key);
        self.buf.append_str(message);
    }

    fn encode_any(&mut self, key: &str, value: &AnyValue) {
        self.key(key);
        self.buf.append_display(value);
    }
}
