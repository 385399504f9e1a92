//! Record encoders
//!
//! Each encoder turns one [`Record`](crate::core::Record) into one line of
//! bytes. Encoders are configuration only; every `encode` call builds its own
//! stack-local field encoder around the caller's buffer.

pub mod console;
pub mod json;
pub mod logfmt;

pub use console::ConsoleEncoder;
pub use json::JsonEncoder;
pub use logfmt::LogfmtEncoder;

use crate::core::Buffer;
use std::fmt;

/// Textual form of NaN and the infinities, which neither JSON nor logfmt
/// can carry as bare numbers.
pub(crate) fn non_finite(f: f64) -> Option<&'static str> {
    if f.is_nan() {
        Some("NaN")
    } else if f == f64::INFINITY {
        Some("+Inf")
    } else if f == f64::NEG_INFINITY {
        Some("-Inf")
    } else {
        None
    }
}

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Append `s` with JSON string escaping, without the surrounding quotes.
pub(crate) fn append_json_escaped(buf: &mut Buffer, s: &str) {
    let bytes = s.as_bytes();
    let mut start = 0;
    for (i, &c) in bytes.iter().enumerate() {
        let escape: &[u8] = match c {
            b'"' => b"\\\"",
            b'\\' => b"\\\\",
            b'\n' => b"\\n",
            b'\r' => b"\\r",
            b'\t' => b"\\t",
            0x00..=0x1f => b"",
            _ => continue,
        };
        buf.append_bytes(&bytes[start..i]);
        if escape.is_empty() {
            buf.append_bytes(b"\\u00");
            buf.append_byte(HEX[(c >> 4) as usize]);
            buf.append_byte(HEX[(c & 0x0f) as usize]);
        } else {
            buf.append_bytes(escape);
        }
        start = i + 1;
    }
    buf.append_bytes(&bytes[start..]);
}

/// Append `s` as a quoted JSON string.
pub(crate) fn append_json_string(buf: &mut Buffer, s: &str) {
    buf.append_byte(b'"');
    append_json_escaped(buf, s);
    buf.append_byte(b'"');
}

/// `fmt::Write` adapter that JSON-escapes everything written through it,
/// so `Display` values can be rendered straight into a quoted string.
pub(crate) struct JsonEscaper<'a>(pub(crate) &'a mut Buffer);

impl fmt::Write for JsonEscaper<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        append_json_escaped(self.0, s);
        Ok(())
    }
}

fn needs_logfmt_quotes(s: &[u8]) -> bool {
    s.iter()
        .any(|&c| c == b' ' || c == b'=' || c == b'"' || c == b'\\' || c < 0x20)
}

/// Append a logfmt value: bare when safe, otherwise quoted with `\"` and
/// `\\` escapes (and `\n`, `\r`, `\t` so a record stays on one line).
/// Empty values render as `""`.
pub(crate) fn append_logfmt_value(buf: &mut Buffer, s: &str) {
    if s.is_empty() {
        buf.append_str("\"\"");
        return;
    }
    if !needs_logfmt_quotes(s.as_bytes()) {
        buf.append_str(s);
        return;
    }

    buf.append_byte(b'"');
    let bytes = s.as_bytes();
    let mut start = 0;
    for (i, &c) in bytes.iter().enumerate() {
        let escape: &[u8] = match c {
            b'"' => b"\\\"",
            b'\\' => b"\\\\",
            b'\n' => b"\\n",
            b'\r' => b"\\r",
            b'\t' => b"\\t",
            _ => continue,
        };
        buf.append_bytes(&bytes[start..i]);
        buf.append_bytes(escape);
        start = i + 1;
    }
    buf.append_bytes(&bytes[start..]);
    buf.append_byte(b'"');
}

/// Render `value` straight into the buffer, re-encoding it as a quoted
/// logfmt value only when the rendered text needs quoting.
pub(crate) fn append_logfmt_display(buf: &mut Buffer, value: &dyn fmt::Display) {
    let start = buf.len();
    buf.append_display(value);
    requote_logfmt_tail(buf, start);
}

/// Quote whatever was appended since `start` if it is not a safe bare value.
pub(crate) fn requote_logfmt_tail(buf: &mut Buffer, start: usize) {
    let rendered = &buf.as_bytes()[start..];
    if rendered.is_empty() || needs_logfmt_quotes(rendered) {
        let text = String::from_utf8_lossy(rendered).into_owned();
        buf.truncate(start);
        append_logfmt_value(buf, &text);
    }
}
