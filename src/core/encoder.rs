//! Encoder trait

use super::{buffer::Buffer, record::Record};

/// Serializes one record into one buffer.
///
/// Encoders hold only configuration, so one instance may be used from many
/// threads at once as long as each call gets its own buffer.
pub trait Encoder: Send + Sync {
    fn encode(&self, buf: &mut Buffer, record: &Record);
}
