//! Byte destinations for handlers

pub mod console;
pub mod rotating_file;
pub mod writer;

pub use console::{Stderr, Stdout};
pub use rotating_file::{compress_file, list_backups, prune_backups, FileConfig, FileWriter};
pub use writer::LockedWriter;
