//! # jane - Text documents for the jane editor
//!
//! Ties format detection (`jane_format`) and configuration (`jane_config`)
//! together into documents that can be opened, edited and saved without
//! changing how the file is stored on disk.

#![warn(clippy::unwrap_used)]

pub mod commands;
pub mod document;

pub use commands::{ConvertOptions, ConvertReport, Inspection, convert, inspect_data, inspect_file};
pub use document::*;
