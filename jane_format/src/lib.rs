//! # jane_format - Text format detection for the jane editor
//!
//! Infers how a text file is stored on disk and converts between that form
//! and the normalized in-memory text (`\n` terminators, Rust strings).
//!
//! Modules:
//! - `bom` for byte order mark detection
//! - `encoding` for charset resolution, heuristics and the lossy codec
//! - `eol` for line ending detection and normalization
//! - `indent` for indentation detection and conversion
//! - `hints` for per-file style preferences
//! - `format` for the detection pipeline and decode/encode
//! - `file` for loading and saving files

mod bom;
pub mod encoding;
pub mod eol;
pub mod file;
pub mod format;
pub mod hints;
pub mod indent;

pub use bom::{BomDetectionResult, bom_bytes, detect_bom};
pub use encoding::{Charset, detect_encoding};
pub use eol::{LineEnding, detect_line_ending};
pub use file::{
    FileLoadConfig, FileLoadResult, FileSaveConfig, FileSaveResult, FileStamp,
    is_binary_content, load_file, read_file, save_file, write_file_atomic,
};
pub use format::{
    DetectedFormat, FormatDefaults, FormatDetector, apply_style_overrides, decode, encode,
    encode_with_hints,
};
pub use hints::{IndentStyle, NoStyles, StyleHints, StyleSource};
pub use indent::{IndentWidth, detect_indent, reindent};

use std::fmt;
use std::io;

/// Errors raised by the file helpers. Detection and conversion never fail.
#[derive(Debug)]
pub enum FileError {
    /// I/O error while reading or writing a file
    Io(io::Error),
    /// File exceeds the configured size limit
    FileTooLarge { size: u64, limit: u64 },
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::Io(err) => write!(f, "I/O error: {}", err),
            FileError::FileTooLarge { size, limit } => {
                write!(f, "File is too large to open ({} bytes, limit {})", size, limit)
            }
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for FileError {
    fn from(err: io::Error) -> Self {
        FileError::Io(err)
    }
}

/// Result type for file operations
pub type FileResult<T> = Result<T, FileError>;
