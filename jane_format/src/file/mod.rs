//! File reading and writing around the format pipeline.
//!
//! This module provides:
//! - Whole-file reads with a size guard
//! - Binary content detection
//! - Atomic saving with permission preservation
//! - Modification stamps for external change detection

pub mod identity;
pub mod load;
pub mod save;

pub use identity::FileStamp;
pub use load::{FileLoadConfig, FileLoadResult, is_binary_content, load_file, read_file};
pub use save::{FileSaveConfig, FileSaveResult, save_file, write_file_atomic};
