//! # jane_config - Configuration for the jane editor
//!
//! Application settings layered from INI files, and per-file style
//! properties resolved from `.editorconfig` files.

#![warn(clippy::unwrap_used)]

pub mod config;
pub mod editorconfig;
pub mod error;
pub mod ini_parser;
pub mod settings;

pub use config::*;
pub use editorconfig::{EDITORCONFIG_FILE_NAME, EditorConfigResolver, Glob};
pub use error::*;
pub use ini_parser::*;
pub use settings::*;
