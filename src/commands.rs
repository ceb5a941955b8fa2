//! The `inspect` and `convert` operations behind the command-line front end.

use crate::document::{DocumentKind, TextDocument};
use anyhow::{Context, Result, bail};
use jane_config::Config;
use jane_format::{Charset, DetectedFormat, LineEnding, StyleHints, StyleSource};
use std::fmt;
use std::path::{Path, PathBuf};

/// What `inspect` found out about one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inspection {
    Text {
        name: String,
        format: DetectedFormat,
        hints: StyleHints,
    },
    Binary {
        name: String,
        size: usize,
    },
}

impl Inspection {
    fn of_text(document: &TextDocument) -> Self {
        Inspection::Text {
            name: document.name().to_string(),
            format: *document.format(),
            hints: document.hints().clone(),
        }
    }
}

impl fmt::Display for Inspection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inspection::Text { name, format, hints } => {
                write!(f, "{}: text, {}", name, format)?;
                if !hints.is_empty() {
                    let pairs: Vec<String> = hints.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
                    write!(f, "\n  style: {}", pairs.join(" "))?;
                }
                Ok(())
            }
            Inspection::Binary { name, size } => write!(f, "{}: binary, {} bytes", name, size),
        }
    }
}

/// Inspect a file on disk.
pub fn inspect_file(config: &Config, path: &Path, styles: &dyn StyleSource) -> Result<Inspection> {
    let document = DocumentKind::open(path, config, styles)
        .with_context(|| format!("Error opening '{}'", path.display()))?;

    Ok(match &document {
        DocumentKind::Text(text) => Inspection::of_text(text),
        DocumentKind::Binary(binary) => Inspection::Binary {
            name: binary.name().to_string(),
            size: binary.data().len(),
        },
    })
}

/// Inspect bytes that do not come from a file, such as standard input.
pub fn inspect_data(config: &Config, bytes: &[u8]) -> Inspection {
    Inspection::of_text(&TextDocument::with_data(config, bytes))
}

/// Target format of `convert`; `None` keeps the detected value.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub encoding: Option<Charset>,
    pub line_ending: Option<LineEnding>,
    pub indent: Option<usize>,
    /// Write here instead of overwriting the input
    pub output: Option<PathBuf>,
}

/// Outcome of `convert`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertReport {
    pub path: PathBuf,
    pub before: DetectedFormat,
    pub after: DetectedFormat,
    pub bytes_written: u64,
}

impl fmt::Display for ConvertReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} -> {} ({} bytes)",
            self.path.display(),
            self.before,
            self.after,
            self.bytes_written
        )
    }
}

/// Rewrite a text file in another format.
///
/// Style hints for the written path are applied on save, so a `charset` or
/// `end_of_line` property overrides the requested encoding or line ending.
pub fn convert(
    config: &Config,
    file: &Path,
    options: &ConvertOptions,
    styles: &dyn StyleSource,
) -> Result<ConvertReport> {
    let mut document = match DocumentKind::open(file, config, styles)
        .with_context(|| format!("Error opening '{}'", file.display()))?
    {
        DocumentKind::Text(document) => document,
        DocumentKind::Binary(_) => bail!("'{}' is a binary file", file.display()),
    };

    let before = *document.format();
    if let Some(encoding) = options.encoding {
        document.set_encoding(encoding);
    }
    if let Some(line_ending) = options.line_ending {
        document.set_line_ending(line_ending);
    }
    if let Some(indent) = options.indent {
        document.set_indent(indent);
    }

    let output = options.output.as_deref();
    let saved = document
        .save(output, styles)
        .with_context(|| format!("Error saving '{}'", output.unwrap_or(file).display()))?;

    Ok(ConvertReport {
        path: saved.path,
        before,
        after: *document.format(),
        bytes_written: saved.bytes_written,
    })
}
