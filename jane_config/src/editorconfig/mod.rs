//! `.editorconfig` lookup.
//!
//! Resolves the style properties that apply to a file by walking up from its
//! directory, collecting `.editorconfig` files until one declares
//! `root = true`, and layering matching sections from the farthest file to
//! the nearest.

mod glob;

pub use glob::Glob;

use crate::error::ConfigResult;
use crate::ini_parser::IniParser;
use jane_format::{StyleHints, StyleSource};
use jane_format::hints::{
    CHARSET, END_OF_LINE, INDENT_SIZE, INDENT_STYLE, INSERT_FINAL_NEWLINE, TAB_WIDTH,
    TRIM_TRAILING_WHITESPACE,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default name of style configuration files
pub const EDITORCONFIG_FILE_NAME: &str = ".editorconfig";

/// Keys whose values are case-insensitive and stored lowercased
const KNOWN_KEYS: &[&str] = &[
    CHARSET,
    END_OF_LINE,
    INDENT_STYLE,
    INDENT_SIZE,
    TAB_WIDTH,
    TRIM_TRAILING_WHITESPACE,
    INSERT_FINAL_NEWLINE,
    "root",
];

/// Value that removes a property set by an earlier section
const UNSET: &str = "unset";

#[derive(Debug)]
struct Section {
    glob: Glob,
    properties: Vec<(String, String)>,
}

/// One parsed `.editorconfig` file
#[derive(Debug)]
struct EditorConfigFile {
    root: bool,
    sections: Vec<Section>,
}

impl EditorConfigFile {
    fn read(path: &Path) -> ConfigResult<Self> {
        let document = IniParser::parse(&fs::read_to_string(path)?)?;

        let root = document
            .preamble()
            .and_then(|preamble| preamble.get("root"))
            .is_some_and(|value| value.eq_ignore_ascii_case("true"));

        let sections = document
            .sections()
            .map(|section| Section {
                glob: Glob::new(&section.name),
                properties: section
                    .entries
                    .iter()
                    .map(|(key, value)| normalize_property(key, value))
                    .collect(),
            })
            .collect();

        Ok(Self { root, sections })
    }
}

fn normalize_property(key: &str, value: &str) -> (String, String) {
    let key = key.to_ascii_lowercase();
    let value = if KNOWN_KEYS.contains(&key.as_str()) {
        value.to_ascii_lowercase()
    } else {
        value.to_string()
    };
    (key, value)
}

/// Looks up `.editorconfig` properties for files
#[derive(Debug, Clone)]
pub struct EditorConfigResolver {
    file_name: String,
}

impl Default for EditorConfigResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorConfigResolver {
    pub fn new() -> Self {
        Self::with_file_name(EDITORCONFIG_FILE_NAME)
    }

    /// Resolver reading files called `file_name` instead of `.editorconfig`
    pub fn with_file_name(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    /// Properties that apply to the file at `path`. Files that cannot be
    /// read or parsed are skipped.
    pub fn properties_for(&self, path: &Path) -> StyleHints {
        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let mut properties = BTreeMap::new();

        for (dir, file) in self.files_for(&path).iter().rev() {
            let Some(relative) = relative_path(&path, dir) else {
                continue;
            };
            for section in file.sections.iter().filter(|s| s.glob.matches(&relative)) {
                for (key, value) in &section.properties {
                    properties.insert(key.clone(), value.clone());
                }
            }
        }

        properties.retain(|_, value| value != UNSET);
        properties.remove("root");
        apply_implied_properties(&mut properties);

        properties.into_iter().collect()
    }

    /// Configuration files from the nearest directory outwards, up to and
    /// including the first root file.
    fn files_for(&self, path: &Path) -> Vec<(PathBuf, EditorConfigFile)> {
        let mut files = Vec::new();
        let Some(start) = path.parent() else {
            return files;
        };

        for dir in start.ancestors() {
            let candidate = dir.join(&self.file_name);
            if !candidate.is_file() {
                continue;
            }
            match EditorConfigFile::read(&candidate) {
                Ok(file) => {
                    let root = file.root;
                    files.push((dir.to_path_buf(), file));
                    if root {
                        break;
                    }
                }
                Err(err) => log::warn!("ignoring {}: {}", candidate.display(), err),
            }
        }

        files
    }
}

impl StyleSource for EditorConfigResolver {
    fn hints_for(&self, path: &Path) -> StyleHints {
        self.properties_for(path)
    }
}

/// `path` relative to `dir`, joined with `/`
fn relative_path(path: &Path, dir: &Path) -> Option<String> {
    let relative = path.strip_prefix(dir).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

fn apply_implied_properties(properties: &mut BTreeMap<String, String>) {
    let is_numeric =
        |value: &str| !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit());

    if properties.get(INDENT_STYLE).map(String::as_str) == Some("tab")
        && !properties.contains_key(INDENT_SIZE)
    {
        properties.insert(INDENT_SIZE.to_string(), "tab".to_string());
    }

    match (properties.get(INDENT_SIZE).cloned(), properties.get(TAB_WIDTH).cloned()) {
        (Some(size), Some(width)) if size == "tab" => {
            properties.insert(INDENT_SIZE.to_string(), width);
        }
        (Some(size), None) if is_numeric(&size) => {
            properties.insert(TAB_WIDTH.to_string(), size);
        }
        _ => {}
    }
}
