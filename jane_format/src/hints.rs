//! Per-file style preferences coming from project configuration.

use std::collections::BTreeMap;
use std::path::Path;

pub const CHARSET: &str = "charset";
pub const END_OF_LINE: &str = "end_of_line";
pub const INDENT_STYLE: &str = "indent_style";
pub const INDENT_SIZE: &str = "indent_size";
pub const TAB_WIDTH: &str = "tab_width";
pub const TRIM_TRAILING_WHITESPACE: &str = "trim_trailing_whitespace";
pub const INSERT_FINAL_NEWLINE: &str = "insert_final_newline";

/// Value of the `indent_style` hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentStyle {
    Tab,
    Space,
}

/// Style hints for one file. Keys are stored lowercased; lookups ignore the
/// case of values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleHints {
    values: BTreeMap<String, String>,
}

impl StyleHints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.values
            .insert(key.as_ref().trim().to_ascii_lowercase(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(&key.to_ascii_lowercase())
            .map(|value| value.trim())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn charset(&self) -> Option<&str> {
        self.get(CHARSET)
    }

    pub fn end_of_line(&self) -> Option<&str> {
        self.get(END_OF_LINE)
    }

    /// `None` when absent or not one of `tab` / `space`.
    pub fn indent_style(&self) -> Option<IndentStyle> {
        let value = self.get(INDENT_STYLE)?;
        if value.eq_ignore_ascii_case("tab") {
            Some(IndentStyle::Tab)
        } else if value.eq_ignore_ascii_case("space") {
            Some(IndentStyle::Space)
        } else {
            None
        }
    }

    /// Numeric `indent_size`; `tab` and other words yield `None`.
    pub fn indent_size(&self) -> Option<usize> {
        self.numeric(INDENT_SIZE)
    }

    pub fn tab_width(&self) -> Option<usize> {
        self.numeric(TAB_WIDTH)
    }

    /// Whether any indentation-related hint is present at all.
    pub fn has_indent_hints(&self) -> bool {
        [INDENT_STYLE, INDENT_SIZE, TAB_WIDTH]
            .iter()
            .any(|key| self.contains(key))
    }

    pub fn trim_trailing_whitespace(&self) -> bool {
        self.flag(TRIM_TRAILING_WHITESPACE)
    }

    pub fn insert_final_newline(&self) -> bool {
        self.flag(INSERT_FINAL_NEWLINE)
    }

    fn numeric(&self, key: &str) -> Option<usize> {
        let value = self.get(key)?;
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        value.parse().ok()
    }

    fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(|value| value.eq_ignore_ascii_case("true"))
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for StyleHints {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut hints = StyleHints::new();
        for (key, value) in iter {
            hints.insert(key, value);
        }
        hints
    }
}

/// Source of style hints for a file path, such as a project style
/// configuration lookup.
pub trait StyleSource {
    /// Hints for the file at `path`. Lookup problems yield empty hints.
    fn hints_for(&self, path: &Path) -> StyleHints;
}

/// A style source that never has any hints.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStyles;

impl StyleSource for NoStyles {
    fn hints_for(&self, _path: &Path) -> StyleHints {
        StyleHints::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_and_values_are_case_insensitive() {
        let hints: StyleHints = [("Indent_Style", "TAB"), ("Trim_Trailing_Whitespace", "True")]
            .into_iter()
            .collect();
        assert_eq!(hints.indent_style(), Some(IndentStyle::Tab));
        assert!(hints.trim_trailing_whitespace());
        assert!(!hints.insert_final_newline());
    }

    #[test]
    fn test_numeric_values() {
        let hints: StyleHints = [("indent_size", "tab"), ("tab_width", " 3 ")].into_iter().collect();
        assert_eq!(hints.indent_size(), None);
        assert_eq!(hints.tab_width(), Some(3));

        let hints: StyleHints = [("indent_size", "-2")].into_iter().collect();
        assert_eq!(hints.indent_size(), None);
    }

    #[test]
    fn test_unknown_indent_style() {
        let hints: StyleHints = [("indent_style", "mixed")].into_iter().collect();
        assert_eq!(hints.indent_style(), None);
        assert!(hints.has_indent_hints());
        assert!(!StyleHints::new().has_indent_hints());
    }
}
