use crate::error::{ConfigError, ConfigResult};
use std::fmt;

/// Simple INI parser for configuration and style files
///
/// Supports `[section]` headers, `key = value` (or `key: value`) pairs and
/// full-line `#` / `;` comments. Pairs before the first header belong to the
/// unnamed preamble section.
pub struct IniParser;

impl IniParser {
    /// Parse an INI string, keeping sections and keys in file order
    pub fn parse(content: &str) -> ConfigResult<IniDocument> {
        let mut document = IniDocument::default();
        let mut current = IniSection::new("");

        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            // Handle section headers
            if line.starts_with('[') && line.ends_with(']') && line.len() >= 2 {
                document.push(std::mem::replace(&mut current, IniSection::new(&line[1..line.len() - 1])));
                continue;
            }

            // Parse key-value pairs
            if let Some((key, value)) = Self::parse_key_value(line) {
                current.entries.push((key.to_string(), value.to_string()));
            } else {
                return Err(ConfigError::Parse(format!(
                    "Invalid line {}: '{}'",
                    line_num + 1,
                    line
                )));
            }
        }

        document.push(current);
        Ok(document)
    }

    fn parse_key_value(line: &str) -> Option<(&str, &str)> {
        let split = line.find(['=', ':'])?;
        let key = line[..split].trim();
        if key.is_empty() {
            return None;
        }
        Some((key, line[split + 1..].trim()))
    }
}

/// One `[section]` of an INI document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniSection {
    pub name: String,
    pub entries: Vec<(String, String)>,
}

impl IniSection {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            entries: Vec::new(),
        }
    }

    /// Value of `key` (case-insensitive); the last occurrence wins
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(key)) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }
}

/// Parsed INI document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: Vec<IniSection>,
}

impl IniDocument {
    fn push(&mut self, section: IniSection) {
        if section.name.is_empty() && section.entries.is_empty() {
            return;
        }
        self.sections.push(section);
    }

    /// Pairs that appear before the first section header
    pub fn preamble(&self) -> Option<&IniSection> {
        self.sections.first().filter(|s| s.name.is_empty())
    }

    /// All named sections in file order
    pub fn sections(&self) -> impl Iterator<Item = &IniSection> {
        self.sections.iter().filter(|s| !s.name.is_empty())
    }

    /// First section called `name` (case-insensitive)
    pub fn section(&self, name: &str) -> Option<&IniSection> {
        self.sections
            .iter()
            .find(|s| !s.name.is_empty() && s.name.eq_ignore_ascii_case(name))
    }

    /// Value of `key` in section `name`, looking through repeated sections
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .iter()
            .rev()
            .filter(|s| s.name.eq_ignore_ascii_case(section))
            .find_map(|s| s.get(key))
    }

    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) {
        let index = match self
            .sections
            .iter()
            .position(|s| s.name.eq_ignore_ascii_case(section))
        {
            Some(index) => index,
            None => {
                self.sections.push(IniSection::new(section));
                self.sections.len() - 1
            }
        };
        self.sections[index].set(key, value);
    }

    /// Layer `other` on top of this document; its values win.
    pub fn merge(&mut self, other: &IniDocument) {
        for section in &other.sections {
            for (key, value) in &section.entries {
                self.set(&section.name, key, value.clone());
            }
        }
    }
}

impl fmt::Display for IniDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            if !section.name.is_empty() {
                writeln!(f, "[{}]", section.name)?;
            }
            for (key, value) in &section.entries {
                writeln!(f, "{} = {}", key, value)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sections_and_preamble() {
        let doc = IniParser::parse("root = true\n\n# comment\n[*.py]\nindent_size = 4\n; other\n[Makefile]\nindent_style: tab\n").unwrap();

        assert_eq!(doc.preamble().and_then(|p| p.get("root")), Some("true"));
        let names: Vec<&str> = doc.sections().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["*.py", "Makefile"]);
        assert_eq!(doc.get("makefile", "INDENT_STYLE"), Some("tab"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = IniParser::parse("[text]\nnot a pair\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(msg) if msg.contains("line 2")));
    }

    #[test]
    fn test_values_keep_inner_separators() {
        let doc = IniParser::parse("[paths]\nurl = http://example.com/a=b\n").unwrap();
        assert_eq!(doc.get("paths", "url"), Some("http://example.com/a=b"));
    }

    #[test]
    fn test_merge_and_display() {
        let mut base = IniParser::parse("[text]\nencoding = utf-8\nautowrap = false\n").unwrap();
        let overlay = IniParser::parse("[text]\nautowrap = true\n[extra]\nk = v\n").unwrap();
        base.merge(&overlay);

        assert_eq!(base.get("text", "encoding"), Some("utf-8"));
        assert_eq!(base.get("text", "autowrap"), Some("true"));
        assert_eq!(
            base.to_string(),
            "[text]\nencoding = utf-8\nautowrap = true\n\n[extra]\nk = v\n"
        );

        let reparsed = IniParser::parse(&base.to_string()).unwrap();
        assert_eq!(reparsed, base);
    }
}
