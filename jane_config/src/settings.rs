use crate::error::{ConfigError, ConfigResult};
use crate::ini_parser::IniDocument;
use jane_format::{Charset, FileLoadConfig, FileSaveConfig, FormatDefaults, IndentWidth, LineEnding};

/// Section holding the text settings
pub const TEXT_SECTION: &str = "text";

/// Section holding the file access settings
pub const FILES_SECTION: &str = "files";

/// Text document defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSettings {
    /// Encoding of new files and of files without an encoding signal
    pub encoding: Charset,
    /// Encoding assumed for files that are not valid UTF-8
    pub legacy_encoding: Charset,
    /// Line ending of new files and of files without line breaks
    pub line_ending: LineEnding,
    /// Indentation of new files (0 = tabs)
    pub indentation: IndentWidth,
    /// Soft-wrap long lines
    pub autowrap: bool,
}

impl Default for TextSettings {
    fn default() -> Self {
        let defaults = FormatDefaults::default();
        Self {
            encoding: defaults.encoding,
            legacy_encoding: defaults.legacy_encoding,
            line_ending: defaults.line_ending,
            indentation: defaults.indent,
            autowrap: false,
        }
    }
}

impl TextSettings {
    /// Load settings from the `[text]` section; absent keys keep defaults
    pub fn from_ini(document: &IniDocument) -> ConfigResult<Self> {
        let mut settings = Self::default();
        let get = |key: &str| document.get(TEXT_SECTION, key);

        if let Some(value) = get("encoding") {
            settings.encoding = parse_charset("encoding", value)?;
        }
        if let Some(value) = get("legacy_encoding") {
            settings.legacy_encoding = parse_charset("legacy_encoding", value)?;
            if !settings.legacy_encoding.is_ascii_compatible() {
                return Err(ConfigError::Validation(format!(
                    "text.legacy_encoding must be ASCII compatible, got '{}'",
                    value
                )));
            }
        }
        if let Some(value) = get("line_ending") {
            settings.line_ending = parse_line_ending(value)?;
        }
        if let Some(value) = get("indentation") {
            settings.indentation = parse_indentation(value)?;
        }
        if let Some(value) = get("autowrap") {
            settings.autowrap = parse_bool(TEXT_SECTION, "autowrap", value)?;
        }

        Ok(settings)
    }

    /// Export settings into the `[text]` section of `document`
    pub fn to_ini(&self, document: &mut IniDocument) {
        document.set(TEXT_SECTION, "encoding", self.encoding.name());
        document.set(TEXT_SECTION, "legacy_encoding", self.legacy_encoding.name());
        document.set(TEXT_SECTION, "line_ending", self.line_ending.name());
        document.set(TEXT_SECTION, "indentation", self.indentation.get().to_string());
        document.set(TEXT_SECTION, "autowrap", self.autowrap.to_string());
    }

    /// Defaults handed to format detection
    pub fn format_defaults(&self) -> FormatDefaults {
        FormatDefaults {
            encoding: self.encoding,
            legacy_encoding: self.legacy_encoding,
            line_ending: self.line_ending,
            indent: self.indentation,
        }
    }
}

fn parse_charset(key: &str, value: &str) -> ConfigResult<Charset> {
    Charset::resolve(value).ok_or_else(|| {
        ConfigError::Validation(format!("text.{} names an unknown encoding '{}'", key, value))
    })
}

/// Accepts a name (`crlf`, `lf`, `cr`) or the menu index (`0`, `1`, `2`).
fn parse_line_ending(value: &str) -> ConfigResult<LineEnding> {
    let by_index = value.parse::<usize>().ok().and_then(LineEnding::from_index);
    by_index.or_else(|| LineEnding::from_name(value)).ok_or_else(|| {
        ConfigError::Validation(format!("text.line_ending must be crlf, lf or cr, got '{}'", value))
    })
}

fn parse_indentation(value: &str) -> ConfigResult<IndentWidth> {
    match value.parse::<usize>() {
        Ok(width) if width <= IndentWidth::MAX as usize => Ok(IndentWidth::new(width)),
        _ => Err(ConfigError::Validation(format!(
            "text.indentation must be between 0 (tabs) and {}, got '{}'",
            IndentWidth::MAX,
            value
        ))),
    }
}

fn parse_bool(section: &str, key: &str, value: &str) -> ConfigResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Ok(true),
        "0" | "no" | "false" | "off" => Ok(false),
        _ => Err(ConfigError::Validation(format!(
            "{}.{} must be a boolean, got '{}'",
            section, key, value
        ))),
    }
}

/// How documents read and write files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSettings {
    /// Files larger than this many bytes are refused
    pub max_file_size: u64,
    /// Write through a temporary file and rename it over the target
    pub atomic_writes: bool,
    /// Keep the permissions of the file being replaced (Unix only)
    pub preserve_permissions: bool,
}

impl Default for FileSettings {
    fn default() -> Self {
        let load = FileLoadConfig::default();
        let save = FileSaveConfig::default();
        Self {
            max_file_size: load.max_file_size,
            atomic_writes: save.atomic_writes,
            preserve_permissions: save.preserve_permissions,
        }
    }
}

impl FileSettings {
    /// Load settings from the `[files]` section; absent keys keep defaults
    pub fn from_ini(document: &IniDocument) -> ConfigResult<Self> {
        let mut settings = Self::default();
        let get = |key: &str| document.get(FILES_SECTION, key);

        if let Some(value) = get("max_file_size") {
            settings.max_file_size = match value.parse::<u64>() {
                Ok(size) if size > 0 => size,
                _ => {
                    return Err(ConfigError::Validation(format!(
                        "files.max_file_size must be a positive byte count, got '{}'",
                        value
                    )));
                }
            };
        }
        if let Some(value) = get("atomic_writes") {
            settings.atomic_writes = parse_bool(FILES_SECTION, "atomic_writes", value)?;
        }
        if let Some(value) = get("preserve_permissions") {
            settings.preserve_permissions = parse_bool(FILES_SECTION, "preserve_permissions", value)?;
        }

        Ok(settings)
    }

    /// Export settings into the `[files]` section of `document`
    pub fn to_ini(&self, document: &mut IniDocument) {
        document.set(FILES_SECTION, "max_file_size", self.max_file_size.to_string());
        document.set(FILES_SECTION, "atomic_writes", self.atomic_writes.to_string());
        document.set(FILES_SECTION, "preserve_permissions", self.preserve_permissions.to_string());
    }

    pub fn load_config(&self) -> FileLoadConfig {
        FileLoadConfig {
            max_file_size: self.max_file_size,
            ..FileLoadConfig::default()
        }
    }

    pub fn save_config(&self) -> FileSaveConfig {
        FileSaveConfig {
            atomic_writes: self.atomic_writes,
            preserve_permissions: self.preserve_permissions,
            ..FileSaveConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ini_parser::IniParser;

    #[test]
    fn test_defaults_without_section() {
        let doc = IniParser::parse("[other]\nx = 1\n").unwrap();
        assert_eq!(TextSettings::from_ini(&doc).unwrap(), TextSettings::default());
    }

    #[test]
    fn test_load_text_section() {
        let doc = IniParser::parse(
            "[text]\nencoding = utf-8-sig\nlegacy_encoding = cp1251\nline_ending = 1\nindentation = 2\nautowrap = yes\n",
        )
        .unwrap();
        let settings = TextSettings::from_ini(&doc).unwrap();

        assert_eq!(settings.encoding, Charset::Utf8Sig);
        assert_eq!(settings.legacy_encoding.name(), "windows-1251");
        assert_eq!(settings.line_ending, LineEnding::Lf);
        assert_eq!(settings.indentation, IndentWidth::new(2));
        assert!(settings.autowrap);
    }

    #[test]
    fn test_line_ending_by_name() {
        let doc = IniParser::parse("[text]\nline_ending = CR\n").unwrap();
        assert_eq!(TextSettings::from_ini(&doc).unwrap().line_ending, LineEnding::Cr);
    }

    #[test]
    fn test_validation_errors() {
        for body in [
            "encoding = klingon",
            "legacy_encoding = utf-16le",
            "line_ending = 7",
            "indentation = 9",
            "autowrap = maybe",
        ] {
            let doc = IniParser::parse(&format!("[text]\n{}\n", body)).unwrap();
            let err = TextSettings::from_ini(&doc).unwrap_err();
            assert!(matches!(err, ConfigError::Validation(_)), "{}", body);
        }
    }

    #[test]
    fn test_export_round_trip() {
        let settings = TextSettings {
            encoding: Charset::Utf16Be,
            legacy_encoding: Charset::resolve("shift_jis").unwrap(),
            line_ending: LineEnding::Crlf,
            indentation: IndentWidth::new(4),
            autowrap: true,
        };
        let mut doc = IniDocument::default();
        settings.to_ini(&mut doc);
        assert_eq!(TextSettings::from_ini(&doc).unwrap(), settings);
    }

    #[test]
    fn test_file_settings() {
        let doc = IniParser::parse("[files]\nmax_file_size = 1024\natomic_writes = off\n").unwrap();
        let settings = FileSettings::from_ini(&doc).unwrap();
        assert_eq!(settings.max_file_size, 1024);
        assert!(!settings.atomic_writes);
        assert!(settings.preserve_permissions);

        assert_eq!(settings.load_config().max_file_size, 1024);
        let save = settings.save_config();
        assert!(!save.atomic_writes);
        assert_eq!(save.temp_suffix, FileSaveConfig::default().temp_suffix);

        let mut exported = IniDocument::default();
        settings.to_ini(&mut exported);
        assert_eq!(FileSettings::from_ini(&exported).unwrap(), settings);
    }

    #[test]
    fn test_file_settings_validation() {
        for body in ["max_file_size = 0", "max_file_size = big", "preserve_permissions = sometimes"] {
            let doc = IniParser::parse(&format!("[files]\n{}\n", body)).unwrap();
            let err = FileSettings::from_ini(&doc).unwrap_err();
            assert!(matches!(err, ConfigError::Validation(msg) if msg.starts_with("files.")), "{}", body);
        }
    }

    #[test]
    fn test_format_defaults() {
        let settings = TextSettings { indentation: IndentWidth::new(3), ..TextSettings::default() };
        let defaults = settings.format_defaults();
        assert_eq!(defaults.indent, IndentWidth::new(3));
        assert_eq!(defaults.encoding, settings.encoding);
    }
}
