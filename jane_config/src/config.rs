use crate::error::ConfigResult;
use crate::ini_parser::{IniDocument, IniParser};
use crate::settings::{FileSettings, TextSettings};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the application configuration file
pub const CONFIG_FILE_NAME: &str = "jane.ini";

/// Main configuration structure for the jane editor
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Text document defaults
    pub text: TextSettings,
    /// File access settings
    pub files: FileSettings,
    /// Every value read from disk, including sections owned by other parts
    /// of the application
    pub raw: IniDocument,
    /// Files the configuration was read from, in load order
    pub sources: Vec<PathBuf>,
}

impl Config {
    /// Load configuration from a single INI file
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        let mut config = Self::from_ini_str(&content)?;
        config.sources.push(path.to_path_buf());
        Ok(config)
    }

    /// Load configuration from an INI string
    pub fn from_ini_str(content: &str) -> ConfigResult<Self> {
        Self::from_document(IniParser::parse(content)?)
    }

    fn from_document(raw: IniDocument) -> ConfigResult<Self> {
        Ok(Self {
            text: TextSettings::from_ini(&raw)?,
            files: FileSettings::from_ini(&raw)?,
            raw,
            sources: Vec::new(),
        })
    }

    /// Save configuration to an INI file
    pub fn save_to_file(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_ini_string())?;
        Ok(())
    }

    /// Export configuration as INI string
    pub fn to_ini_string(&self) -> String {
        let mut document = self.raw.clone();
        self.text.to_ini(&mut document);
        self.files.to_ini(&mut document);
        document.to_string()
    }

    /// Get configuration file search paths, lowest priority first
    pub fn config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // User-specific config
        if let Some(config_home) = std::env::var_os("XDG_CONFIG_HOME") {
            paths.push(PathBuf::from(config_home).join("jane").join(CONFIG_FILE_NAME));
        } else if let Some(home) = std::env::var_os("HOME") {
            paths.push(PathBuf::from(&home).join(".config").join("jane").join(CONFIG_FILE_NAME));
        }
        if let Some(app_data) = std::env::var_os("APPDATA") {
            paths.push(PathBuf::from(app_data).join("jane").join(CONFIG_FILE_NAME));
        }

        // Next to the executable
        if let Some(dir) = std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf)) {
            paths.push(dir.join(CONFIG_FILE_NAME));
        }

        // Current directory
        if let Ok(current_dir) = std::env::current_dir() {
            paths.push(current_dir.join(CONFIG_FILE_NAME));
        }

        paths
    }

    /// Load configuration with automatic path discovery
    pub fn load() -> ConfigResult<Self> {
        Self::load_with_paths(&Self::config_paths())
    }

    /// Load every existing file of `paths` in order; later files override
    /// earlier ones key by key. No file at all yields the defaults.
    pub fn load_with_paths(paths: &[PathBuf]) -> ConfigResult<Self> {
        let mut merged = IniDocument::default();
        let mut sources = Vec::new();

        for path in paths {
            if !path.is_file() {
                continue;
            }
            let content = fs::read_to_string(path)?;
            merged.merge(&IniParser::parse(&content)?);
            log::debug!("read configuration from {}", path.display());
            sources.push(path.clone());
        }

        let mut config = Self::from_document(merged)?;
        config.sources = sources;
        Ok(config)
    }

    /// Create a new configuration file with default settings
    pub fn create_default_config(path: &Path) -> ConfigResult<()> {
        Self::default().save_to_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jane_format::{IndentWidth, LineEnding};

    #[test]
    fn test_missing_files_give_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_with_paths(&[dir.path().join("nope.ini")]).unwrap();
        assert_eq!(config.text, TextSettings::default());
        assert!(config.sources.is_empty());
    }

    #[test]
    fn test_later_files_override_earlier() {
        let dir = tempfile::tempdir().unwrap();
        let user = dir.path().join("user.ini");
        let app = dir.path().join("app.ini");
        fs::write(&user, "[text]\nindentation = 2\nline_ending = cr\n").unwrap();
        fs::write(&app, "[text]\nindentation = 4\n[plugins]\nspell = \n").unwrap();

        let config = Config::load_with_paths(&[user.clone(), app.clone()]).unwrap();
        assert_eq!(config.text.indentation, IndentWidth::new(4));
        assert_eq!(config.text.line_ending, LineEnding::Cr);
        assert_eq!(config.raw.get("plugins", "spell"), Some(""));
        assert_eq!(config.sources, vec![user, app]);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.ini");
        fs::write(&path, "[text]\nindentation = lots\n").unwrap();
        assert!(Config::load_with_paths(&[path]).is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let mut config = Config::from_ini_str("[plugins]\npath = plugins\n").unwrap();
        config.text.autowrap = true;
        config.files.max_file_size = 4096;
        config.save_to_file(&path).unwrap();

        let reloaded = Config::from_file(&path).unwrap();
        assert!(reloaded.text.autowrap);
        assert_eq!(reloaded.files.max_file_size, 4096);
        assert_eq!(reloaded.raw.get("plugins", "path"), Some("plugins"));
        assert_eq!(reloaded.sources, vec![path]);
    }

    #[test]
    fn test_create_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        Config::create_default_config(&path).unwrap();
        assert_eq!(Config::from_file(&path).unwrap().text, TextSettings::default());
    }
}
