use std::fmt;

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
    /// File I/O errors
    Io(std::io::Error),
    /// INI syntax errors
    Parse(String),
    /// Configuration validation errors
    Validation(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "I/O error: {}", e),
            ConfigError::Parse(msg) => write!(f, "Configuration parsing error: {}", msg),
            ConfigError::Validation(msg) => write!(f, "Configuration validation error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(error: std::io::Error) -> Self {
        ConfigError::Io(error)
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
