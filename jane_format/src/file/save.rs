//! Atomic file saving with permission preservation.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::FileResult;
use crate::format::{DetectedFormat, encode_with_hints};
use crate::hints::StyleHints;

/// Configuration for file saving operations
#[derive(Debug, Clone)]
pub struct FileSaveConfig {
    /// Whether to preserve file permissions (Unix only)
    pub preserve_permissions: bool,
    /// Whether to use atomic writes with temp files
    pub atomic_writes: bool,
    /// Custom temp file suffix
    pub temp_suffix: String,
}

impl Default for FileSaveConfig {
    fn default() -> Self {
        FileSaveConfig {
            preserve_permissions: true,
            atomic_writes: true,
            temp_suffix: ".jane-tmp".to_string(),
        }
    }
}

/// Result of a file saving operation
#[derive(Debug)]
pub struct FileSaveResult {
    /// Final path where file was saved
    pub path: PathBuf,
    /// Number of bytes written
    pub bytes_written: u64,
    /// Whether atomic write was used
    pub atomic_write: bool,
}

/// Encode `content` in `format`, honouring the trimming and final-newline
/// hints, and write it to `path`.
pub fn save_file<P: AsRef<Path>>(
    path: P,
    content: &str,
    format: &DetectedFormat,
    hints: &StyleHints,
    config: &FileSaveConfig,
) -> FileResult<FileSaveResult> {
    let bytes = encode_with_hints(content, format, hints);
    write_file_atomic(path, &bytes, config)
}

/// Write raw bytes to `path`, through a sibling temp file when configured.
pub fn write_file_atomic<P: AsRef<Path>>(
    path: P,
    content: &[u8],
    config: &FileSaveConfig,
) -> FileResult<FileSaveResult> {
    let path = path.as_ref();

    if !config.atomic_writes {
        write_to_file(path, content)?;
        return Ok(FileSaveResult {
            path: path.to_path_buf(),
            bytes_written: content.len() as u64,
            atomic_write: false,
        });
    }

    let temp_path = get_temp_path(path, &config.temp_suffix);
    write_to_file(&temp_path, content)?;

    if config.preserve_permissions && path.exists() {
        if let Err(e) = preserve_permissions(path, &temp_path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }

    log::debug!("saved {} bytes to {}", content.len(), path.display());
    Ok(FileSaveResult {
        path: path.to_path_buf(),
        bytes_written: content.len() as u64,
        atomic_write: true,
    })
}

fn write_to_file(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut writer = io::BufWriter::new(File::create(path)?);
    writer.write_all(content)?;
    writer.flush()?;
    writer.get_ref().sync_all()
}

/// Generate temp file path.
fn get_temp_path(original_path: &Path, suffix: &str) -> PathBuf {
    let mut temp_path = original_path.to_path_buf();
    let original_name = temp_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file");

    let temp_name = format!(".{}{}", original_name, suffix);
    temp_path.set_file_name(temp_name);
    temp_path
}

#[cfg(unix)]
fn preserve_permissions(source: &Path, target: &Path) -> io::Result<()> {
    let permissions = fs::metadata(source)?.permissions();
    fs::set_permissions(target, permissions)
}

#[cfg(not(unix))]
fn preserve_permissions(_source: &Path, _target: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::Charset;
    use crate::eol::LineEnding;
    use crate::indent::IndentWidth;

    #[test]
    fn test_save_atomic_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, b"old").unwrap();

        let result = write_file_atomic(&path, b"new content", &FileSaveConfig::default()).unwrap();
        assert!(result.atomic_write);
        assert_eq!(result.bytes_written, 11);
        assert_eq!(fs::read(&path).unwrap(), b"new content");
        assert!(!get_temp_path(&path, ".jane-tmp").exists());
    }

    #[test]
    fn test_save_direct() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("direct.txt");
        let config = FileSaveConfig { atomic_writes: false, ..FileSaveConfig::default() };

        let result = write_file_atomic(&path, b"x", &config).unwrap();
        assert!(!result.atomic_write);
        assert_eq!(fs::read(&path).unwrap(), b"x");
    }

    #[test]
    fn test_save_file_encodes_with_hints() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("styled.txt");
        let format = DetectedFormat {
            encoding: Charset::Utf16Le,
            line_ending: LineEnding::Crlf,
            indent: IndentWidth::TABS,
        };
        let hints: StyleHints = [("insert_final_newline", "true")].into_iter().collect();

        save_file(&path, "a", &format, &hints, &FileSaveConfig::default()).unwrap();
        assert_eq!(fs::read(&path).unwrap(), vec![0xFF, 0xFE, b'a', 0, b'\r', 0, b'\n', 0]);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_preserves_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.sh");
        fs::write(&path, b"#!/bin/sh\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

        write_file_atomic(&path, b"#!/bin/sh\necho hi\n", &FileSaveConfig::default()).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
