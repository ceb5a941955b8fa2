//! File loading with format detection and binary guards.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::identity::FileStamp;
use crate::format::{DetectedFormat, FormatDetector, decode};
use crate::hints::StyleHints;
use crate::{FileError, FileResult};

/// Configuration for file loading operations
#[derive(Debug, Clone)]
pub struct FileLoadConfig {
    /// Files larger than this are refused (default: 100MB)
    pub max_file_size: u64,
    /// Leading bytes inspected by the binary guard (default: 8KB)
    pub binary_sample_size: usize,
}

impl Default for FileLoadConfig {
    fn default() -> Self {
        FileLoadConfig {
            max_file_size: 100 * 1024 * 1024,
            binary_sample_size: 8 * 1024,
        }
    }
}

/// Result of a file loading operation
#[derive(Debug)]
pub struct FileLoadResult {
    /// The loaded content (normalized to `\n`); empty for binary files
    pub content: String,
    /// Undecoded bytes of binary files; empty for text files
    pub bytes: Vec<u8>,
    /// Format detected from content and hints
    pub format: DetectedFormat,
    /// Stamp taken right after reading
    pub stamp: FileStamp,
    /// Whether the content looked binary and was left undecoded
    pub binary: bool,
    /// Warning messages (if any)
    pub warnings: Vec<String>,
}

/// Read a whole file into memory, refusing files over the size limit.
pub fn read_file<P: AsRef<Path>>(path: P, config: &FileLoadConfig) -> FileResult<Vec<u8>> {
    let path = path.as_ref();
    let mut file = File::open(path)?;

    let size = file.metadata()?.len();
    if size > config.max_file_size {
        return Err(FileError::FileTooLarge { size, limit: config.max_file_size });
    }

    let mut content = Vec::with_capacity(size as usize);
    file.read_to_end(&mut content)?;
    log::debug!("read {} bytes from {}", content.len(), path.display());
    Ok(content)
}

/// Load a text file: read, detect its format, decode.
pub fn load_file<P: AsRef<Path>>(
    path: P,
    hints: &StyleHints,
    detector: &FormatDetector,
    config: &FileLoadConfig,
) -> FileResult<FileLoadResult> {
    let path = path.as_ref();
    let bytes = read_file(path, config)?;
    let stamp = FileStamp::from_path(path)?;

    let sample = &bytes[..bytes.len().min(config.binary_sample_size)];
    if is_binary_content(sample) {
        return Ok(FileLoadResult {
            content: String::new(),
            bytes,
            format: DetectedFormat::from_defaults(detector.defaults()),
            stamp,
            binary: true,
            warnings: vec!["Binary file detected, content not decoded".to_string()],
        });
    }

    let format = detector.detect(&bytes, hints);
    let content = decode(&bytes, &format);

    let mut warnings = Vec::new();
    if content.contains('\u{fffd}') {
        warnings.push(format!(
            "Some bytes are not valid {} and were replaced",
            format.encoding
        ));
    }

    Ok(FileLoadResult { content, bytes: Vec::new(), format, stamp, binary: false, warnings })
}

/// Check if content appears to be binary based on null bytes and control characters.
///
/// UTF-16 text is full of null bytes, so buffers carrying a UTF-16 BOM or
/// byte pattern are never binary.
pub fn is_binary_content(sample: &[u8]) -> bool {
    if sample.len() < 512 {
        return false; // Too small to determine
    }

    let bom = crate::bom::detect_bom(sample);
    if bom.charset.is_some() || crate::encoding::detect_utf16_pattern(sample).is_some() {
        return false;
    }

    let mut null_count = 0;
    let mut control_count = 0;

    for &byte in sample {
        if byte == 0 {
            null_count += 1;
        } else if byte < 32 && !matches!(byte, 9 | 10 | 12 | 13 | 27) {
            control_count += 1;
        }
    }

    let null_ratio = null_count as f64 / sample.len() as f64;
    let control_ratio = control_count as f64 / sample.len() as f64;

    // Binary if >10% null bytes or >30% control characters
    null_ratio > 0.1 || control_ratio > 0.3
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::Charset;
    use crate::eol::LineEnding;

    fn write_temp(dir: &tempfile::TempDir, name: &str, content: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_utf8_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "a.txt", "Hello, UTF-8! \u{e9}\nSecond line".as_bytes());

        let result = load_file(&path, &StyleHints::new(), &FormatDetector::default(), &FileLoadConfig::default()).unwrap();
        assert_eq!(result.content, "Hello, UTF-8! \u{e9}\nSecond line");
        assert_eq!(result.format.encoding, Charset::Utf8);
        assert_eq!(result.format.line_ending, LineEnding::Lf);
        assert!(!result.binary);
        assert!(result.bytes.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_load_crlf_file_with_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "b.txt", b"\xEF\xBB\xBFLine1\r\nLine2\r\n");

        let result = load_file(&path, &StyleHints::new(), &FormatDetector::default(), &FileLoadConfig::default()).unwrap();
        assert_eq!(result.content, "Line1\nLine2\n");
        assert_eq!(result.format.encoding, Charset::Utf8Sig);
        assert_eq!(result.format.line_ending, LineEnding::Crlf);
    }

    #[test]
    fn test_load_binary_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "c.bin", &[0u8; 1024]);

        let result = load_file(&path, &StyleHints::new(), &FormatDetector::default(), &FileLoadConfig::default()).unwrap();
        assert!(result.binary);
        assert!(result.content.is_empty());
        assert_eq!(result.bytes.len(), 1024);
        assert!(result.warnings.iter().any(|w| w.contains("Binary file")));
    }

    #[test]
    fn test_load_refuses_large_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "d.txt", &[b'x'; 64]);
        let config = FileLoadConfig { max_file_size: 16, ..FileLoadConfig::default() };

        let err = read_file(&path, &config).unwrap_err();
        assert!(matches!(err, FileError::FileTooLarge { size: 64, limit: 16 }));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_file(dir.path().join("missing"), &FileLoadConfig::default()).unwrap_err();
        assert!(matches!(err, FileError::Io(_)));
    }

    #[test]
    fn test_is_binary_content() {
        assert!(!is_binary_content(b"Hello, world! This is text."));
        assert!(is_binary_content(&[0u8; 600]));

        let control_content = (0..600).map(|i| (i % 32) as u8).collect::<Vec<_>>();
        assert!(is_binary_content(&control_content));

        let mut utf16 = vec![0xFF, 0xFE];
        for _ in 0..300 {
            utf16.extend_from_slice(&[b'a', 0]);
        }
        assert!(!is_binary_content(&utf16));
    }
}
