//! Documents backed by files: text with a detected on-disk format, or raw
//! bytes for binary files.

use jane_config::Config;
use jane_format::{
    Charset, DetectedFormat, FileError, FileLoadConfig, FileLoadResult, FileSaveConfig,
    FileSaveResult, FileStamp, FormatDetector, IndentWidth, LineEnding, StyleHints, StyleSource,
    apply_style_overrides, decode, encode_with_hints, load_file, read_file, reindent, save_file,
};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Name shown for documents that were never saved
pub const UNTITLED: &str = "Untitled";

#[derive(Debug)]
pub enum DocumentError {
    /// I/O error while reading or writing the file
    Io(io::Error),
    /// File helper refused the operation
    File(FileError),
    /// Opening a binary file as text
    Binary(PathBuf),
    /// Saving a document that has no path yet
    NoPath,
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::Io(err) => write!(f, "I/O error: {}", err),
            DocumentError::File(err) => write!(f, "{}", err),
            DocumentError::Binary(path) => write!(f, "'{}' is a binary file", path.display()),
            DocumentError::NoPath => write!(f, "Document has no file path"),
        }
    }
}

impl std::error::Error for DocumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DocumentError::Io(err) => Some(err),
            DocumentError::File(err) => Some(err),
            DocumentError::Binary(_) | DocumentError::NoPath => None,
        }
    }
}

impl From<io::Error> for DocumentError {
    fn from(err: io::Error) -> Self {
        DocumentError::Io(err)
    }
}

impl From<FileError> for DocumentError {
    fn from(err: FileError) -> Self {
        match err {
            FileError::Io(err) => DocumentError::Io(err),
            other => DocumentError::File(other),
        }
    }
}

pub type DocumentResult<T> = Result<T, DocumentError>;

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// A text document and the format it is stored in.
#[derive(Debug, Clone)]
pub struct TextDocument {
    name: String,
    path: Option<PathBuf>,
    hints: StyleHints,
    format: DetectedFormat,
    detector: FormatDetector,
    text: String,
    autowrap: bool,
    stamp: Option<FileStamp>,
    modified: bool,
    load_config: FileLoadConfig,
    save_config: FileSaveConfig,
}

impl TextDocument {
    /// Empty untitled document in the default format.
    pub fn new(config: &Config) -> Self {
        let detector = FormatDetector::new(config.text.format_defaults());
        Self {
            name: UNTITLED.to_string(),
            path: None,
            hints: StyleHints::new(),
            format: DetectedFormat::from_defaults(detector.defaults()),
            detector,
            text: String::new(),
            autowrap: config.text.autowrap,
            stamp: None,
            modified: false,
            load_config: config.files.load_config(),
            save_config: config.files.save_config(),
        }
    }

    /// Untitled document holding `bytes`, such as data piped on stdin.
    pub fn with_data(config: &Config, bytes: &[u8]) -> Self {
        let mut document = Self::new(config);
        document.set_data(bytes, false);
        document
    }

    /// Open `path` as text; binary files are refused.
    pub fn open(path: &Path, config: &Config, styles: &dyn StyleSource) -> DocumentResult<Self> {
        match DocumentKind::open(path, config, styles)? {
            DocumentKind::Text(document) => Ok(document),
            DocumentKind::Binary(_) => Err(DocumentError::Binary(path.to_path_buf())),
        }
    }

    fn from_loaded(path: &Path, config: &Config, hints: StyleHints, loaded: FileLoadResult) -> Self {
        for warning in &loaded.warnings {
            log::warn!("{}: {}", path.display(), warning);
        }

        let mut document = Self::new(config);
        document.hints = hints;
        document.format = loaded.format;
        document.text = loaded.content;
        document.bind(path, loaded.stamp);
        log::info!("opened {} as {}", path.display(), document.format);
        document
    }

    fn bind(&mut self, path: &Path, stamp: FileStamp) {
        self.stamp = Some(stamp);
        self.name = display_name(path);
        self.path = Some(path.to_path_buf());
    }

    /// Replace the content with `bytes`. A reload keeps the current format;
    /// otherwise the format is detected again.
    pub fn set_data(&mut self, bytes: &[u8], reloading: bool) {
        if !reloading {
            self.format = self.detector.detect(bytes, &self.hints);
        }
        self.text = decode(bytes, &self.format);
        self.modified = false;
    }

    /// Format used for writing: the current one with the charset and line
    /// ending hints applied again.
    fn output_format(&self) -> DetectedFormat {
        let hinted = apply_style_overrides(self.format, &self.hints);
        DetectedFormat {
            encoding: hinted.encoding,
            line_ending: hinted.line_ending,
            indent: self.format.indent,
        }
    }

    /// The content as it would be written to disk.
    pub fn data(&self) -> Vec<u8> {
        encode_with_hints(&self.text, &self.output_format(), &self.hints)
    }

    /// Save to `path`, or to the current path when `None`.
    pub fn save(&mut self, path: Option<&Path>, styles: &dyn StyleSource) -> DocumentResult<FileSaveResult> {
        let target = match path.or(self.path.as_deref()) {
            Some(target) => target.to_path_buf(),
            None => return Err(DocumentError::NoPath),
        };

        self.hints = styles.hints_for(&target);
        self.format = self.output_format();
        let result = save_file(&target, &self.text, &self.format, &self.hints, &self.save_config)?;

        self.bind(&target, FileStamp::from_path(&target)?);
        self.modified = false;
        log::info!("saved {} as {}", target.display(), self.format);
        Ok(result)
    }

    /// Read the file again, keeping the current format.
    pub fn reload(&mut self, styles: &dyn StyleSource) -> DocumentResult<()> {
        let path = self.path.clone().ok_or(DocumentError::NoPath)?;
        let bytes = read_file(&path, &self.load_config)?;
        self.hints = styles.hints_for(&path);
        self.bind(&path, FileStamp::from_path(&path)?);
        self.set_data(&bytes, true);
        Ok(())
    }

    /// Whether the file changed on disk since it was last read or written.
    pub fn is_concurrently_modified(&self) -> bool {
        match (&self.stamp, &self.path) {
            (Some(stamp), Some(path)) => stamp.is_modified_on_disk(path),
            _ => false,
        }
    }

    pub fn set_encoding(&mut self, encoding: Charset) {
        if self.format.encoding != encoding {
            self.format.encoding = encoding;
            self.modified = true;
        }
    }

    pub fn set_line_ending(&mut self, line_ending: LineEnding) {
        if self.format.line_ending != line_ending {
            self.format.line_ending = line_ending;
            self.modified = true;
        }
    }

    /// Change the indentation (0 = tabs, at most 8 spaces) and convert the
    /// leading indentation of every line.
    pub fn set_indent(&mut self, width: usize) {
        let indent = IndentWidth::new(width);
        if indent == self.format.indent {
            return;
        }
        self.text = reindent(&self.text, self.format.indent, indent);
        self.format.indent = indent;
        self.modified = true;
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.modified = true;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn format(&self) -> &DetectedFormat {
        &self.format
    }

    pub fn hints(&self) -> &StyleHints {
        &self.hints
    }

    pub fn autowrap(&self) -> bool {
        self.autowrap
    }

    pub fn set_autowrap(&mut self, autowrap: bool) {
        self.autowrap = autowrap;
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }
}

/// A file shown as raw bytes.
#[derive(Debug, Clone)]
pub struct BinaryDocument {
    name: String,
    path: PathBuf,
    bytes: Vec<u8>,
    stamp: FileStamp,
}

impl BinaryDocument {
    fn from_loaded(path: &Path, loaded: FileLoadResult) -> Self {
        log::info!("opened {} as binary", path.display());
        Self {
            name: display_name(path),
            path: path.to_path_buf(),
            bytes: loaded.bytes,
            stamp: loaded.stamp,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.bytes
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_concurrently_modified(&self) -> bool {
        self.stamp.is_modified_on_disk(&self.path)
    }
}

/// A document of either kind, chosen from the file content.
#[derive(Debug, Clone)]
pub enum DocumentKind {
    Text(TextDocument),
    Binary(BinaryDocument),
}

impl DocumentKind {
    pub fn open(path: &Path, config: &Config, styles: &dyn StyleSource) -> DocumentResult<Self> {
        let hints = styles.hints_for(path);
        let detector = FormatDetector::new(config.text.format_defaults());
        let loaded = load_file(path, &hints, &detector, &config.files.load_config())?;

        if loaded.binary {
            return Ok(DocumentKind::Binary(BinaryDocument::from_loaded(path, loaded)));
        }
        Ok(DocumentKind::Text(TextDocument::from_loaded(path, config, hints, loaded)))
    }

    pub fn name(&self) -> &str {
        match self {
            DocumentKind::Text(doc) => doc.name(),
            DocumentKind::Binary(doc) => doc.name(),
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, DocumentKind::Binary(_))
    }
}
