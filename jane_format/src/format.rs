//! Detection pipeline and the reversible bytes <-> text transformation.

use std::fmt;

use crate::encoding::{self, Charset, decode_lossy, encode_lossy};
use crate::eol::{self, CANONICAL, LineEnding, normalize_eol, restore_eol};
use crate::hints::{IndentStyle, StyleHints};
use crate::indent::{self, IndentWidth};

/// Space width used when the hints ask for spaces but give no size and the
/// content itself is tab-indented.
pub const DEFAULT_SPACE_WIDTH: usize = 4;

/// Fallback values used when a buffer carries no signal of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDefaults {
    /// Encoding for files without any encoding signal
    pub encoding: Charset,
    /// Encoding for files that are not valid UTF-8
    pub legacy_encoding: Charset,
    /// Line ending for files without any terminator
    pub line_ending: LineEnding,
    /// Indentation for files without indented lines
    pub indent: IndentWidth,
}

impl Default for FormatDefaults {
    fn default() -> Self {
        FormatDefaults {
            encoding: Charset::Utf8,
            legacy_encoding: Charset::Legacy(encoding_rs::WINDOWS_1252),
            line_ending: LineEnding::native(),
            indent: IndentWidth::TABS,
        }
    }
}

/// On-disk format of a text document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedFormat {
    pub encoding: Charset,
    pub line_ending: LineEnding,
    pub indent: IndentWidth,
}

impl DetectedFormat {
    /// Format of a brand new document.
    pub fn from_defaults(defaults: &FormatDefaults) -> Self {
        DetectedFormat {
            encoding: defaults.encoding,
            line_ending: defaults.line_ending,
            indent: defaults.indent,
        }
    }
}

impl fmt::Display for DetectedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.encoding, self.line_ending, self.indent)
    }
}

/// Format detection bound to a set of defaults.
///
/// Holds no state besides the defaults; every method is a pure function of
/// its arguments and may be called from any thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatDetector {
    defaults: FormatDefaults,
}

impl FormatDetector {
    pub fn new(defaults: FormatDefaults) -> Self {
        FormatDetector { defaults }
    }

    pub fn defaults(&self) -> &FormatDefaults {
        &self.defaults
    }

    pub fn detect_encoding(&self, bytes: &[u8]) -> Charset {
        encoding::detect_encoding(bytes, &self.defaults)
    }

    pub fn detect_line_ending(&self, bytes: &[u8]) -> LineEnding {
        eol::detect_line_ending(bytes, self.defaults.line_ending)
    }

    pub fn detect_indent(&self, bytes: &[u8]) -> IndentWidth {
        indent::detect_indent(bytes, self.defaults.indent)
    }

    /// Detect the format of `bytes` from content alone.
    pub fn detect_content(&self, bytes: &[u8]) -> DetectedFormat {
        self.detect_with_encoding(bytes, self.detect_encoding(bytes))
    }

    /// Scan line ending and indentation of `bytes` stored in `encoding`.
    ///
    /// Charsets that are not ASCII-compatible are decoded first so the
    /// terminator and indentation scans see characters, not code units.
    pub fn detect_with_encoding(&self, bytes: &[u8], encoding: Charset) -> DetectedFormat {
        let (line_ending, indent) = if encoding.is_ascii_compatible() {
            (self.detect_line_ending(bytes), self.detect_indent(bytes))
        } else {
            let text = decode_lossy(bytes, encoding);
            (
                eol::detect_line_ending_in_text(&text, self.defaults.line_ending),
                indent::detect_indent_in_text(&text, self.defaults.indent),
            )
        };

        DetectedFormat { encoding, line_ending, indent }
    }

    /// Detect the format of `bytes`, letting `hints` override detection.
    ///
    /// A `charset` hint is settled before scanning, so the terminator and
    /// indentation scans read the buffer in the encoding it will be decoded
    /// with.
    pub fn detect(&self, bytes: &[u8], hints: &StyleHints) -> DetectedFormat {
        let encoding = charset_override(hints).unwrap_or_else(|| self.detect_encoding(bytes));
        let detected = self.detect_with_encoding(bytes, encoding);

        let format = DetectedFormat {
            encoding,
            line_ending: line_ending_override(hints).unwrap_or(detected.line_ending),
            indent: indent_override(detected.indent, hints),
        };
        log::debug!("detected {} (content said {})", format, detected);
        format
    }

    pub fn decode(&self, bytes: &[u8], format: &DetectedFormat) -> String {
        decode(bytes, format)
    }

    pub fn encode(
        &self,
        text: &str,
        format: &DetectedFormat,
        trim_trailing_whitespace: bool,
        insert_final_newline: bool,
    ) -> Vec<u8> {
        encode(text, format, trim_trailing_whitespace, insert_final_newline)
    }
}

/// Apply explicit style hints on top of a detected format, field by field.
///
/// Unrecognized hint values are ignored and the detected value is kept.
pub fn apply_style_overrides(detected: DetectedFormat, hints: &StyleHints) -> DetectedFormat {
    DetectedFormat {
        encoding: charset_override(hints).unwrap_or(detected.encoding),
        line_ending: line_ending_override(hints).unwrap_or(detected.line_ending),
        indent: indent_override(detected.indent, hints),
    }
}

fn charset_override(hints: &StyleHints) -> Option<Charset> {
    let label = hints.charset()?;
    let charset = Charset::resolve(label);
    if charset.is_none() {
        log::warn!("ignoring unknown charset hint '{}'", label);
    }
    charset
}

fn line_ending_override(hints: &StyleHints) -> Option<LineEnding> {
    let name = hints.end_of_line()?;
    let line_ending = LineEnding::from_name(name);
    if line_ending.is_none() {
        log::warn!("ignoring unknown end_of_line hint '{}'", name);
    }
    line_ending
}

fn indent_override(detected: IndentWidth, hints: &StyleHints) -> IndentWidth {
    let style = hints.indent_style();
    if style == Some(IndentStyle::Tab) {
        return IndentWidth::TABS;
    }

    if let Some(size) = hints.indent_size() {
        return IndentWidth::spaces(size);
    }
    if let Some(width) = hints.tab_width() {
        return IndentWidth::spaces(width);
    }

    if style == Some(IndentStyle::Space) && detected.is_tabs() {
        return IndentWidth::spaces(DEFAULT_SPACE_WIDTH);
    }

    detected
}

/// Decode `bytes` to normalized text: lossy charset decoding, then every
/// `format.line_ending` sequence becomes `\n`.
pub fn decode(bytes: &[u8], format: &DetectedFormat) -> String {
    let text = decode_lossy(bytes, format.encoding);
    normalize_eol(&text, format.line_ending).into_owned()
}

/// Encode normalized text back to bytes in `format`.
///
/// Steps run in order: trailing whitespace trimming, final newline, line
/// ending restoration, lossy charset encoding.
pub fn encode(
    text: &str,
    format: &DetectedFormat,
    trim_trailing_whitespace: bool,
    insert_final_newline: bool,
) -> Vec<u8> {
    let mut text = if trim_trailing_whitespace {
        trim_trailing(text)
    } else {
        text.to_string()
    };

    if insert_final_newline && !text.ends_with(CANONICAL) {
        text.push_str(CANONICAL);
    }

    let text = restore_eol(&text, format.line_ending);
    encode_lossy(&text, format.encoding)
}

/// Encode using the trimming and final-newline preferences of `hints`.
pub fn encode_with_hints(text: &str, format: &DetectedFormat, hints: &StyleHints) -> Vec<u8> {
    encode(
        text,
        format,
        hints.trim_trailing_whitespace(),
        hints.insert_final_newline(),
    )
}

fn trim_trailing(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive(CANONICAL) {
        match line.strip_suffix(CANONICAL) {
            Some(body) => {
                out.push_str(body.trim_end());
                out.push_str(CANONICAL);
            }
            None => out.push_str(line.trim_end()),
        }
    }
    out
}
