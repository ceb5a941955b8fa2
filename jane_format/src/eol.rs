//! End-of-line detection and normalization utilities.

use std::borrow::Cow;
use std::fmt;

/// On-disk line terminator convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineEnding {
    /// Carriage Return + Line Feed (Windows) - \r\n
    Crlf,
    /// Line Feed (Unix/Linux/macOS) - \n
    Lf,
    /// Carriage Return (old macOS) - \r
    Cr,
}

/// The in-memory line terminator.
pub const CANONICAL: &str = "\n";

impl LineEnding {
    /// Menu order used by settings that store the line ending as an index.
    pub const ALL: [LineEnding; 3] = [LineEnding::Crlf, LineEnding::Lf, LineEnding::Cr];

    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Crlf => "\r\n",
            LineEnding::Lf => "\n",
            LineEnding::Cr => "\r",
        }
    }

    /// Name used by style configuration files (`end_of_line`).
    pub fn name(self) -> &'static str {
        match self {
            LineEnding::Crlf => "crlf",
            LineEnding::Lf => "lf",
            LineEnding::Cr => "cr",
        }
    }

    /// Look up an `end_of_line` style value. Unknown values yield `None`.
    pub fn from_name(name: &str) -> Option<LineEnding> {
        match name.trim().to_ascii_lowercase().as_str() {
            "crlf" => Some(LineEnding::Crlf),
            "lf" => Some(LineEnding::Lf),
            "cr" => Some(LineEnding::Cr),
            _ => None,
        }
    }

    pub fn from_index(index: usize) -> Option<LineEnding> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        match self {
            LineEnding::Crlf => 0,
            LineEnding::Lf => 1,
            LineEnding::Cr => 2,
        }
    }

    /// The platform's conventional line ending.
    pub fn native() -> LineEnding {
        if cfg!(windows) { LineEnding::Crlf } else { LineEnding::Lf }
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name().to_ascii_uppercase())
    }
}

/// Detect the line ending from the first terminator in the buffer.
///
/// `\r\n` counts as CRLF rather than a CR followed by an LF. Buffers without
/// any terminator report `default`.
pub fn detect_line_ending(bytes: &[u8], default: LineEnding) -> LineEnding {
    let Some(pos) = bytes.iter().position(|&b| b == b'\r' || b == b'\n') else {
        return default;
    };

    match bytes[pos] {
        b'\n' => LineEnding::Lf,
        _ if bytes.get(pos + 1) == Some(&b'\n') => LineEnding::Crlf,
        _ => LineEnding::Cr,
    }
}

/// [`detect_line_ending`] over already decoded text.
pub fn detect_line_ending_in_text(text: &str, default: LineEnding) -> LineEnding {
    detect_line_ending(text.as_bytes(), default)
}

/// Replace every `line_ending` sequence with the canonical terminator.
pub fn normalize_eol(text: &str, line_ending: LineEnding) -> Cow<'_, str> {
    if line_ending == LineEnding::Lf || !text.contains(line_ending.as_str()) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace(line_ending.as_str(), CANONICAL))
}

/// Replace every canonical terminator with `line_ending`.
pub fn restore_eol(text: &str, line_ending: LineEnding) -> Cow<'_, str> {
    if line_ending == LineEnding::Lf || !text.contains(CANONICAL) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace(CANONICAL, line_ending.as_str()))
}
