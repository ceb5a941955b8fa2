//! Indentation style detection and conversion.

use std::fmt;

/// Width of one indentation level: 0 means tabs, 1..=8 means that many
/// spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndentWidth(u8);

impl IndentWidth {
    pub const TABS: IndentWidth = IndentWidth(0);
    pub const MAX: u8 = 8;

    /// Any width, clamped to `0..=8`.
    pub fn new(width: usize) -> IndentWidth {
        IndentWidth(width.min(Self::MAX as usize) as u8)
    }

    /// A space indentation, clamped to `1..=8`.
    pub fn spaces(width: usize) -> IndentWidth {
        IndentWidth(width.clamp(1, Self::MAX as usize) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn is_tabs(self) -> bool {
        self.0 == 0
    }

    /// The text of one indentation level.
    pub fn unit(self) -> String {
        if self.is_tabs() {
            "\t".to_string()
        } else {
            " ".repeat(self.0 as usize)
        }
    }
}

impl Default for IndentWidth {
    fn default() -> Self {
        IndentWidth::TABS
    }
}

impl fmt::Display for IndentWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_tabs() {
            write!(f, "tabs")
        } else {
            write!(f, "{} spaces", self.0)
        }
    }
}

/// Detect the indentation style of a buffer.
///
/// Only lines with visible content count. A single tab-indented line makes
/// the buffer tab-indented; otherwise the most frequent leading-space run
/// wins, the narrower width on ties. No indented line yields `default`.
pub fn detect_indent(bytes: &[u8], default: IndentWidth) -> IndentWidth {
    let mut histogram = [0usize; 256];
    let mut evidence = false;

    for line in bytes.split(|&b| b == b'\n' || b == b'\r') {
        let Some(content_start) = line.iter().position(|&b| b != b' ' && b != b'\t') else {
            continue;
        };
        if content_start == 0 {
            continue;
        }
        if line[0] == b'\t' {
            return IndentWidth::TABS;
        }

        let spaces = line.iter().take_while(|&&b| b == b' ').count();
        histogram[spaces.min(histogram.len() - 1)] += 1;
        evidence = true;
    }

    if !evidence {
        return default;
    }

    let mut best = 0;
    for (width, &count) in histogram.iter().enumerate().skip(1) {
        if count > histogram[best] {
            best = width;
        }
    }

    IndentWidth::spaces(best)
}

/// [`detect_indent`] over already decoded text.
pub fn detect_indent_in_text(text: &str, default: IndentWidth) -> IndentWidth {
    detect_indent(text.as_bytes(), default)
}

/// Rewrite the leading indentation of every line from one style to another.
///
/// Leading whole units of `from` become units of `to`; leftover spaces that
/// do not form a full unit are kept as they are.
pub fn reindent(text: &str, from: IndentWidth, to: IndentWidth) -> String {
    if from == to {
        return text.to_string();
    }

    let from_unit = from.unit();
    let to_unit = to.unit();
    let mut out = String::with_capacity(text.len());

    for line in text.split_inclusive('\n') {
        let mut rest = line;
        let mut levels = 0;
        while let Some(stripped) = rest.strip_prefix(from_unit.as_str()) {
            rest = stripped;
            levels += 1;
        }
        for _ in 0..levels {
            out.push_str(&to_unit);
        }
        out.push_str(rest);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_clamps() {
        assert_eq!(IndentWidth::new(12).get(), 8);
        assert_eq!(IndentWidth::new(0), IndentWidth::TABS);
        assert_eq!(IndentWidth::spaces(0).get(), 1);
        assert_eq!(IndentWidth::spaces(3).get(), 3);
    }

    #[test]
    fn test_detect_tabs() {
        assert_eq!(detect_indent(b"\tfoo\n\tbar\n", IndentWidth::new(4)), IndentWidth::TABS);
    }

    #[test]
    fn test_any_tab_line_means_tabs() {
        let text = b"def f():\n    a\n    b\n\tc\n";
        assert_eq!(detect_indent(text, IndentWidth::new(4)), IndentWidth::TABS);
    }

    #[test]
    fn test_detect_most_common_space_run() {
        let text = b"  foo\n  bar\n    baz\n";
        assert_eq!(detect_indent(text, IndentWidth::TABS), IndentWidth::new(2));
    }

    #[test]
    fn test_detect_ties_prefer_narrower() {
        let text = b"x\n    a\n  b\n";
        assert_eq!(detect_indent(text, IndentWidth::TABS), IndentWidth::new(2));
    }

    #[test]
    fn test_detect_clamps_wide_indent() {
        let text = b"x\n            deep\n            deeper\n";
        assert_eq!(detect_indent(text, IndentWidth::TABS), IndentWidth::new(8));
    }

    #[test]
    fn test_detect_handles_crlf_and_cr() {
        assert_eq!(detect_indent(b"a\r\n   b\r\n   c", IndentWidth::TABS), IndentWidth::new(3));
        assert_eq!(detect_indent(b"a\r   b\r   c", IndentWidth::TABS), IndentWidth::new(3));
    }

    #[test]
    fn test_blank_and_unindented_lines_are_not_evidence() {
        let default = IndentWidth::new(4);
        assert_eq!(detect_indent(b"", default), default);
        assert_eq!(detect_indent(b"a\nb\n  \n\t\n", default), default);
    }

    #[test]
    fn test_reindent_tabs_to_spaces() {
        let text = "fn f() {\n\tif x {\n\t\ty();\n\t}\n}\n";
        let expected = "fn f() {\n    if x {\n        y();\n    }\n}\n";
        assert_eq!(reindent(text, IndentWidth::TABS, IndentWidth::new(4)), expected);
    }

    #[test]
    fn test_reindent_keeps_partial_units() {
        let text = "a\n     b\n";
        assert_eq!(reindent(text, IndentWidth::new(2), IndentWidth::TABS), "a\n\t\t b\n");
    }
}
