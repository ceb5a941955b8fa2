use std::fmt;

pub mod codec;
pub mod utf16;

pub use codec::{decode_lossy, encode_lossy};
pub use utf16::detect_utf16_pattern;

use crate::bom::detect_bom;
use crate::format::FormatDefaults;

/// Character set of a text file.
///
/// Every value is decodable and encodable: a `Charset` can only be obtained
/// from a label through [`Charset::resolve`] or from a known encoding, so a
/// document never carries a name the codec does not understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Charset {
    Utf8,
    /// UTF-8 with a leading byte order mark
    Utf8Sig,
    Utf16Le,
    Utf16Be,
    /// Any other ASCII-compatible or CJK encoding known to `encoding_rs`
    Legacy(&'static encoding_rs::Encoding),
}

/// Aliases accepted on top of the WHATWG label set.
const ALIASES: &[(&str, &str)] = &[
    ("utf8", "utf-8"),
    ("utf-8-sig", "utf-8-sig"),
    ("utf8-sig", "utf-8-sig"),
    ("utf-8-bom", "utf-8-sig"),
    ("utf8-bom", "utf-8-sig"),
    ("utf-16", "utf-16-le"),
    ("utf16", "utf-16-le"),
    ("unicode", "utf-16-le"),
    ("utf-16-le", "utf-16-le"),
    ("utf-16le", "utf-16-le"),
    ("utf16le", "utf-16-le"),
    ("utf16-le", "utf-16-le"),
    ("utf-16-be", "utf-16-be"),
    ("utf-16be", "utf-16-be"),
    ("utf16be", "utf-16-be"),
    ("utf16-be", "utf-16-be"),
    ("latin-1", "latin1"),
    ("cp932", "shift_jis"),
    ("sjis", "shift_jis"),
    ("cp936", "gbk"),
    ("cp949", "euc-kr"),
    ("cp950", "big5"),
    ("ascii", "windows-1252"),
    ("us-ascii", "windows-1252"),
];

impl Charset {
    /// Resolve a user or configuration supplied label to a charset.
    ///
    /// Matching is case-insensitive and tolerates `_` in place of `-`.
    /// Returns `None` for labels nothing maps to, and for the WHATWG
    /// replacement encoding which cannot round-trip any content.
    pub fn resolve(label: &str) -> Option<Charset> {
        let lowered = label.trim().to_ascii_lowercase();
        if lowered.is_empty() {
            return None;
        }
        let dashed = lowered.replace('_', "-");

        for candidate in [lowered.as_str(), dashed.as_str()] {
            let target = ALIASES
                .iter()
                .find(|(alias, _)| *alias == candidate)
                .map_or(candidate, |(_, target)| *target);

            match target {
                "utf-8" => return Some(Charset::Utf8),
                "utf-8-sig" => return Some(Charset::Utf8Sig),
                "utf-16-le" => return Some(Charset::Utf16Le),
                "utf-16-be" => return Some(Charset::Utf16Be),
                _ => {}
            }

            if let Some(encoding) = encoding_rs::Encoding::for_label(target.as_bytes()) {
                return Charset::from_encoding(encoding);
            }
        }

        None
    }

    /// Wrap an `encoding_rs` encoding, mapping the Unicode ones onto their
    /// dedicated variants.
    pub fn from_encoding(encoding: &'static encoding_rs::Encoding) -> Option<Charset> {
        if encoding == encoding_rs::UTF_8 {
            Some(Charset::Utf8)
        } else if encoding == encoding_rs::UTF_16LE {
            Some(Charset::Utf16Le)
        } else if encoding == encoding_rs::UTF_16BE {
            Some(Charset::Utf16Be)
        } else if encoding == encoding_rs::REPLACEMENT {
            None
        } else {
            Some(Charset::Legacy(encoding))
        }
    }

    /// Canonical name of the charset.
    pub fn name(self) -> &'static str {
        match self {
            Charset::Utf8 => "utf-8",
            Charset::Utf8Sig => "utf-8-sig",
            Charset::Utf16Le => "utf-16-le",
            Charset::Utf16Be => "utf-16-be",
            Charset::Legacy(encoding) => encoding.name(),
        }
    }

    /// The `encoding_rs` encoding used to decode this charset.
    pub fn encoding(self) -> &'static encoding_rs::Encoding {
        match self {
            Charset::Utf8 | Charset::Utf8Sig => encoding_rs::UTF_8,
            Charset::Utf16Le => encoding_rs::UTF_16LE,
            Charset::Utf16Be => encoding_rs::UTF_16BE,
            Charset::Legacy(encoding) => encoding,
        }
    }

    /// Whether ASCII bytes mean the same thing in this charset, which lets
    /// byte-level scans for line terminators and indentation run on the raw
    /// buffer.
    pub fn is_ascii_compatible(self) -> bool {
        match self {
            Charset::Utf16Le | Charset::Utf16Be => false,
            Charset::Utf8 | Charset::Utf8Sig => true,
            Charset::Legacy(encoding) => encoding.is_ascii_compatible(),
        }
    }

    /// Charsets offered when the user picks an encoding by hand.
    pub fn common() -> Vec<Charset> {
        let legacy = [
            encoding_rs::WINDOWS_1252,
            encoding_rs::ISO_8859_15,
            encoding_rs::WINDOWS_1250,
            encoding_rs::ISO_8859_2,
            encoding_rs::WINDOWS_1251,
            encoding_rs::KOI8_R,
            encoding_rs::WINDOWS_1253,
            encoding_rs::WINDOWS_1254,
            encoding_rs::WINDOWS_1255,
            encoding_rs::WINDOWS_1256,
            encoding_rs::WINDOWS_874,
            encoding_rs::SHIFT_JIS,
            encoding_rs::EUC_JP,
            encoding_rs::GBK,
            encoding_rs::GB18030,
            encoding_rs::BIG5,
            encoding_rs::EUC_KR,
        ];

        let mut charsets = vec![Charset::Utf8, Charset::Utf8Sig, Charset::Utf16Le, Charset::Utf16Be];
        charsets.extend(legacy.into_iter().map(Charset::Legacy));
        charsets
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Detect the charset of a buffer.
///
/// Strategy:
/// 1) BOM detection
/// 2) Heuristics (UTF-16 byte pattern, ASCII, UTF-8 validity)
/// 3) Legacy encoding for anything else
pub fn detect_encoding(bytes: &[u8], defaults: &FormatDefaults) -> Charset {
    let bom = detect_bom(bytes);
    if let Some(charset) = bom.charset {
        return charset;
    }

    detect_encoding_heuristic(bytes, defaults)
}

/// Detect the charset of a buffer that carries no BOM.
pub fn detect_encoding_heuristic(bytes: &[u8], defaults: &FormatDefaults) -> Charset {
    if bytes.is_empty() {
        return defaults.encoding;
    }

    if let Some(charset) = detect_utf16_pattern(bytes) {
        return charset;
    }

    if encoding_rs::Encoding::ascii_valid_up_to(bytes) == bytes.len() {
        // Pure ASCII carries no signal; keep the preferred encoding when it
        // can represent the bytes as they are.
        return if defaults.encoding.is_ascii_compatible() {
            defaults.encoding
        } else {
            Charset::Utf8
        };
    }

    if encoding_rs::Encoding::utf8_valid_up_to(bytes) == bytes.len() {
        return Charset::Utf8;
    }

    log::debug!(
        "buffer is not valid UTF-8, falling back to {}",
        defaults.legacy_encoding
    );
    defaults.legacy_encoding
}
