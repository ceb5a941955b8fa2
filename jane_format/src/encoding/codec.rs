//! Lossy conversion between raw bytes and in-memory text.

use encoding_rs::EncoderResult;

use super::Charset;
use super::utf16::encode_utf16;
use crate::bom::{bom_bytes, detect_bom};

/// Byte written in place of a character the target charset cannot represent.
pub const REPLACEMENT_BYTE: u8 = b'?';

/// Decode `bytes` as `charset`, substituting U+FFFD for malformed sequences.
///
/// A BOM is stripped only when it matches a BOM-carrying charset, so that
/// plain `utf-8` content starting with U+FEFF survives untouched.
pub fn decode_lossy(bytes: &[u8], charset: Charset) -> String {
    let bom = detect_bom(bytes);
    let body = if bom.charset == Some(charset) {
        &bytes[bom.bom_length..]
    } else {
        bytes
    };

    let (text, had_errors) = charset.encoding().decode_without_bom_handling(body);
    if had_errors {
        log::debug!("malformed {} sequences replaced while decoding", charset);
    }
    text.into_owned()
}

/// Encode `text` as `charset`, writing [`REPLACEMENT_BYTE`] for unmappable
/// characters. BOM-carrying charsets get their BOM in front.
pub fn encode_lossy(text: &str, charset: Charset) -> Vec<u8> {
    let mut out = bom_bytes(charset).to_vec();

    match charset {
        Charset::Utf8 | Charset::Utf8Sig => out.extend_from_slice(text.as_bytes()),
        Charset::Utf16Le => encode_utf16(text, false, &mut out),
        Charset::Utf16Be => encode_utf16(text, true, &mut out),
        Charset::Legacy(encoding) => match Charset::from_encoding(encoding) {
            Some(Charset::Legacy(encoding)) => encode_legacy(text, encoding, &mut out),
            Some(unicode) => out.extend(encode_lossy(text, unicode)),
            None => out.extend_from_slice(text.as_bytes()),
        },
    }

    out
}

fn encode_legacy(text: &str, encoding: &'static encoding_rs::Encoding, out: &mut Vec<u8>) {
    let mut encoder = encoding.new_encoder();
    let mut buffer = vec![0u8; 8 * 1024];
    let mut remaining = text;
    let mut unmappable = 0usize;

    loop {
        let (result, read, written) =
            encoder.encode_from_utf8_without_replacement(remaining, &mut buffer, true);
        out.extend_from_slice(&buffer[..written]);
        remaining = &remaining[read..];

        match result {
            EncoderResult::InputEmpty => break,
            EncoderResult::OutputFull => continue,
            EncoderResult::Unmappable(_) => {
                unmappable += 1;
                out.push(REPLACEMENT_BYTE);
            }
        }
    }

    if unmappable > 0 {
        log::warn!(
            "{} characters not representable in {} were replaced",
            unmappable,
            encoding.name()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn windows_1252() -> Charset {
        Charset::Legacy(encoding_rs::WINDOWS_1252)
    }

    #[test]
    fn test_decode_utf8_sig_strips_bom() {
        assert_eq!(decode_lossy(b"\xEF\xBB\xBFhello", Charset::Utf8Sig), "hello");
        assert_eq!(decode_lossy(b"hello", Charset::Utf8Sig), "hello");
    }

    #[test]
    fn test_decode_plain_utf8_keeps_bom_character() {
        assert_eq!(decode_lossy(b"\xEF\xBB\xBFhi", Charset::Utf8), "\u{feff}hi");
    }

    #[test]
    fn test_decode_replaces_malformed_sequences() {
        assert_eq!(decode_lossy(b"a\xFFb", Charset::Utf8), "a\u{fffd}b");
        assert_eq!(decode_lossy(&[0xFF, 0xFE, b'a', 0, b'b'], Charset::Utf16Le), "a\u{fffd}");
    }

    #[test]
    fn test_decode_legacy() {
        assert_eq!(decode_lossy(b"caf\xe9 \x80", windows_1252()), "caf\u{e9} \u{20ac}");
    }

    #[test]
    fn test_encode_writes_bom() {
        assert_eq!(encode_lossy("a", Charset::Utf8Sig), b"\xEF\xBB\xBFa");
        assert_eq!(encode_lossy("a", Charset::Utf16Le), vec![0xFF, 0xFE, b'a', 0]);
        assert_eq!(encode_lossy("a", Charset::Utf16Be), vec![0xFE, 0xFF, 0, b'a']);
        assert_eq!(encode_lossy("a", Charset::Utf8), b"a");
    }

    #[test]
    fn test_encode_legacy_replaces_unmappable() {
        assert_eq!(encode_lossy("caf\u{e9}", windows_1252()), b"caf\xe9");
        assert_eq!(encode_lossy("\u{3042}x\u{1F600}", windows_1252()), b"?x?");
    }

    #[test]
    fn test_encode_legacy_large_input_spans_buffers() {
        let text = "\u{e9}".repeat(20_000);
        let encoded = encode_lossy(&text, windows_1252());
        assert_eq!(encoded.len(), 20_000);
        assert!(encoded.iter().all(|&b| b == 0xE9));
    }

    #[test]
    fn test_multibyte_round_trip() {
        let shift_jis = Charset::Legacy(encoding_rs::SHIFT_JIS);
        let text = "\u{65e5}\u{672c}\u{8a9e} text";
        assert_eq!(decode_lossy(&encode_lossy(text, shift_jis), shift_jis), text);
    }
}
