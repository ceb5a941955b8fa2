use super::Charset;

/// Number of leading bytes inspected by the BOM-less UTF-16 heuristic.
const PATTERN_SAMPLE_SIZE: usize = 4096;

/// Detect BOM-less UTF-16 based on characteristic null/data positions.
///
/// ASCII text encoded as UTF-16 has a zero in every other byte; which half
/// carries the zeros gives the byte order.
pub fn detect_utf16_pattern(bytes: &[u8]) -> Option<Charset> {
    let sample = &bytes[..bytes.len().min(PATTERN_SAMPLE_SIZE)];
    if sample.len() < 32 {
        return None;
    }

    let mut even_null = 0usize;
    let mut odd_null = 0usize;
    let mut even_ascii = 0usize;
    let mut odd_ascii = 0usize;

    for (i, &b) in sample.iter().enumerate() {
        let printable = (32..=126).contains(&b) || matches!(b, b'\t' | b'\n' | b'\r');
        if i % 2 == 0 {
            if b == 0 {
                even_null += 1;
            } else if printable {
                even_ascii += 1;
            }
        } else if b == 0 {
            odd_null += 1;
        } else if printable {
            odd_ascii += 1;
        }
    }

    let half = (sample.len() / 2) as f64;
    let even_null_ratio = even_null as f64 / half;
    let odd_null_ratio = odd_null as f64 / half;
    let even_ascii_ratio = even_ascii as f64 / half;
    let odd_ascii_ratio = odd_ascii as f64 / half;

    if odd_null_ratio > 0.85 && even_ascii_ratio > 0.4 {
        return Some(Charset::Utf16Le);
    }
    if even_null_ratio > 0.85 && odd_ascii_ratio > 0.4 {
        return Some(Charset::Utf16Be);
    }
    None
}

/// Encode text as UTF-16 code units in the requested byte order.
pub fn encode_utf16(text: &str, big_endian: bool, out: &mut Vec<u8>) {
    out.reserve(text.len() * 2);
    for unit in text.encode_utf16() {
        let bytes = if big_endian { unit.to_be_bytes() } else { unit.to_le_bytes() };
        out.extend_from_slice(&bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16(text: &str, big_endian: bool) -> Vec<u8> {
        let mut out = Vec::new();
        encode_utf16(text, big_endian, &mut out);
        out
    }

    #[test]
    fn test_detect_little_endian_pattern() {
        let bytes = utf16("fn main() {\n    println!(\"hi\");\n}\n", false);
        assert_eq!(detect_utf16_pattern(&bytes), Some(Charset::Utf16Le));
    }

    #[test]
    fn test_detect_big_endian_pattern() {
        let bytes = utf16("fn main() {\n    println!(\"hi\");\n}\n", true);
        assert_eq!(detect_utf16_pattern(&bytes), Some(Charset::Utf16Be));
    }

    #[test]
    fn test_short_or_plain_buffers_are_ignored() {
        assert_eq!(detect_utf16_pattern(&utf16("short", false)), None);
        assert_eq!(
            detect_utf16_pattern(b"a perfectly ordinary line of ascii text here"),
            None
        );
    }

    #[test]
    fn test_encode_utf16_surrogates() {
        assert_eq!(utf16("\u{1F600}", false), vec![0x3D, 0xD8, 0x00, 0xDE]);
        assert_eq!(utf16("A", true), vec![0x00, 0x41]);
    }
}
