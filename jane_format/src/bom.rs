use crate::encoding::Charset;

/// Result of BOM detection containing the detected charset and BOM length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BomDetectionResult {
    pub charset: Option<Charset>,
    pub bom_length: usize,
}

impl BomDetectionResult {
    const NONE: BomDetectionResult = BomDetectionResult { charset: None, bom_length: 0 };
}

/// Detect a Byte Order Mark (BOM) at the start of the given byte slice.
pub fn detect_bom(bytes: &[u8]) -> BomDetectionResult {
    if bytes.len() < 2 {
        return BomDetectionResult::NONE;
    }

    if bytes.len() >= 3 && bytes[0] == 0xEF && bytes[1] == 0xBB && bytes[2] == 0xBF {
        return BomDetectionResult { charset: Some(Charset::Utf8Sig), bom_length: 3 };
    }
    if bytes[0] == 0xFF && bytes[1] == 0xFE {
        return BomDetectionResult { charset: Some(Charset::Utf16Le), bom_length: 2 };
    }
    if bytes[0] == 0xFE && bytes[1] == 0xFF {
        return BomDetectionResult { charset: Some(Charset::Utf16Be), bom_length: 2 };
    }

    BomDetectionResult::NONE
}

/// BOM bytes written in front of content encoded with `charset`.
pub fn bom_bytes(charset: Charset) -> &'static [u8] {
    match charset {
        Charset::Utf8Sig => &[0xEF, 0xBB, 0xBF],
        Charset::Utf16Le => &[0xFF, 0xFE],
        Charset::Utf16Be => &[0xFE, 0xFF],
        Charset::Utf8 | Charset::Legacy(_) => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_utf8_bom() {
        let result = detect_bom(&[0xEF, 0xBB, 0xBF, b'a']);
        assert_eq!(result.charset, Some(Charset::Utf8Sig));
        assert_eq!(result.bom_length, 3);
    }

    #[test]
    fn test_detect_utf16_boms() {
        assert_eq!(detect_bom(&[0xFF, 0xFE, b'a', 0]).charset, Some(Charset::Utf16Le));
        assert_eq!(detect_bom(&[0xFE, 0xFF, 0, b'a']).charset, Some(Charset::Utf16Be));
    }

    #[test]
    fn test_no_bom() {
        assert_eq!(detect_bom(b"plain"), BomDetectionResult::NONE);
        assert_eq!(detect_bom(&[0xEF]), BomDetectionResult::NONE);
        assert_eq!(detect_bom(&[0xEF, 0xBB]), BomDetectionResult::NONE);
    }

    #[test]
    fn test_bom_bytes_match_detection() {
        for charset in [Charset::Utf8Sig, Charset::Utf16Le, Charset::Utf16Be] {
            let result = detect_bom(bom_bytes(charset));
            assert_eq!(result.charset, Some(charset));
            assert_eq!(result.bom_length, bom_bytes(charset).len());
        }
        assert!(bom_bytes(Charset::Utf8).is_empty());
    }
}
