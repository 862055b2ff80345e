//! Text decoding for delimited input using chardetng and `encoding_rs`.

use chardetng::EncodingDetector;
use simdutf8::basic::from_utf8;
use std::borrow::Cow;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Check if the given bytes are valid UTF-8.
pub fn is_utf8(data: &[u8]) -> bool {
    from_utf8(data).is_ok()
}

/// How input bytes were turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeInfo {
    /// Name of the source encoding (`"UTF-8"`, `"windows-1251"`, ...).
    pub encoding: &'static str,
    /// Whether a byte order mark was stripped.
    pub had_bom: bool,
}

/// Decode raw file bytes to UTF-8 text.
///
/// UTF-16 byte order marks are honoured first. Valid UTF-8 is borrowed
/// without copying after stripping an optional BOM. Anything else is
/// guessed with chardetng and transcoded.
pub fn decode_text(data: &[u8]) -> (Cow<'_, str>, DecodeInfo) {
    if let Some((encoding, bom_len)) = encoding_rs::Encoding::for_bom(data)
        && encoding != encoding_rs::UTF_8
    {
        let (decoded, _) = encoding.decode_without_bom_handling(&data[bom_len..]);
        return (
            decoded,
            DecodeInfo {
                encoding: encoding.name(),
                had_bom: true,
            },
        );
    }

    let had_bom = data.starts_with(UTF8_BOM);
    let body = if had_bom { &data[UTF8_BOM.len()..] } else { data };

    if let Ok(text) = from_utf8(body) {
        return (
            Cow::Borrowed(text),
            DecodeInfo {
                encoding: encoding_rs::UTF_8.name(),
                had_bom,
            },
        );
    }

    let mut detector = EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _) = encoding.decode_without_bom_handling(body);
    (
        decoded,
        DecodeInfo {
            encoding: encoding.name(),
            had_bom,
        },
    )
}
