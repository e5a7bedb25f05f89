//! Input decoding: BOM handling and transcoding to UTF-8 using chardetng and `encoding_rs`.

use std::borrow::Cow;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use simdutf8::basic::from_utf8;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Check if the given bytes are valid UTF-8.
pub fn is_utf8(data: &[u8]) -> bool {
    from_utf8(data).is_ok()
}

/// Check if the data starts with a UTF-8 BOM.
pub fn has_utf8_bom(data: &[u8]) -> bool {
    data.starts_with(&UTF8_BOM)
}

/// Skip the UTF-8 BOM if present and return the remaining data.
pub fn skip_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(&UTF8_BOM).unwrap_or(data)
}

/// How the raw bytes of a dataset were decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingInfo {
    /// Whether a UTF-8 BOM was present and stripped.
    pub had_bom: bool,
    /// Source encoding name when the data had to be transcoded.
    pub transcoded_from: Option<&'static str>,
}

impl EncodingInfo {
    /// True if the input was already UTF-8.
    pub fn was_utf8(&self) -> bool {
        self.transcoded_from.is_none()
    }
}

/// Decode raw dataset bytes into UTF-8.
///
/// UTF-16 is recognised by its BOM, UTF-8 is passed through without a copy,
/// and anything else is guessed with chardetng and transcoded.
pub fn decode_to_utf8(data: &[u8]) -> (Cow<'_, [u8]>, EncodingInfo) {
    if data.starts_with(&[0xFF, 0xFE]) {
        return transcode(data, encoding_rs::UTF_16LE);
    }
    if data.starts_with(&[0xFE, 0xFF]) {
        return transcode(data, encoding_rs::UTF_16BE);
    }

    let had_bom = has_utf8_bom(data);
    let body = skip_bom(data);

    if is_utf8(body) {
        let info = EncodingInfo {
            had_bom,
            transcoded_from: None,
        };
        return (Cow::Borrowed(body), info);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);

    if encoding == encoding_rs::UTF_8 {
        // Mostly UTF-8 with a few bad bytes; let the CSV reader report them.
        let info = EncodingInfo {
            had_bom,
            transcoded_from: None,
        };
        return (Cow::Borrowed(body), info);
    }

    transcode(body, encoding)
}

fn transcode(data: &[u8], encoding: &'static Encoding) -> (Cow<'static, [u8]>, EncodingInfo) {
    // `decode` sniffs and strips any BOM itself.
    let (decoded, actual, _) = encoding.decode(data);
    let info = EncodingInfo {
        had_bom: false,
        transcoded_from: Some(actual.name()),
    };
    (Cow::Owned(decoded.into_owned().into_bytes()), info)
}
