//! Text encoding detection.
//!
//! UTF-8 is tried first (a leading BOM is dropped); anything else is sniffed
//! with `chardetng` and decoded with `encoding_rs`.

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use tracing::{debug, warn};

/// Decoded file contents together with the encoding that produced them.
#[derive(Debug, Clone)]
pub struct DecodedText {
    pub text: String,
    pub encoding: &'static Encoding,
    /// True when some byte sequences were replaced with U+FFFD.
    pub lossy: bool,
}

/// Decodes raw bytes to text.
pub fn decode_text(bytes: &[u8]) -> DecodedText {
    let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    if let Ok(text) = std::str::from_utf8(body) {
        return DecodedText {
            text: text.to_string(),
            encoding: UTF_8,
            lossy: false,
        };
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    debug!(encoding = encoding.name(), "detected text encoding");

    let (decoded, actual, lossy) = encoding.decode(bytes);
    if lossy {
        warn!(
            encoding = actual.name(),
            "decoding errors occurred; invalid sequences were replaced"
        );
    }
    DecodedText {
        text: decoded.into_owned(),
        encoding: actual,
        lossy,
    }
}
