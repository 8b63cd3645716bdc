//! Script decoding and line splitting.
//!
//! PowerShell tooling commonly writes UTF-16 with a byte order mark, so a BOM
//! decides the encoding outright. Without one the encoding is guessed from
//! the whole input: Windows PowerShell saves "ANSI" scripts as Windows-1252.

use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// Decode raw script bytes to text.
pub fn decode_script(bytes: &[u8]) -> String {
    let (encoding, bom_len) =
        Encoding::for_bom(bytes).unwrap_or_else(|| (detect_encoding(bytes), 0));
    let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
    if had_errors {
        tracing::warn!(encoding = encoding.name(), "input contained undecodable bytes");
    }
    tracing::debug!(encoding = encoding.name(), "decoded script");
    text.into_owned()
}

/// Guess the encoding of BOM-less input.
fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

/// Split decoded text into lines without their terminators.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(|s| s.to_string()).collect()
}
