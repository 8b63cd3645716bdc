//! Character-code escape normalization.
//!
//! Rewrites `[char]72` into the quoted literal `'H'`, dropping backtick
//! continuation markers glued to either side. Runs before reorder detection
//! so that char-code fragments already look like ordinary literals.

use crate::quote::QuoteTracker;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

static RE_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)`*\[char\]\s*(\d+)\b`*").unwrap());

/// Replace every well-formed `[char]N` escape in `line`.
///
/// Values that overflow or do not name a Unicode scalar are left untouched.
pub fn normalize_char_codes(line: &str) -> Cow<'_, str> {
    RE_CHAR.replace_all(line, |caps: &Captures| {
        match caps[1].parse::<u32>().ok().and_then(char::from_u32) {
            Some(ch) => QuoteTracker::single_quote(ch.encode_utf8(&mut [0; 4])),
            None => caps[0].to_string(),
        }
    })
}
