//! Case normalization for aLtErNaTiNg cApS.
//!
//! PowerShell is case-insensitive, so `iNvOkE-eXpReSsIoN` runs fine but reads
//! badly. Every word is rewritten in title case.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static RE_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[a-zA-Z0-9_:]+\b").unwrap());

/// Uppercase each letter that does not follow another letter; lowercase the rest.
fn title_case_word(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut prev_alpha = false;
    for ch in word.chars() {
        if prev_alpha {
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch.to_ascii_uppercase());
        }
        prev_alpha = ch.is_ascii_alphabetic();
    }
    out
}

/// Title-case every word in `line`.
pub fn title_case_line(line: &str) -> String {
    RE_WORD
        .replace_all(line, |caps: &Captures| title_case_word(&caps[0]))
        .into_owned()
}

/// Title-case all lines.
pub fn title_case_lines(lines: &[String]) -> Vec<String> {
    lines.iter().map(|l| title_case_line(l)).collect()
}
