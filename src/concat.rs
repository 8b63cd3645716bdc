//! Adjacent string-literal concatenation.
//!
//! Collapses `'Invoke-' + 'Expression'` into `'Invoke-Expression'`. Only
//! literals of the same quote kind are joined; double-quoted literals with
//! `$` or a backtick are interpolated and left alone.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static RE_SINGLE_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'((?:[^']|'')*)'\s*\+\s*'((?:[^']|'')*)'").unwrap());
static RE_DOUBLE_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"`$]*)"\s*\+\s*"([^"`$]*)""#).unwrap());

const MAX_PASSES: usize = 100;

/// Join `'a' + 'b'` pairs until none remain.
pub fn join_literals(line: &str) -> String {
    let mut s = line.to_string();
    for (re, quote) in [(&*RE_SINGLE_PAIR, '\''), (&*RE_DOUBLE_PAIR, '"')] {
        for _ in 0..MAX_PASSES {
            let next = re
                .replace_all(&s, |caps: &Captures| {
                    format!("{quote}{}{}{quote}", &caps[1], &caps[2])
                })
                .to_string();
            if next == s {
                break;
            }
            s = next;
        }
    }
    s
}

/// Join literals on all lines.
pub fn join_literals_lines(lines: &[String]) -> Vec<String> {
    lines.iter().map(|l| join_literals(l)).collect()
}
