//! Index extraction from format-string templates.

use regex::Regex;
use std::sync::LazyLock;

static RE_POSITION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\s*(\d+)\s*\}").unwrap());

/// Positions referenced by a template, in order of appearance.
///
/// `"{2}{0}{1}"` yields `[2, 0, 1]`. A position too large for `usize` is
/// skipped, so the caller sees a shorter list than the fragment count and
/// leaves the expression alone.
pub fn extract_indices(template: &str) -> Vec<usize> {
    RE_POSITION
        .captures_iter(template)
        .filter_map(|cap| cap[1].parse::<usize>().ok())
        .collect()
}
