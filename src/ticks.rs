//! Backtick removal.
//!
//! Obfuscators sprinkle PowerShell's escape character through identifiers
//! (`` I`nv`oke-`Ex`pression ``), where it has no effect. A backtick that
//! ends the line is a real continuation marker and is kept.

/// Remove every backtick except a trailing line-continuation one.
pub fn strip_backticks(line: &str) -> String {
    let body = line.trim_end();
    let trailing = &line[body.len()..];
    match body.strip_suffix('`') {
        Some(head) => format!("{}`{trailing}", head.replace('`', "")),
        None => format!("{}{trailing}", body.replace('`', "")),
    }
}

/// Strip backticks from all lines.
pub fn strip_backticks_lines(lines: &[String]) -> Vec<String> {
    lines.iter().map(|l| strip_backticks(l)).collect()
}
