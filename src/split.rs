//! Statement splitting at semicolons.
//!
//! One-liner payloads chain dozens of statements with `;`. Each statement is
//! moved onto its own line, keeping its terminator.

/// Split every line after each `;`.
///
/// Lines without a semicolon pass through unchanged, blank ones included.
/// Empty or whitespace-only pieces produced by the split are dropped.
pub fn split_at_semicolons(lines: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(lines.len());
    for line in lines {
        if !line.contains(';') {
            out.push(line.clone());
            continue;
        }
        out.extend(
            line.split_inclusive(';')
                .filter(|piece| !piece.trim().is_empty())
                .map(str::to_string),
        );
    }
    out
}
