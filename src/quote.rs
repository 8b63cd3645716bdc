//! Quote-aware scanning for PowerShell string literals.
//!
//! PowerShell escapes a single quote inside a single-quoted string by
//! doubling it (`'it''s'`), and escapes inside double-quoted strings with a
//! backtick. Commas inside either kind of literal are not separators.

/// Stateless quote analysis.
pub struct QuoteTracker;

impl QuoteTracker {
    /// Split `text` on commas that sit outside any quoted literal.
    ///
    /// Returns `None` if a literal is left open at the end of the input.
    pub fn split_outside_quotes(text: &str) -> Option<Vec<&str>> {
        let mut segments = Vec::new();
        let mut start = 0;
        let mut in_single = false;
        let mut in_double = false;
        let mut chars = text.char_indices().peekable();

        while let Some((i, ch)) = chars.next() {
            match ch {
                '\'' if in_single => {
                    // `''` is an escaped quote, not the end of the literal
                    if matches!(chars.peek(), Some((_, '\''))) {
                        chars.next();
                    } else {
                        in_single = false;
                    }
                }
                '\'' if !in_double => in_single = true,
                '`' if in_double => {
                    chars.next();
                }
                '"' if !in_single => in_double = !in_double,
                ',' if !in_single && !in_double => {
                    segments.push(&text[start..i]);
                    start = i + 1;
                }
                _ => {}
            }
        }
        if in_single || in_double {
            return None;
        }
        segments.push(&text[start..]);
        Some(segments)
    }

    /// Strip the surrounding quotes of a single literal and undo its escapes.
    ///
    /// `'a''b'` becomes `a'b`. Returns `None` when `text` (after trimming)
    /// is not exactly one quoted literal.
    pub fn unquote(text: &str) -> Option<String> {
        let text = text.trim();
        let mut chars = text.chars();
        let quote = chars.next()?;
        if !(quote == '\'' || quote == '"') || text.len() < 2 || !text.ends_with(quote) {
            return None;
        }
        let inner = &text[1..text.len() - 1];
        let mut out = String::with_capacity(inner.len());
        let mut inner_chars = inner.chars().peekable();
        while let Some(ch) = inner_chars.next() {
            if ch == quote {
                // Only a doubled quote may appear inside the literal
                if inner_chars.next() != Some(quote) {
                    return None;
                }
            }
            out.push(ch);
        }
        Some(out)
    }

    /// Wrap `value` in single quotes, doubling any embedded single quote.
    pub fn single_quote(value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }
}
