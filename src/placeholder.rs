//! Placeholder bookkeeping for nested reorder resolution.
//!
//! A resolved expression is replaced in the working text by a token of the
//! shape `'{#subs_N}'`. The token is itself a single-quoted literal, so an
//! enclosing reorder expression still matches and can reference it as a
//! fragment. The table maps each token back to its resolved text until the
//! final expansion sweep.

use crate::quote::QuoteTracker;
use regex::Regex;
use std::collections::HashMap;
use std::ops::Range;
use std::sync::LazyLock;

/// Matches a token anywhere in a line, quotes included.
pub static RE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'\{#subs_\d+\}'").unwrap());
static RE_TOKEN_EXACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^'\{#subs_\d+\}'$").unwrap());

/// Returns true if `text` (after trimming) is exactly one placeholder token.
pub fn is_token(text: &str) -> bool {
    RE_TOKEN_EXACT.is_match(text.trim())
}

/// Per-line mapping from placeholder token to resolved literal.
///
/// The counter lives here, so uniqueness is scoped to one table and two
/// lines resolved independently never share state.
#[derive(Debug, Default)]
pub struct PlaceholderTable {
    entries: HashMap<String, String>,
    next: usize,
}

impl PlaceholderTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `resolved` under a freshly minted token and return the token.
    pub fn insert(&mut self, resolved: String) -> String {
        let token = format!("'{{#subs_{}}}'", self.next);
        self.next += 1;
        self.entries.insert(token.clone(), resolved);
        token
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries.get(token.trim()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace every token in `text` with its resolved literal.
    ///
    /// Tokens for which `requote` returns true (given the token's byte range
    /// in `text`) are written back as single-quoted strings, for tokens that
    /// still sit in an argument list. Token-shaped text with no entry is left
    /// in place; those tokens are returned alongside the expanded text, in
    /// order of appearance.
    pub fn expand(
        &self,
        text: &str,
        requote: impl Fn(Range<usize>) -> bool,
    ) -> (String, Vec<String>) {
        let mut out = String::with_capacity(text.len());
        let mut dangling = Vec::new();
        let mut last = 0;

        for m in RE_TOKEN.find_iter(text) {
            out.push_str(&text[last..m.start()]);
            match self.get(m.as_str()) {
                Some(value) if requote(m.range()) => {
                    out.push_str(&QuoteTracker::single_quote(value))
                }
                Some(value) => out.push_str(value),
                None => {
                    dangling.push(m.as_str().to_string());
                    out.push_str(m.as_str());
                }
            }
            last = m.end();
        }
        out.push_str(&text[last..]);
        (out, dangling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_sequential_and_unique() {
        let mut table = PlaceholderTable::new();
        assert!(table.is_empty());
        assert_eq!(table.insert("a".into()), "'{#subs_0}'");
        assert_eq!(table.insert("b".into()), "'{#subs_1}'");
        assert_eq!(table.len(), 2);
        assert!(!table.is_empty());
    }

    #[test]
    fn fresh_table_restarts_counter() {
        let mut first = PlaceholderTable::new();
        first.insert("x".into());
        let mut second = PlaceholderTable::new();
        assert_eq!(second.insert("y".into()), "'{#subs_0}'");
    }

    #[test]
    fn recognizes_token_shape() {
        assert!(is_token("'{#subs_12}'"));
        assert!(is_token("  '{#subs_0}' "));
        assert!(!is_token("{#subs_0}"));
        assert!(!is_token("'{#subs_}'"));
        assert!(!is_token("'x{#subs_0}'"));
    }

    #[test]
    fn expands_known_tokens() {
        let mut table = PlaceholderTable::new();
        let token = table.insert("Write-Host".into());
        let (text, dangling) = table.expand(&format!("& {token} hi"), |_| false);
        assert_eq!(text, "& Write-Host hi");
        assert!(dangling.is_empty());
    }

    #[test]
    fn requotes_when_asked() {
        let mut table = PlaceholderTable::new();
        let token = table.insert("it's".into());
        let (text, _) = table.expand(&format!("{token},'x'"), |_| true);
        assert_eq!(text, "'it''s','x'");
    }

    #[test]
    fn requote_sees_token_range() {
        let mut table = PlaceholderTable::new();
        let first = table.insert("a".into());
        let second = table.insert("b".into());
        let text = format!("{first} {second}");
        let (out, _) = table.expand(&text, |span| span.start > 0);
        assert_eq!(out, "a 'b'");
    }

    #[test]
    fn reports_dangling_tokens() {
        let table = PlaceholderTable::new();
        let (text, dangling) = table.expand("echo '{#subs_7}'", |_| false);
        assert_eq!(text, "echo '{#subs_7}'");
        assert_eq!(dangling, vec!["'{#subs_7}'"]);
    }
}
