//! Fragment extraction from the argument list of a `-f` expression.

use crate::placeholder;
use crate::quote::QuoteTracker;

/// One element of a fragment list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Literal text, quotes stripped, escapes undone and whitespace trimmed.
    Literal(String),
    /// A token minted earlier in the same pass, quotes included.
    Placeholder(String),
}

/// Split a fragment list into its elements, in source order.
///
/// Index 0 is the first fragment written, whatever order the template
/// later assembles them in. Returns `None` if any element is not a single
/// quoted literal.
pub fn extract_fragments(list: &str) -> Option<Vec<Fragment>> {
    QuoteTracker::split_outside_quotes(list)?
        .into_iter()
        .map(|raw| {
            let raw = raw.trim();
            if placeholder::is_token(raw) {
                Some(Fragment::Placeholder(raw.to_string()))
            } else {
                QuoteTracker::unquote(raw).map(|s| Fragment::Literal(s.trim().to_string()))
            }
        })
        .collect()
}
