//! Format-string reordering resolution.
//!
//! Undoes obfuscation of the form `("{2}{0}{1}" -f 'ing','Str','Write-')`,
//! which PowerShell evaluates to `Write-String`. Each line is processed in
//! two states:
//!
//! 1. **Scanning** — find every reorder expression, resolve it, and replace
//!    it with a placeholder token. Repeat from scratch until a sweep finds
//!    nothing it can resolve, so inner expressions collapse into tokens that
//!    outer expressions can then consume.
//! 2. **Expanding** — replace each remaining token with its resolved text.
//!
//! Anything that looks like a reorder expression but cannot be resolved
//! (length mismatch, out-of-range index, unknown token) is left untouched.

use crate::charcode::normalize_char_codes;
use crate::error::{ReorderError, Result};
use crate::fragment::{extract_fragments, Fragment};
use crate::placeholder::PlaceholderTable;
use crate::template::extract_indices;
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

/// `(` template `-f` fragment-list `)`.
///
/// The template may hold only `{n}` placeholders: any other text would be
/// part of the formatted output and cannot be dropped by concatenation.
/// Double-quoted fragments containing `$` or a backtick are interpolated by
/// PowerShell and do not match.
static RE_REORDER: LazyLock<Regex> = LazyLock::new(|| {
    let frag = r#"(?:'(?:[^']|'')*'|"[^"`$]*")"#;
    Regex::new(&format!(
        r#"(?i)\(\s*(?:"([{{}}\d]+)"|'([{{}}\d]+)')\s*-f\s*({frag}(?:\s*,\s*{frag})*)\s*\)"#
    ))
    .unwrap()
});

/// A trailing `-f` operator, not the tail of a longer word.
static RE_FORMAT_OP_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|\W)-f$").unwrap());

/// Default cap on productive sweeps per line.
pub const DEFAULT_MAX_SWEEPS: usize = 64;

/// Tuning for [`ReorderResolver`].
#[derive(Debug, Clone)]
pub struct ReorderConfig {
    /// Sweeps allowed to make progress before the line is given up on.
    pub max_sweeps: usize,
}

impl Default for ReorderConfig {
    fn default() -> Self {
        Self {
            max_sweeps: DEFAULT_MAX_SWEEPS,
        }
    }
}

/// A substring that has the shape of a reorder expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderMatch<'a> {
    /// Byte range of the whole expression, parentheses included.
    pub span: Range<usize>,
    /// Template text between its quotes.
    pub template: &'a str,
    /// Raw argument list after `-f`.
    pub fragments: &'a str,
}

/// All non-overlapping reorder expressions in `text`, left to right.
pub fn find_matches(text: &str) -> Vec<ReorderMatch<'_>> {
    RE_REORDER
        .captures_iter(text)
        .filter_map(|cap| {
            let whole = cap.get(0)?;
            let template = cap.get(1).or_else(|| cap.get(2))?;
            Some(ReorderMatch {
                span: whole.range(),
                template: template.as_str(),
                fragments: cap.get(3)?.as_str(),
            })
        })
        .collect()
}

/// Assemble fragments in template order.
///
/// Returns `None` when the template and fragment list differ in length,
/// when an index is out of range, or when a placeholder has no entry.
pub fn resolve(
    indices: &[usize],
    fragments: &[Fragment],
    table: &PlaceholderTable,
) -> Option<String> {
    if indices.len() != fragments.len() {
        return None;
    }
    let mut out = String::new();
    for &p in indices {
        match fragments.get(p)? {
            Fragment::Literal(text) => out.push_str(text),
            Fragment::Placeholder(token) => match table.get(token) {
                Some(value) => out.push_str(value),
                None => {
                    tracing::warn!(%token, "fragment references an unknown placeholder");
                    return None;
                }
            },
        }
    }
    Some(out)
}

/// Outcome of resolving one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub text: String,
    /// Expressions resolved across all sweeps.
    pub resolved: usize,
    /// Sweeps that resolved at least one expression.
    pub sweeps: usize,
    /// Placeholder-shaped text left behind with no table entry.
    pub dangling: Vec<String>,
}

/// Resolves reorder expressions line by line.
#[derive(Debug, Clone, Default)]
pub struct ReorderResolver {
    config: ReorderConfig,
}

impl ReorderResolver {
    pub fn new(config: ReorderConfig) -> Self {
        Self { config }
    }

    /// Resolve every reorder expression in one line.
    ///
    /// Fails only when the sweep cap is exceeded; malformed expressions are
    /// left as they are.
    pub fn resolve_line(&self, line: &str) -> Result<Resolution> {
        let mut text = normalize_char_codes(line).into_owned();
        let mut table = PlaceholderTable::new();
        let mut sweeps = 0;

        loop {
            let (next, count) = sweep(&text, &mut table);
            if count == 0 {
                break;
            }
            sweeps += 1;
            if sweeps > self.config.max_sweeps {
                return Err(ReorderError::SweepLimitExceeded {
                    sweeps: self.config.max_sweeps,
                });
            }
            tracing::debug!(sweep = sweeps, resolved = count, "reorder sweep");
            text = next;
        }

        let (text, dangling) = expand(&text, &table);
        for token in &dangling {
            tracing::warn!(%token, line, "placeholder left without a resolved value");
        }
        Ok(Resolution {
            text,
            resolved: table.len(),
            sweeps,
            dangling,
        })
    }

    /// Resolve a batch of lines, one output line per input line.
    ///
    /// A line that hits the sweep cap is returned unmodified.
    pub fn resolve_lines<S: AsRef<str>>(&self, lines: &[S]) -> Vec<String> {
        lines
            .iter()
            .enumerate()
            .map(|(n, line)| {
                let line = line.as_ref();
                match self.resolve_line(line) {
                    Ok(resolution) => resolution.text,
                    Err(e) => {
                        tracing::warn!(line = n + 1, error = %e, "line left unresolved");
                        line.to_string()
                    }
                }
            })
            .collect()
    }
}

/// Resolve `lines` with the default configuration.
pub fn resolve_reorder_obfuscation<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    ReorderResolver::default().resolve_lines(lines)
}

/// One scan over `text`: every resolvable match becomes a token.
///
/// Returns the rebuilt text and the number of expressions resolved.
fn sweep(text: &str, table: &mut PlaceholderTable) -> (String, usize) {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut count = 0;

    for m in find_matches(text) {
        let indices = extract_indices(m.template);
        let Some(resolved) =
            extract_fragments(m.fragments).and_then(|frags| resolve(&indices, &frags, table))
        else {
            continue;
        };
        tracing::debug!(template = m.template, %resolved, "resolved reorder expression");
        out.push_str(&text[last..m.span.start]);
        out.push_str(&table.insert(resolved));
        last = m.span.end;
        count += 1;
    }
    out.push_str(&text[last..]);
    (out, count)
}

/// Replace tokens with their values.
///
/// A token still standing as a `-f` argument (after `-f` or `,`, before `,`
/// or `)`) keeps its quotes so the surrounding expression stays valid.
fn expand(text: &str, table: &PlaceholderTable) -> (String, Vec<String>) {
    table.expand(text, |span| in_argument_position(text, span))
}

fn in_argument_position(text: &str, span: Range<usize>) -> bool {
    let before = text[..span.start].trim_end();
    let after = text[span.end..].trim_start();
    let opens = before.ends_with(',') || RE_FORMAT_OP_END.is_match(before);
    opens && (after.starts_with(',') || after.starts_with(')'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(line: &str) -> String {
        ReorderResolver::default().resolve_line(line).unwrap().text
    }

    #[test]
    fn basic_reorder() {
        assert_eq!(run(r#"("{2}{0}{1}" -f 'A','B','C')"#), "CAB");
    }

    #[test]
    fn reorder_in_context() {
        let line = r#"& ("{1}{0}" -f 'Host','Write-') 'hi'"#;
        assert_eq!(run(line), "& Write-Host 'hi'");
    }

    #[test]
    fn single_quoted_template_and_tight_operator() {
        assert_eq!(run(r#"('{1}{0}'-F'lo','Hel')"#), "Hello");
    }

    #[test]
    fn repeated_index() {
        assert_eq!(run(r#"("{0}{0}{1}" -f 'a','b','c')"#), "aab");
        assert_eq!(run(r#"("{1}{1}" -f 'a','b')"#), "bb");
    }

    #[test]
    fn clean_input_unchanged() {
        let line = "Get-ChildItem -Path C:\\ | Where-Object { $_.Length -gt 0 }";
        assert_eq!(run(line), line);
    }

    #[test]
    fn length_mismatch_is_left_alone() {
        let line = r#"("{0}{1}" -f 'A','B','C')"#;
        assert_eq!(run(line), line);
    }

    #[test]
    fn out_of_range_is_left_alone() {
        let line = r#"("{5}" -f 'A')"#;
        assert_eq!(run(line), line);
    }

    #[test]
    fn template_with_literal_text_is_left_alone() {
        let line = r#"("{0}-{1}" -f 'A','B')"#;
        assert_eq!(run(line), line);
    }

    #[test]
    fn interpolated_fragment_is_left_alone() {
        let line = r#"("{1}{0}" -f "$a",'B')"#;
        assert_eq!(run(line), line);
    }

    #[test]
    fn nested_expression_resolves_over_two_sweeps() {
        let line = r#"("{1}{0}" -f ("{1}{0}" -f 'b','a'), 'c')"#;
        let res = ReorderResolver::default().resolve_line(line).unwrap();
        assert_eq!(res.text, "cab");
        assert_eq!(res.sweeps, 2);
        assert_eq!(res.resolved, 2);
        assert!(res.dangling.is_empty());
    }

    #[test]
    fn deeply_nested_expression() {
        let line =
            r#"("{0}{1}" -f ("{1}{0}" -f ("{1}{0}" -f 'e','d'), 'co'), ("{0}" -f 'r'))"#;
        assert_eq!(run(line), "coder");
    }

    #[test]
    fn siblings_resolve_in_one_sweep() {
        let line = r#"("{1}{0}" -f 'a','b') + ("{1}{0}" -f 'c','d')"#;
        let res = ReorderResolver::default().resolve_line(line).unwrap();
        assert_eq!(res.text, "ba + dc");
        assert_eq!(res.sweeps, 1);
    }

    #[test]
    fn failed_outer_keeps_inner_quoted() {
        let line = r#"("{0}" -f ("{1}{0}" -f 'b','a'), 'x')"#;
        assert_eq!(run(line), r#"("{0}" -f 'ab', 'x')"#);
    }

    #[test]
    fn failed_outer_with_literal_template_keeps_inner_quoted() {
        let line = r#"("{0}-{1}" -f ("{1}{0}" -f 'b','a'),'c')"#;
        assert_eq!(run(line), r#"("{0}-{1}" -f 'ab','c')"#);
    }

    #[test]
    fn failed_outer_quotes_every_argument_token() {
        let line = r#"("{0}" -F ("{0}" -f 'a'), ("{0}" -f 'b'))"#;
        assert_eq!(run(line), r#"("{0}" -F 'a', 'b')"#);
    }

    #[test]
    fn token_outside_argument_list_is_bare() {
        let line = r#"foo(("{1}{0}" -f 'b','a'))"#;
        assert_eq!(run(line), "foo(ab)");
    }

    #[test]
    fn char_codes_feed_reorder() {
        let line = r#"("{1}{0}" -f `[char]105`, [CHAR]72)"#;
        assert_eq!(run(line), "Hi");
    }

    #[test]
    fn fragments_with_commas_and_quotes() {
        let line = r#"("{1}{0}" -f 'b,c', 'it''s ')"#;
        assert_eq!(run(line), "it'sb,c");
    }

    #[test]
    fn no_tokens_left_after_full_resolution() {
        let line = r#"iex ("{0}{2}{1}" -f ("{1}{0}" -f 'w-','Ne'), 'ject', ("{0}" -f 'Ob'))"#;
        let out = run(line);
        assert_eq!(out, "iex New-Object");
        assert!(!crate::placeholder::RE_TOKEN.is_match(&out));
    }

    #[test]
    fn preexisting_token_text_is_reported() {
        let res = ReorderResolver::default()
            .resolve_line("echo '{#subs_3}'")
            .unwrap();
        assert_eq!(res.text, "echo '{#subs_3}'");
        assert_eq!(res.dangling, vec!["'{#subs_3}'"]);
    }

    #[test]
    fn sweep_cap_fails_the_line() {
        let resolver = ReorderResolver::new(ReorderConfig { max_sweeps: 1 });
        let line = r#"("{1}{0}" -f ("{1}{0}" -f 'b','a'), 'c')"#;
        assert_eq!(
            resolver.resolve_line(line),
            Err(ReorderError::SweepLimitExceeded { sweeps: 1 })
        );
        assert_eq!(resolver.resolve_lines(&[line]), vec![line.to_string()]);
    }

    #[test]
    fn batch_is_line_for_line() {
        let lines = [r#"("{1}{0}" -f 'B','A')"#, "plain", r#"("{0}" -f 'X')"#];
        assert_eq!(resolve_reorder_obfuscation(&lines), vec!["AB", "plain", "X"]);
    }

    #[test]
    fn deterministic_output() {
        let line = r#"("{2}{1}{0}" -f ("{1}{0}" -f 'x','y'), 'z', ("{0}" -f 'w'))"#;
        assert_eq!(run(line), run(line));
    }

    #[test]
    fn find_matches_reports_captures() {
        let text = r#"a ("{1}{0}" -f 'x', 'y') b"#;
        let found = find_matches(text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].template, "{1}{0}");
        assert_eq!(found[0].fragments, "'x', 'y'");
        assert_eq!(&text[found[0].span.clone()], r#"("{1}{0}" -f 'x', 'y')"#);
    }

    #[test]
    fn resolve_rejects_unknown_placeholder() {
        let table = PlaceholderTable::new();
        let frags = vec![Fragment::Placeholder("'{#subs_0}'".into())];
        assert_eq!(resolve(&[0], &frags, &table), None);
    }
}
