//! Rule sequencing.
//!
//! Which rewrite helps depends on the sample, so rules are applied in the
//! order the caller asks for, each over the whole batch of lines.

use crate::reorder::{ReorderConfig, ReorderResolver};
use crate::{case, concat, split, ticks};
use clap::ValueEnum;

/// One de-obfuscation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Rule {
    /// Resolve `("{1}{0}" -f 'b','a')` format-string reordering
    Reorder,
    /// Remove backticks, keeping trailing line continuations
    Ticks,
    /// Join adjacent string literals: `'a' + 'b'`
    Concat,
    /// Title-case every word
    TitleCase,
    /// Put each `;`-terminated statement on its own line
    Semicolons,
}

/// Pipeline configuration for [`Pipeline`].
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub rules: Vec<Rule>,
    pub reorder: ReorderConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            rules: vec![Rule::Reorder],
            reorder: ReorderConfig::default(),
        }
    }
}

/// An ordered list of rules ready to run.
pub struct Pipeline {
    rules: Vec<Rule>,
    resolver: ReorderResolver,
}

impl Pipeline {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            rules: config.rules.clone(),
            resolver: ReorderResolver::new(config.reorder.clone()),
        }
    }

    /// Apply one rule to a batch.
    pub fn apply(&self, rule: Rule, lines: &[String]) -> Vec<String> {
        match rule {
            Rule::Reorder => self.resolver.resolve_lines(lines),
            Rule::Ticks => ticks::strip_backticks_lines(lines),
            Rule::Concat => concat::join_literals_lines(lines),
            Rule::TitleCase => case::title_case_lines(lines),
            Rule::Semicolons => split::split_at_semicolons(lines),
        }
    }

    /// Apply every rule in order.
    pub fn run(&self, lines: Vec<String>) -> Vec<String> {
        self.rules.iter().fold(lines, |lines, &rule| {
            let out = self.apply(rule, &lines);
            tracing::debug!(?rule, before = lines.len(), after = out.len(), "applied rule");
            out
        })
    }
}
