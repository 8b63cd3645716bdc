//! PowerShell de-obfuscator.
//!
//! Reads a script, applies the requested rules in order and writes the
//! result:
//!
//! 1. **Reorder** — resolve `("{1}{0}" -f 'b','a')` format-string reordering
//! 2. **Ticks** — remove backticks, keeping trailing continuations
//! 3. **Concat** — join adjacent string literals
//! 4. **TitleCase** — undo aLtErNaTiNg cApS
//! 5. **Semicolons** — one statement per line
//!
//! The right order depends on the sample, so each `-r` adds one rule to the
//! sequence. Without `-r` only the reorder rule runs.

use anyhow::{Context, Result};
use clap::Parser;
use psdecode::input::{decode_script, split_lines};
use psdecode::reorder::DEFAULT_MAX_SWEEPS;
use psdecode::{Pipeline, PipelineConfig, ReorderConfig, Rule};
use std::fs;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "psdecode", about = "De-obfuscates PowerShell scripts")]
struct Cli {
    /// Input PowerShell script
    #[arg(short = 'i', long)]
    input: String,

    /// Output file. Without it the result goes to stdout.
    #[arg(short = 'o', long)]
    output: Option<String>,

    /// Rule to apply (repeatable, applied in order). Defaults to reorder.
    #[arg(short = 'r', long = "rule", value_enum)]
    rules: Vec<Rule>,

    /// Print the first N lines of the result to stdout
    #[arg(long, value_name = "N")]
    preview: Option<usize>,

    /// Give up on a line after this many reorder sweeps
    #[arg(long, default_value_t = DEFAULT_MAX_SWEEPS)]
    max_sweeps: usize,

    /// Log each resolution step to stderr
    #[arg(short = 'v', long)]
    verbose: bool,
}

/// Build the pipeline configuration from parsed arguments.
fn pipeline_config(cli: &Cli) -> PipelineConfig {
    let rules = if cli.rules.is_empty() {
        vec![Rule::Reorder]
    } else {
        cli.rules.clone()
    };
    PipelineConfig {
        rules,
        reorder: ReorderConfig {
            max_sweeps: cli.max_sweeps,
        },
    }
}

/// Decode, split and transform a script — extracted for testability.
fn deobfuscate(bytes: &[u8], config: &PipelineConfig) -> Vec<String> {
    let lines = split_lines(&decode_script(bytes));
    Pipeline::new(config).run(lines)
}

/// Join lines back into file content, one `\n` after each line.
fn render(lines: &[String]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}

fn init_logging(verbose: bool) {
    let default = if verbose { "psdecode=debug" } else { "psdecode=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let bytes = fs::read(&cli.input).with_context(|| format!("Failed to read {}", cli.input))?;
    let config = pipeline_config(&cli);
    let lines = deobfuscate(&bytes, &config);
    tracing::debug!(lines = lines.len(), rules = ?config.rules, "finished");

    let mut stdout = io::stdout().lock();
    if let Some(n) = cli.preview {
        let shown = &lines[..n.min(lines.len())];
        stdout.write_all(render(shown).as_bytes())?;
    }

    match &cli.output {
        Some(path) => {
            fs::write(path, render(&lines)).with_context(|| format!("Failed to write {path}"))?;
        }
        None if cli.preview.is_none() => stdout.write_all(render(&lines).as_bytes())?,
        None => {}
    }

    Ok(())
}
