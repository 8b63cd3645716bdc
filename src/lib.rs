//! PowerShell de-obfuscation by pattern rewriting.
//!
//! The core undoes format-string reordering:
//!
//! ```text
//! ("{2}{0}{1}" -f 'ing','Str','Write-')   →   Write-String
//! ```
//!
//! including nested expressions whose fragments are themselves reorder
//! expressions. Around it sit four simpler line rules:
//!
//! - **Ticks** — drop backticks that only break up identifiers
//! - **Concat** — join `'a' + 'b'` into `'ab'`
//! - **TitleCase** — undo aLtErNaTiNg cApS
//! - **Semicolons** — one statement per line
//!
//! Everything works on lines of text with regular expressions. There is no
//! PowerShell parser: anything outside the recognized shapes is left as is.

pub mod case;
pub mod charcode;
pub mod concat;
pub mod error;
pub mod fragment;
pub mod input;
pub mod pipeline;
pub mod placeholder;
pub mod quote;
pub mod reorder;
pub mod split;
pub mod template;
pub mod ticks;

pub use error::ReorderError;
pub use pipeline::{Pipeline, PipelineConfig, Rule};
pub use reorder::{resolve_reorder_obfuscation, ReorderConfig, ReorderResolver, Resolution};
