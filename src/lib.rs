//! colorcode - dictionary-driven color coding of flashcard HTML
//!
//! A user-maintained table of terms and colors is compiled into one
//! matcher, which then wraps every occurrence of a term in card fields
//! with a styled `<span class="cc-color">`. Re-running is idempotent and
//! always reflects the current options.
//!
//! ```no_run
//! use colorcode::{annotate, ColoringOptions, CompiledMatcher, TermEntry, TermTable};
//!
//! let table: TermTable = TermEntry::new("ganglion", "anatomy", "#ff0000").into_iter().collect();
//! let opts = ColoringOptions::default();
//! let matcher = CompiledMatcher::compile(&table, &opts)?;
//! let out = annotate("The Ganglia are visible.", &matcher, &opts);
//! assert_eq!(out.replacements, 1);
//! # Ok::<(), colorcode::ColorCodeError>(())
//! ```

pub mod batch;
pub mod config;
pub mod dictionary;
pub mod engine;
pub mod error;
pub mod preview;

pub use dictionary::{TermEntry, TermTable};
pub use engine::{annotate, Annotated, Annotator, ColoringOptions, CompiledMatcher};
pub use error::{ColorCodeError, Result};
