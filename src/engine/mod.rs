//! Lexical annotation engine
//!
//! This module compiles a term dictionary into a single matcher and
//! applies it to HTML fragments:
//! - Tokenizing compound dictionary keys
//! - Deriving plural surface forms
//! - Building the combined, precedence-ordered pattern
//! - Wrapping matches without touching tags
//!
//! The engine holds no global state. Compile once per run, then share
//! the matcher read-only across every fragment of that run.

mod annotator;
mod compiler;
mod markup;
mod options;
mod plural;
mod style;
mod tokens;

pub use annotator::{annotate, Annotated, Annotator};
pub use compiler::{CompiledMatcher, TermGroup, SEPARATOR_PATTERN};
pub use markup::{segments, strip_annotations, Segment, MARKER_CLASS};
pub use options::ColoringOptions;
pub use plural::PluralForms;
pub use style::WrapperStyle;
pub use tokens::tokenize;
