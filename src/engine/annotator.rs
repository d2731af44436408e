//! Annotator
//!
//! Applies a compiled matcher to one HTML fragment: strips previous
//! wrappers, walks the tag-safe segments and wraps every match found in
//! text segments. Tags are copied through untouched.

use tracing::warn;

use super::compiler::CompiledMatcher;
use super::markup::{segments, strip_annotations, Segment, MARKER_CLASS};
use super::options::ColoringOptions;
use super::style::WrapperStyle;

/// Result of annotating one fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotated {
    /// The rewritten fragment
    pub html: String,
    /// Number of wrappers inserted
    pub replacements: usize,
}

impl Annotated {
    /// Whether the fragment must be written back
    ///
    /// Removing a stale wrapper is a change even with zero replacements.
    pub fn is_changed_from(&self, original: &str) -> bool {
        self.html != original
    }
}

/// A matcher bound to the style of one run
pub struct Annotator<'m> {
    matcher: &'m CompiledMatcher,
    style: WrapperStyle,
}

impl<'m> Annotator<'m> {
    pub fn new(matcher: &'m CompiledMatcher, opts: &ColoringOptions) -> Self {
        Self {
            matcher,
            style: WrapperStyle::from_options(opts),
        }
    }

    /// Annotate a fragment
    ///
    /// Never fails: if the matcher gives up on a segment the original
    /// fragment comes back unchanged with zero replacements.
    pub fn apply(&self, fragment: &str) -> Annotated {
        if fragment.is_empty() {
            return Annotated {
                html: String::new(),
                replacements: 0,
            };
        }

        let normalized = strip_annotations(fragment);
        if self.style.is_empty() || self.matcher.is_empty() {
            return Annotated {
                html: normalized.into_owned(),
                replacements: 0,
            };
        }

        let mut out = String::with_capacity(normalized.len() + normalized.len() / 2);
        let mut replacements = 0;
        for segment in segments(&normalized) {
            match segment {
                Segment::Tag(tag) => out.push_str(tag),
                Segment::Text(text) if text.contains(MARKER_CLASS) => out.push_str(text),
                Segment::Text(text) => match self.annotate_text(text, &mut out) {
                    Ok(n) => replacements += n,
                    Err(err) => {
                        warn!(error = %err, "term matcher failed, leaving fragment unchanged");
                        return Annotated {
                            html: fragment.to_string(),
                            replacements: 0,
                        };
                    }
                },
            }
        }

        Annotated {
            html: out,
            replacements,
        }
    }

    /// Append `text` to `out` with every match wrapped
    fn annotate_text(&self, text: &str, out: &mut String) -> fancy_regex::Result<usize> {
        let found = self.matcher.find_terms(text)?;
        let mut last = 0;
        let mut count = 0;

        for term in found {
            out.push_str(&text[last..term.start]);
            if self.style.wrap_into(out, &text[term.start..term.end], &term.group.color) {
                count += 1;
            }
            last = term.end;
        }

        out.push_str(&text[last..]);
        Ok(count)
    }
}

/// Annotate a single fragment
pub fn annotate(fragment: &str, matcher: &CompiledMatcher, opts: &ColoringOptions) -> Annotated {
    Annotator::new(matcher, opts).apply(fragment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::{TermEntry, TermTable};

    fn table(pairs: &[(&str, &str)]) -> TermTable {
        pairs
            .iter()
            .filter_map(|(w, c)| TermEntry::new(w, "", c))
            .collect()
    }

    fn run(pairs: &[(&str, &str)], opts: ColoringOptions, html: &str) -> Annotated {
        let matcher = CompiledMatcher::compile(&table(pairs), &opts).unwrap();
        annotate(html, &matcher, &opts)
    }

    #[test]
    fn test_plural_surface_form_kept() {
        let out = run(
            &[("ganglion", "#ff0000")],
            ColoringOptions::default(),
            "The Ganglia are visible.",
        );
        assert_eq!(
            out.html,
            r#"The <span class="cc-color" style="color:#ff0000; font-weight:bold;">Ganglia</span> are visible."#
        );
        assert_eq!(out.replacements, 1);
    }

    #[test]
    fn test_phrase_beats_prefix() {
        let out = run(
            &[("Heart", "blue"), ("Heart Attack", "red")],
            ColoringOptions::default(),
            "Heart Attack and Heart",
        );
        assert_eq!(
            out.html,
            concat!(
                r#"<span class="cc-color" style="color:red; font-weight:bold;">Heart Attack</span>"#,
                r#" and <span class="cc-color" style="color:blue; font-weight:bold;">Heart</span>"#
            )
        );
        assert_eq!(out.replacements, 2);
    }

    #[test]
    fn test_flexible_separators() {
        let opts = ColoringOptions { bold: false, ..Default::default() };
        for html in ["heart&nbsp;attack", "Heart-Attack", "heart — attack", "heart/attack"] {
            let out = run(&[("HeartAttack", "red")], opts, html);
            assert_eq!(out.replacements, 1, "{}", html);
            assert!(out.html.ends_with(&format!(">{}</span>", html)));
        }
    }

    #[test]
    fn test_tags_never_touched() {
        let html = r#"<a title="Heart" href="heart.html">Heart</a>"#;
        let out = run(&[("heart", "red")], ColoringOptions::default(), html);
        assert_eq!(
            out.html,
            r#"<a title="Heart" href="heart.html"><span class="cc-color" style="color:red; font-weight:bold;">Heart</span></a>"#
        );
    }

    #[test]
    fn test_idempotent() {
        let opts = ColoringOptions::default();
        let matcher = CompiledMatcher::compile(&table(&[("nucleus", "green")]), &opts).unwrap();
        let once = annotate("Two nuclei and a <i>nucleus</i>.", &matcher, &opts);
        let twice = annotate(&once.html, &matcher, &opts);
        assert_eq!(once.html, twice.html);
        assert_eq!(once.replacements, 2);
        assert_eq!(twice.replacements, 2);
    }

    #[test]
    fn test_stale_wrapper_removed_without_replacements() {
        let opts = ColoringOptions {
            colorize: false,
            bold: false,
            italic: false,
            ..Default::default()
        };
        let original = r#"a <span class="cc-color" style="color:red;">Heart</span>"#;
        let out = run(&[("Heart", "red")], opts, original);
        assert_eq!(out.html, "a Heart");
        assert_eq!(out.replacements, 0);
        assert!(out.is_changed_from(original));
    }

    #[test]
    fn test_trailing_s_guard() {
        let opts = ColoringOptions {
            whole_words: false,
            bold_plurals: false,
            bold: false,
            ..Default::default()
        };
        let out = run(&[("cell", "red")], opts, "cells, cellular");
        assert_eq!(
            out.html,
            r#"cells, <span class="cc-color" style="color:red;">cell</span>ular"#
        );
    }

    #[test]
    fn test_case_sensitive() {
        let opts = ColoringOptions {
            case_insensitive: false,
            ..Default::default()
        };
        let out = run(&[("Aorta", "red")], opts, "aorta Aorta");
        assert_eq!(out.replacements, 1);
        assert!(out.html.starts_with("aorta <span"));
    }

    #[test]
    fn test_literal_marker_text_skipped() {
        let out = run(&[("heart", "red")], ColoringOptions::default(), "heart cc-color");
        assert_eq!(out.html, "heart cc-color");
        assert_eq!(out.replacements, 0);
    }

    #[test]
    fn test_empty_input() {
        let out = run(&[("heart", "red")], ColoringOptions::default(), "");
        assert_eq!(out.html, "");
        assert_eq!(out.replacements, 0);
    }
}
