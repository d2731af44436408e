//! Pattern compiler
//!
//! Turns a word→color table and a set of options into one combined regex
//! with a named capture group per term.
//!
//! Precedence is carried entirely by alternation order: the regex engine
//! commits to the first alternative that matches at the leftmost start
//! position, so terms are emitted most specific first (more tokens, then
//! more characters). "Heart Attack" is therefore tried before "Heart" at
//! the same offset and wins.

use fancy_regex::RegexBuilder;
use regex::Regex;
use tracing::debug;

use super::options::ColoringOptions;
use super::plural::PluralForms;
use super::tokens::tokenize;
use crate::dictionary::TermTable;
use crate::error::Result;

/// Separators allowed between the tokens of a multi-word term:
/// whitespace, `&nbsp;`, hyphen, slash, en dash, em dash, or one inline tag
pub const SEPARATOR_PATTERN: &str = r"(?:\s|&nbsp;|[-/]|–|—|<[^>]+?>)+";

/// Pattern used when the table has no usable terms
const NEVER_MATCHES: &str = r"\b\B";

/// Backtracking budget for guarded patterns; cost grows with text length
/// times term count, so no fixed cap is safe
const GUARDED_BACKTRACK_LIMIT: usize = usize::MAX;

/// One term's slot in the combined pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermGroup {
    /// Capture group name (`k0`, `k1`, ...)
    pub name: String,
    /// Dictionary key the group was built from
    pub word: String,
    /// Color copied verbatim into the wrapper style
    pub color: String,
}

/// The compiled dictionary, built once per run and shared read-only
#[derive(Debug)]
pub struct CompiledMatcher {
    engine: Engine,
    source: String,
    groups: Vec<TermGroup>,
}

/// Regex engine chosen for the pattern
///
/// Only the trailing-`s` guard needs lookahead. Everything else runs on
/// the automaton engine, which never backtracks.
#[derive(Debug)]
enum Engine {
    Plain(Regex),
    Guarded(fancy_regex::Regex),
}

/// One term occurrence, as byte offsets into the searched text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TermMatch<'m> {
    pub start: usize,
    pub end: usize,
    pub group: &'m TermGroup,
}

/// A term ready for pattern generation
struct Candidate<'a> {
    tokens: Vec<String>,
    word: &'a str,
    color: &'a str,
}

impl Candidate<'_> {
    /// Sort key: token count, then total token length in characters
    fn specificity(&self) -> (usize, usize) {
        let chars = self.tokens.iter().map(|t| t.chars().count()).sum();
        (self.tokens.len(), chars)
    }
}

impl CompiledMatcher {
    /// Compile a term table under the given options
    ///
    /// Identical inputs always produce a byte-identical pattern and group
    /// list. Terms that tokenize to nothing are skipped; an empty table
    /// yields a matcher that never matches.
    pub fn compile(table: &TermTable, opts: &ColoringOptions) -> Result<Self> {
        let color_map = table.color_map();

        let mut candidates: Vec<Candidate> = color_map
            .iter()
            .filter_map(|(&word, &color)| {
                let tokens = tokenize(word);
                (!tokens.is_empty()).then_some(Candidate { tokens, word, color })
            })
            .collect();
        let skipped = color_map.len() - candidates.len();

        // Stable: equally specific terms keep table order
        candidates.sort_by(|a, b| b.specificity().cmp(&a.specificity()));

        let mut alternatives = Vec::with_capacity(candidates.len());
        let mut groups = Vec::with_capacity(candidates.len());
        for (i, candidate) in candidates.iter().enumerate() {
            let name = format!("k{}", i);
            alternatives.push(format!("(?P<{}>{})", name, term_pattern(&candidate.tokens, opts)));
            groups.push(TermGroup {
                name,
                word: candidate.word.to_string(),
                color: candidate.color.to_string(),
            });
        }

        let body = if alternatives.is_empty() {
            NEVER_MATCHES.to_string()
        } else {
            alternatives.join("|")
        };
        let source = if opts.case_insensitive {
            format!("(?i){}", body)
        } else {
            body
        };

        let guarded = !opts.whole_words
            && !opts.bold_plurals
            && candidates.iter().any(|c| c.tokens.len() == 1);
        let engine = if guarded {
            Engine::Guarded(
                RegexBuilder::new(&source)
                    .backtrack_limit(GUARDED_BACKTRACK_LIMIT)
                    .build()?,
            )
        } else {
            Engine::Plain(Regex::new(&source)?)
        };
        debug!(
            terms = groups.len(),
            skipped,
            guarded,
            pattern_len = source.len(),
            "compiled term matcher"
        );

        Ok(Self { engine, source, groups })
    }

    /// Pattern source, including the case-insensitivity flag if set
    pub fn pattern(&self) -> &str {
        &self.source
    }

    /// Term groups in pattern (precedence) order
    pub fn groups(&self) -> &[TermGroup] {
        &self.groups
    }

    /// Number of terms that made it into the pattern
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True when the matcher can never match
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Color for a capture group name
    pub fn color_for(&self, group_name: &str) -> Option<&str> {
        self.groups
            .iter()
            .find(|g| g.name == group_name)
            .map(|g| g.color.as_str())
    }

    /// Every term occurrence in `text`, leftmost first, non-overlapping
    pub(crate) fn find_terms(&self, text: &str) -> fancy_regex::Result<Vec<TermMatch<'_>>> {
        let mut found = Vec::new();
        match &self.engine {
            Engine::Plain(re) => {
                for caps in re.captures_iter(text) {
                    let index = (1..caps.len()).find(|&i| caps.get(i).is_some());
                    if let (Some(whole), Some(group)) = (caps.get(0), index.and_then(|i| self.group_at(i))) {
                        found.push(TermMatch { start: whole.start(), end: whole.end(), group });
                    }
                }
            }
            Engine::Guarded(re) => {
                for caps in re.captures_iter(text) {
                    let caps = caps?;
                    let index = (1..caps.len()).find(|&i| caps.get(i).is_some());
                    if let (Some(whole), Some(group)) = (caps.get(0), index.and_then(|i| self.group_at(i))) {
                        found.push(TermMatch { start: whole.start(), end: whole.end(), group });
                    }
                }
            }
        }
        Ok(found)
    }

    /// Group for the capture index produced by the combined regex
    ///
    /// Every other group in the pattern is non-capturing, so term `i`
    /// is capture `i + 1`.
    pub(crate) fn group_at(&self, capture_index: usize) -> Option<&TermGroup> {
        capture_index.checked_sub(1).and_then(|i| self.groups.get(i))
    }
}

/// Build the sub-pattern for one term
fn term_pattern(tokens: &[String], opts: &ColoringOptions) -> String {
    let last = tokens.len() - 1;
    tokens
        .iter()
        .enumerate()
        .map(|(i, token)| token_pattern(token, i == last, tokens.len(), opts))
        .collect::<Vec<_>>()
        .join(SEPARATOR_PATTERN)
}

fn token_pattern(token: &str, is_last: bool, token_count: usize, opts: &ColoringOptions) -> String {
    let literal = fancy_regex::escape(token).into_owned();
    let core = if is_last && opts.bold_plurals {
        PluralForms::of(token, opts.case_insensitive).pattern()
    } else {
        literal.clone()
    };

    if opts.whole_words {
        return format!(r"\b{}\b", core);
    }
    if is_last && !opts.bold_plurals && token_count == 1 {
        // Leave the stem of an unrelated plural alone
        return format!("{}(?!s)", literal);
    }
    core
}
