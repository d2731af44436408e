//! Term tokenizer
//!
//! Splits a dictionary key into the ordered sub-tokens the pattern
//! compiler joins with flexible separators. Keys with explicit separators
//! (whitespace, `_`, `-`) split on those; anything else is decomposed as
//! a compound word (CamelCase, acronyms, digit runs).

use std::sync::LazyLock;

use fancy_regex::Regex;

/// Explicit separators inside a key
static SEPARATOR: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"[\s_\-]+").expect("valid separator regex"));

/// Compound-word classes: capitalized word, ALL-CAPS run not followed by
/// a lowercase letter, digit run
static COMPOUND_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\p{Lu}?\p{Ll}+|\p{Lu}+(?!\p{Ll})|\d+").expect("valid compound regex")
});

/// Split a trimmed term into tokens
///
/// An empty result means the term has nothing matchable; the compiler
/// drops such terms.
pub fn tokenize(term: &str) -> Vec<String> {
    if SEPARATOR.is_match(term) {
        return SEPARATOR
            .split(term)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
    }

    COMPOUND_PART
        .find_iter(term)
        .filter_map(|m| m.ok())
        .map(|m| m.as_str().to_string())
        .collect()
}
