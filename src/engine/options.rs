//! Coloring options
//!
//! Flat set of switches shared by the pattern compiler (matching
//! behaviour) and the annotator (wrapper style).

use serde::{Deserialize, Serialize};

/// Options for one compile/apply cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColoringOptions {
    /// Anchor every token at word boundaries
    pub whole_words: bool,
    /// Match regardless of letter case
    pub case_insensitive: bool,
    /// Emit `font-weight:bold;`
    pub bold: bool,
    /// Emit `font-style:italic;`
    pub italic: bool,
    /// Also match the rule-derived plural of a term's last token
    pub bold_plurals: bool,
    /// Emit `color:<c>;`
    pub colorize: bool,
}

impl Default for ColoringOptions {
    fn default() -> Self {
        Self {
            whole_words: true,
            case_insensitive: true,
            bold: true,
            italic: false,
            bold_plurals: true,
            colorize: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = ColoringOptions::default();
        assert!(opts.whole_words);
        assert!(opts.case_insensitive);
        assert!(opts.bold);
        assert!(!opts.italic);
        assert!(opts.bold_plurals);
        assert!(opts.colorize);
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let opts: ColoringOptions = serde_json::from_str(r#"{"italic": true, "bold": false}"#).unwrap();
        assert!(opts.italic);
        assert!(!opts.bold);
        assert!(opts.whole_words);
        assert!(opts.colorize);
    }
}
