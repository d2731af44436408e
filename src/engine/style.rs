//! Wrapper style
//!
//! Inline CSS declarations for an annotation wrapper. The color is copied
//! verbatim from the dictionary; it is never validated.

use super::markup::MARKER_CLASS;
use super::options::ColoringOptions;

/// Style switches for a wrapper, independent of the term's color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WrapperStyle {
    pub colorize: bool,
    pub bold: bool,
    pub italic: bool,
}

impl WrapperStyle {
    pub fn from_options(opts: &ColoringOptions) -> Self {
        Self {
            colorize: opts.colorize,
            bold: opts.bold,
            italic: opts.italic,
        }
    }

    /// True when no declaration would be emitted for any color
    pub fn is_empty(&self) -> bool {
        !(self.colorize || self.bold || self.italic)
    }

    /// Declarations for one match, e.g. `color:#f00; font-weight:bold;`
    pub fn declarations(&self, color: &str) -> String {
        let mut bits = Vec::with_capacity(3);
        if self.colorize {
            bits.push(format!("color:{};", color));
        }
        if self.bold {
            bits.push("font-weight:bold;".to_string());
        }
        if self.italic {
            bits.push("font-style:italic;".to_string());
        }
        bits.join(" ")
    }

    /// Append `text` wrapped in a marker span to `out`
    ///
    /// Returns false, appending `text` unchanged, when there is nothing
    /// to declare.
    pub fn wrap_into(&self, out: &mut String, text: &str, color: &str) -> bool {
        let style = self.declarations(color);
        if style.is_empty() {
            out.push_str(text);
            return false;
        }
        out.push_str(&format!(
            r#"<span class="{}" style="{}">{}</span>"#,
            MARKER_CLASS, style, text
        ));
        true
    }
}
