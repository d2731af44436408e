//! Terminal preview
//!
//! Renders annotated fragments and the term table to a terminal using
//! crossterm colors, so a run can be checked without opening the host.

mod style;

pub use style::{Rgb, Span, Style};

use std::io::Write;
use std::sync::LazyLock;

use crossterm::queue;
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use regex::Regex;
use unicode_width::UnicodeWidthStr;

use crate::dictionary::TermTable;
use crate::engine::{segments, Segment, MARKER_CLASS};
use crate::error::Result;

static TAG_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<\s*(/?)\s*([A-Za-z][A-Za-z0-9]*)").expect("valid tag name regex"));

static STYLE_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\bstyle\s*=\s*"([^"]*)""#).expect("valid style regex"));

/// Tags that end a visual line
const LINE_BREAKS: &[&str] = &["br", "hr"];
const BLOCK_ENDS: &[&str] = &["p", "div", "li", "tr", "h1", "h2", "h3", "h4", "h5", "h6"];

/// Plain text of a fragment with the styled ranges of its wrappers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub spans: Vec<Span>,
}

/// Interpret an annotated fragment for terminal display
///
/// Only the engine's own wrappers carry style; other tags are dropped,
/// except line breaks and block ends which become newlines.
pub fn render_fragment(html: &str) -> Rendered {
    let mut rendered = Rendered::default();
    // One slot per open <span>, Some for our wrappers
    let mut open: Vec<Option<Style>> = Vec::new();

    for segment in segments(html) {
        match segment {
            Segment::Tag(tag) => {
                let Some(caps) = TAG_NAME.captures(tag) else {
                    continue;
                };
                let closing = !caps[1].is_empty();
                let name = caps[2].to_ascii_lowercase();
                match (closing, name.as_str()) {
                    (false, "span") => open.push(wrapper_style(tag)),
                    (true, "span") => {
                        open.pop();
                    }
                    (_, n) if LINE_BREAKS.contains(&n) => rendered.text.push('\n'),
                    (true, n) if BLOCK_ENDS.contains(&n) => rendered.text.push('\n'),
                    _ => {}
                }
            }
            Segment::Text(text) => {
                let start = rendered.text.len();
                rendered.text.push_str(&decode_entities(text));
                let end = rendered.text.len();
                let style = open.iter().rev().find_map(|s| *s);
                if let Some(style) = style.filter(|s| !s.is_default()) {
                    if end > start {
                        rendered.spans.push(Span::new(start, end, style));
                    }
                }
            }
        }
    }

    rendered
}

/// Style of an opening span tag, if it is one of our wrappers
fn wrapper_style(tag: &str) -> Option<Style> {
    if !tag.contains(MARKER_CLASS) {
        return None;
    }
    let css = STYLE_ATTR.captures(tag).map(|c| c[1].to_string()).unwrap_or_default();
    Some(Style::from_declarations(&css))
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

fn term_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Write a rendered fragment with its styles
pub fn print_fragment<W: Write>(out: &mut W, rendered: &Rendered) -> Result<()> {
    let mut pos = 0;
    for span in &rendered.spans {
        if span.start > pos {
            queue!(out, Print(&rendered.text[pos..span.start]))?;
        }
        if let Some(fg) = span.style.fg {
            queue!(out, SetForegroundColor(term_color(fg)))?;
        }
        if span.style.bold {
            queue!(out, SetAttribute(Attribute::Bold))?;
        }
        if span.style.italic {
            queue!(out, SetAttribute(Attribute::Italic))?;
        }
        queue!(
            out,
            Print(&rendered.text[span.start..span.end]),
            SetAttribute(Attribute::Reset),
            ResetColor
        )?;
        pos = span.end;
    }
    if pos < rendered.text.len() {
        queue!(out, Print(&rendered.text[pos..]))?;
    }
    if !rendered.text.ends_with('\n') {
        queue!(out, Print("\n"))?;
    }
    out.flush()?;
    Ok(())
}

/// Write the term table with a color swatch per row
pub fn print_table<W: Write>(out: &mut W, table: &TermTable) -> Result<()> {
    let word_width = table
        .iter()
        .map(|e| e.word.width())
        .chain(std::iter::once("Word".width()))
        .max()
        .unwrap_or(0);
    let color_width = table
        .iter()
        .map(|e| e.color.width())
        .chain(std::iter::once("Color".width()))
        .max()
        .unwrap_or(0);

    queue!(
        out,
        SetAttribute(Attribute::Bold),
        Print(format!(
            "{}  {}  Group\n",
            pad("Word", word_width),
            pad("Color", color_width)
        )),
        SetAttribute(Attribute::Reset)
    )?;

    for entry in table {
        queue!(out, Print(format!("{}  ", pad(&entry.word, word_width))))?;
        let swatch = pad(&entry.color, color_width);
        match Rgb::parse(&entry.color) {
            Some(rgb) => queue!(
                out,
                SetBackgroundColor(term_color(rgb)),
                SetForegroundColor(term_color(rgb.contrasting())),
                Print(swatch),
                ResetColor
            )?,
            None => queue!(out, Print(swatch))?,
        }
        queue!(out, Print(format!("  {}\n", entry.group)))?;
    }
    out.flush()?;
    Ok(())
}

/// Left-align to a display width
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::TermEntry;

    #[test]
    fn test_render_wrappers() {
        let html = concat!(
            r#"The <span class="cc-color" style="color:#ff0000; font-weight:bold;">Ganglia</span>"#,
            " are <b>visible</b>."
        );
        let rendered = render_fragment(html);
        assert_eq!(rendered.text, "The Ganglia are visible.");
        assert_eq!(rendered.spans.len(), 1);
        let span = &rendered.spans[0];
        assert_eq!(&rendered.text[span.start..span.end], "Ganglia");
        assert_eq!(span.style.fg, Some(Rgb::new(255, 0, 0)));
        assert!(span.style.bold);
    }

    #[test]
    fn test_render_other_spans_unstyled() {
        let html = r#"<span class="x">plain</span> <span class="cc-color" style="font-style:italic;">it</span>"#;
        let rendered = render_fragment(html);
        assert_eq!(rendered.text, "plain it");
        assert_eq!(rendered.spans, vec![Span::new(6, 8, Style { italic: true, ..Default::default() })]);
    }

    #[test]
    fn test_render_breaks_and_entities() {
        let rendered = render_fragment("<div>a&nbsp;&amp;&lt;b</div>c<br/>d");
        assert_eq!(rendered.text, "a &<b\nc\nd");
        assert!(rendered.spans.is_empty());
    }

    #[test]
    fn test_print_fragment_plain() {
        let mut buf = Vec::new();
        print_fragment(&mut buf, &render_fragment("<i>hello</i>")).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "hello\n");
    }

    #[test]
    fn test_print_fragment_styled() {
        let mut buf = Vec::new();
        let html = r#"a <span class="cc-color" style="color:red;">b</span> c"#;
        print_fragment(&mut buf, &render_fragment(html)).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.starts_with("a "));
        assert!(out.contains("\u{1b}[38;2;255;0;0m"));
        assert!(out.ends_with(" c\n"));
    }

    #[test]
    fn test_print_table_aligns_columns() {
        let table: TermTable = vec![
            TermEntry::new("Übergang", "de", "not-a-color").unwrap(),
            TermEntry::new("x", "", "zzz").unwrap(),
        ]
        .into_iter()
        .collect();
        let mut buf = Vec::new();
        print_table(&mut buf, &table).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("Übergang  not-a-color  de\n"));
        assert!(out.contains("x         zzz          \n"));
    }

    #[test]
    fn test_pad_uses_display_width() {
        assert_eq!(pad("日本", 6), "日本  ");
        assert_eq!(pad("abc", 2), "abc");
    }
}
