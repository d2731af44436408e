//! Style types for terminal preview
//!
//! Terminal-side mirror of the inline CSS the engine writes into its
//! wrappers, plus byte-range spans over rendered plain text.

/// A 24-bit color parsed from CSS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// The 16 basic CSS color keywords
const NAMED: &[(&str, Rgb)] = &[
    ("black", Rgb::new(0x00, 0x00, 0x00)),
    ("silver", Rgb::new(0xc0, 0xc0, 0xc0)),
    ("gray", Rgb::new(0x80, 0x80, 0x80)),
    ("grey", Rgb::new(0x80, 0x80, 0x80)),
    ("white", Rgb::new(0xff, 0xff, 0xff)),
    ("maroon", Rgb::new(0x80, 0x00, 0x00)),
    ("red", Rgb::new(0xff, 0x00, 0x00)),
    ("purple", Rgb::new(0x80, 0x00, 0x80)),
    ("fuchsia", Rgb::new(0xff, 0x00, 0xff)),
    ("green", Rgb::new(0x00, 0x80, 0x00)),
    ("lime", Rgb::new(0x00, 0xff, 0x00)),
    ("olive", Rgb::new(0x80, 0x80, 0x00)),
    ("yellow", Rgb::new(0xff, 0xff, 0x00)),
    ("navy", Rgb::new(0x00, 0x00, 0x80)),
    ("blue", Rgb::new(0x00, 0x00, 0xff)),
    ("teal", Rgb::new(0x00, 0x80, 0x80)),
    ("aqua", Rgb::new(0x00, 0xff, 0xff)),
];

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb`, `#rrggbb`, `rgb(r, g, b)` or a basic color name
    pub fn parse(css: &str) -> Option<Self> {
        let css = css.trim().to_ascii_lowercase();

        if let Some(hex) = css.strip_prefix('#') {
            if !hex.is_ascii() {
                return None;
            }
            return match hex.len() {
                3 => {
                    let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
                    Some(Self::new(digit(0)?, digit(1)?, digit(2)?))
                }
                6 => {
                    let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
                    Some(Self::new(pair(0)?, pair(2)?, pair(4)?))
                }
                _ => None,
            };
        }

        if let Some(args) = css.strip_prefix("rgb(").and_then(|s| s.strip_suffix(')')) {
            let parts: Vec<u8> = args
                .split(',')
                .map(|p| p.trim().parse::<u8>())
                .collect::<Result<_, _>>()
                .ok()?;
            return match parts[..] {
                [r, g, b] => Some(Self::new(r, g, b)),
                _ => None,
            };
        }

        NAMED.iter().find(|(name, _)| *name == css).map(|(_, rgb)| *rgb)
    }

    /// Relative luminance in 0.0..=1.0
    pub fn luminance(&self) -> f32 {
        let (r, g, b) = (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        );
        0.2126 * r + 0.7152 * g + 0.0722 * b
    }

    /// Readable text color on top of this one
    pub fn contrasting(&self) -> Self {
        if self.luminance() > 0.6 {
            Self::new(0, 0, 0)
        } else {
            Self::new(0xff, 0xff, 0xff)
        }
    }
}

/// Text style attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    /// Foreground color
    pub fg: Option<Rgb>,
    /// Bold text
    pub bold: bool,
    /// Italic text
    pub italic: bool,
}

impl Style {
    /// Read the declarations of an inline `style` attribute
    ///
    /// Unknown properties and unparseable colors are ignored.
    pub fn from_declarations(css: &str) -> Self {
        let mut style = Self::default();
        for decl in css.split(';') {
            let Some((prop, value)) = decl.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match prop.trim().to_ascii_lowercase().as_str() {
                "color" => style.fg = Rgb::parse(value),
                "font-weight" => style.bold = value.eq_ignore_ascii_case("bold"),
                "font-style" => style.italic = value.eq_ignore_ascii_case("italic"),
                _ => {}
            }
        }
        style
    }

    /// Check if this is the default (no styling)
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Byte range of rendered text drawn with one wrapper's style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub style: Style,
}

impl Span {
    pub fn new(start: usize, end: usize, style: Style) -> Self {
        Self { start, end, style }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(Rgb::parse("#ff0000"), Some(Rgb::new(255, 0, 0)));
        assert_eq!(Rgb::parse(" #0F8 "), Some(Rgb::new(0, 0xff, 0x88)));
        assert_eq!(Rgb::parse("#12345"), None);
        assert_eq!(Rgb::parse("#gg0000"), None);
    }

    #[test]
    fn test_parse_rgb_and_names() {
        assert_eq!(Rgb::parse("rgb(10, 20, 30)"), Some(Rgb::new(10, 20, 30)));
        assert_eq!(Rgb::parse("rgb(10,20)"), None);
        assert_eq!(Rgb::parse("rgb(300,0,0)"), None);
        assert_eq!(Rgb::parse("Navy"), Some(Rgb::new(0, 0, 0x80)));
        assert_eq!(Rgb::parse("hotpink"), None);
    }

    #[test]
    fn test_contrasting() {
        assert_eq!(Rgb::parse("yellow").unwrap().contrasting(), Rgb::new(0, 0, 0));
        assert_eq!(Rgb::parse("navy").unwrap().contrasting(), Rgb::new(255, 255, 255));
    }

    #[test]
    fn test_style_from_declarations() {
        let style = Style::from_declarations("color:#ff0000; font-weight:bold;");
        assert_eq!(style.fg, Some(Rgb::new(255, 0, 0)));
        assert!(style.bold);
        assert!(!style.italic);

        let style = Style::from_declarations("font-style: italic");
        assert!(style.italic);
        assert!(Style::from_declarations("margin:0").is_default());
    }
}
