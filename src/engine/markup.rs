//! Markup handling
//!
//! Removal of previous annotation wrappers and a tag-safe split of a
//! fragment into text and tag segments. Tags are found with a naive
//! `<[^>]+>` scan, so a `>` inside a quoted attribute value ends the tag
//! early.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Class carried by every wrapper this crate emits
pub const MARKER_CLASS: &str = "cc-color";

static WRAPPER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<span class="cc-color"[^>]*>(.*?)</span>"#).expect("valid wrapper regex")
});

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));

/// A piece of a fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text between tags, eligible for matching
    Text(&'a str),
    /// A literal tag, never touched
    Tag(&'a str),
}

impl<'a> Segment<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            Segment::Text(s) | Segment::Tag(s) => s,
        }
    }
}

/// Unwrap every annotation wrapper, keeping its inner content
pub fn strip_annotations(fragment: &str) -> Cow<'_, str> {
    WRAPPER.replace_all(fragment, "${1}")
}

/// Split a fragment into alternating text and tag segments
///
/// Concatenating the segments reproduces the input exactly. Empty text
/// runs between adjacent tags are omitted.
pub fn segments(fragment: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut last = 0;
    for tag in TAG.find_iter(fragment) {
        if tag.start() > last {
            out.push(Segment::Text(&fragment[last..tag.start()]));
        }
        out.push(Segment::Tag(tag.as_str()));
        last = tag.end();
    }
    if last < fragment.len() {
        out.push(Segment::Text(&fragment[last..]));
    }
    out
}
