//! Term dictionary
//!
//! The user-maintained table of `{word, group, color}` records. Stored as
//! a JSON array:
//!
//! ```text
//! [
//!   { "word": "ganglion", "group": "anatomy", "color": "#ff0000" },
//!   { "word": "Heart Attack", "group": "", "color": "rgb(200,0,0)" }
//! ]
//! ```
//!
//! Records are validated when the table is built: anything that is not an
//! object with a non-empty `word` and `color` is dropped and counted.
//! `group` is carried for editing and storage only and never affects
//! matching.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{ColorCodeError, Result};

/// One dictionary record
///
/// A table only ever holds entries that pass [`TermEntry::new`]; hand-built
/// entries are normalized or rejected on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermEntry {
    pub word: String,
    pub group: String,
    pub color: String,
}

impl TermEntry {
    /// Build a trimmed entry, or None if `word` or `color` is blank
    pub fn new(word: &str, group: &str, color: &str) -> Option<Self> {
        let word = word.trim();
        let color = color.trim();
        if word.is_empty() || color.is_empty() {
            return None;
        }
        Some(Self {
            word: word.to_string(),
            group: group.trim().to_string(),
            color: color.to_string(),
        })
    }

    fn normalized(self) -> Option<Self> {
        Self::new(&self.word, &self.group, &self.color)
    }
}

/// Shape accepted for a stored record before validation
#[derive(Deserialize)]
struct RawEntry {
    #[serde(default)]
    word: Option<String>,
    #[serde(default)]
    group: Option<String>,
    #[serde(default)]
    color: Option<String>,
}

impl RawEntry {
    fn validate(self) -> Option<TermEntry> {
        TermEntry::new(
            self.word.as_deref().unwrap_or_default(),
            self.group.as_deref().unwrap_or_default(),
            self.color.as_deref().unwrap_or_default(),
        )
    }
}

/// A table loaded from untrusted records
#[derive(Debug, Clone, Default)]
pub struct Loaded {
    pub table: TermTable,
    /// Records rejected during validation
    pub dropped: usize,
}

/// Outcome of a non-destructive merge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub added: usize,
    /// Words already in the table
    pub skipped: usize,
    /// Entries with a blank word or color
    pub rejected: usize,
}

/// Ordered collection of valid entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermTable {
    entries: Vec<TermEntry>,
}

impl TermTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate arbitrary JSON records, keeping the good ones in order
    pub fn from_records(records: Vec<Value>) -> Loaded {
        let total = records.len();
        let table: TermTable = records
            .into_iter()
            .filter_map(|value| serde_json::from_value::<RawEntry>(value).ok())
            .filter_map(RawEntry::validate)
            .collect();
        let dropped = total - table.len();
        if dropped > 0 {
            debug!(dropped, kept = table.len(), "dropped invalid dictionary records");
        }
        Loaded { table, dropped }
    }

    /// Parse a JSON array of records
    pub fn parse(json: &str) -> Result<Loaded> {
        match serde_json::from_str::<Value>(json)? {
            Value::Array(records) => Ok(Self::from_records(records)),
            _ => Err(ColorCodeError::Message(
                "expected a JSON array of {word, group, color} objects".to_string(),
            )),
        }
    }

    /// Load a dictionary file
    pub fn load(path: &Path) -> Result<Loaded> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Pretty JSON, 2-space indent, non-ASCII kept as is
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    /// Write the dictionary file
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut json = self.to_json()?;
        json.push('\n');
        fs::write(path, json)?;
        Ok(())
    }

    /// Word→color mapping used for matching
    ///
    /// A repeated word keeps its first position but takes the color of
    /// its last occurrence.
    pub fn color_map(&self) -> IndexMap<&str, &str> {
        let mut map = IndexMap::with_capacity(self.entries.len());
        for entry in &self.entries {
            map.insert(entry.word.as_str(), entry.color.as_str());
        }
        map
    }

    /// Append entries whose word is not present yet
    ///
    /// Existing entries always win; an incoming word seen earlier in the
    /// same batch is skipped too.
    pub fn merge<I>(&mut self, incoming: I) -> MergeReport
    where
        I: IntoIterator<Item = TermEntry>,
    {
        let mut existing: HashSet<String> = self.entries.iter().map(|e| e.word.clone()).collect();
        let mut report = MergeReport::default();
        for entry in incoming {
            let Some(entry) = entry.normalized() else {
                report.rejected += 1;
                continue;
            };
            if !existing.insert(entry.word.clone()) {
                report.skipped += 1;
                continue;
            }
            self.entries.push(entry);
            report.added += 1;
        }
        report
    }

    /// Replace the whole table
    pub fn replace<I>(&mut self, incoming: I)
    where
        I: IntoIterator<Item = TermEntry>,
    {
        self.entries = incoming.into_iter().filter_map(TermEntry::normalized).collect();
    }

    /// Append an entry, returning false if it has a blank word or color
    pub fn push(&mut self, entry: TermEntry) -> bool {
        match entry.normalized() {
            Some(entry) => {
                self.entries.push(entry);
                true
            }
            None => false,
        }
    }

    /// Remove every entry for `word`, returning how many were removed
    pub fn remove(&mut self, word: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.word != word);
        before - self.entries.len()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.iter().any(|e| e.word == word)
    }

    pub fn entries(&self) -> &[TermEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TermEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<TermEntry> for TermTable {
    fn from_iter<I: IntoIterator<Item = TermEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().filter_map(TermEntry::normalized).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a TermTable {
    type Item = &'a TermEntry;
    type IntoIter = std::slice::Iter<'a, TermEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(word: &str, color: &str) -> TermEntry {
        TermEntry::new(word, "", color).unwrap()
    }

    #[test]
    fn test_entry_trims_and_validates() {
        let e = TermEntry::new("  heart ", " cardio ", " red ").unwrap();
        assert_eq!(e.word, "heart");
        assert_eq!(e.group, "cardio");
        assert_eq!(e.color, "red");
        assert!(TermEntry::new("  ", "", "red").is_none());
        assert!(TermEntry::new("heart", "g", "").is_none());
    }

    #[test]
    fn test_parse_drops_invalid_records() {
        let json = r##"[
            {"word": "ganglion", "group": "anatomy", "color": "#ff0000"},
            {"word": "", "color": "#00ff00"},
            {"word": "aorta"},
            "not an object",
            {"word": 5, "color": "red"},
            {"word": "vein", "group": null, "color": "blue"}
        ]"##;
        let loaded = TermTable::parse(json).unwrap();
        assert_eq!(loaded.dropped, 4);
        let words: Vec<&str> = loaded.table.iter().map(|e| e.word.as_str()).collect();
        assert_eq!(words, vec!["ganglion", "vein"]);
        assert_eq!(loaded.table.entries()[1].group, "");
    }

    #[test]
    fn test_parse_rejects_non_array() {
        assert!(TermTable::parse(r#"{"word": "x"}"#).is_err());
        assert!(TermTable::parse("not json").is_err());
    }

    #[test]
    fn test_color_map_last_write_wins() {
        let table: TermTable = vec![entry("a", "1"), entry("b", "2"), entry("a", "3")]
            .into_iter()
            .collect();
        let map = table.color_map();
        let pairs: Vec<(&str, &str)> = map.into_iter().collect();
        assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_merge_skips_existing_words() {
        let mut table: TermTable = vec![entry("heart", "red")].into_iter().collect();
        let report = table.merge(vec![
            entry("heart", "blue"),
            entry("lung", "green"),
            entry("lung", "pink"),
        ]);
        assert_eq!(
            report,
            MergeReport {
                added: 1,
                skipped: 2,
                rejected: 0
            }
        );
        assert_eq!(table.color_map().get("heart"), Some(&"red"));
        assert_eq!(table.color_map().get("lung"), Some(&"green"));
    }

    #[test]
    fn test_replace_and_remove() {
        let mut table: TermTable = vec![entry("a", "1"), entry("b", "2")].into_iter().collect();
        assert_eq!(table.remove("a"), 1);
        assert_eq!(table.remove("zzz"), 0);
        table.replace(vec![entry("c", "3")]);
        assert_eq!(table.len(), 1);
        assert!(table.contains("c"));
    }

    #[test]
    fn test_json_keeps_field_order_and_unicode() {
        let table: TermTable = vec![TermEntry::new("Übergang", "de", "#abc").unwrap()]
            .into_iter()
            .collect();
        let json = table.to_json().unwrap();
        assert!(json.contains("Übergang"));
        let word_at = json.find("\"word\"").unwrap();
        let group_at = json.find("\"group\"").unwrap();
        let color_at = json.find("\"color\"").unwrap();
        assert!(word_at < group_at && group_at < color_at);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("colorcoding_data.json");
        let table: TermTable = vec![entry("heart", "red"), entry("lung", "blue")]
            .into_iter()
            .collect();
        table.save(&path).unwrap();
        let loaded = TermTable::load(&path).unwrap();
        assert_eq!(loaded.dropped, 0);
        assert_eq!(loaded.table, table);
    }

    #[test]
    fn test_hand_built_entries_validated() {
        let blank_color = TermEntry {
            word: "heart".to_string(),
            group: String::new(),
            color: "  ".to_string(),
        };
        let padded = TermEntry {
            word: " lung ".to_string(),
            group: " resp ".to_string(),
            color: " blue ".to_string(),
        };

        let mut table = TermTable::new();
        assert!(!table.push(blank_color.clone()));
        assert!(table.push(padded.clone()));
        assert_eq!(table.entries(), &[TermEntry::new("lung", "resp", "blue").unwrap()]);

        let collected: TermTable = vec![blank_color.clone(), padded].into_iter().collect();
        assert_eq!(collected.len(), 1);
        assert!(collected.iter().all(|e| !e.color.is_empty()));

        let report = table.merge(vec![blank_color, entry("lung", "red"), entry("aorta", "red")]);
        assert_eq!(
            report,
            MergeReport {
                added: 1,
                skipped: 1,
                rejected: 1
            }
        );
    }

    #[test]
    fn test_merge_large_tables() {
        let mut table: TermTable = (0..2000).map(|i| entry(&format!("w{}", i), "c")).collect();
        let report = table.merge((1000..3000).map(|i| entry(&format!("w{}", i), "d")));
        assert_eq!(report.added, 1000);
        assert_eq!(report.skipped, 1000);
        assert_eq!(table.len(), 3000);
        assert_eq!(table.color_map().get("w1500"), Some(&"c"));
    }
}
