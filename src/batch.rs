//! Batch coloring of notes
//!
//! Runs the engine over every field of a set of notes exported from the
//! flashcard host. The matcher is compiled once per run and held fixed
//! until the last note is done; a run can only be stopped between notes.
//!
//! Notes file format:
//! ```text
//! [
//!   { "id": 1, "deck": "Anatomy::Heart", "model": "Basic",
//!     "fields": { "Front": "...", "Back": "..." } }
//! ]
//! ```

use std::fs;
use std::ops::ControlFlow;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dictionary::TermTable;
use crate::engine::{Annotator, ColoringOptions, CompiledMatcher};
use crate::error::{ColorCodeError, Result};

/// Note limit for unattended runs
pub const AUTO_RUN_LIMIT: usize = 1500;

/// Emit a progress line every this many notes
const PROGRESS_EVERY: usize = 200;

/// A note as exported from the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    #[serde(default)]
    pub deck: String,
    /// Note type name
    #[serde(default)]
    pub model: String,
    /// Set when the host reports a cloze note type
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub cloze: bool,
    /// Field name → HTML, in note type order
    pub fields: IndexMap<String, String>,
}

impl Note {
    pub fn is_cloze(&self) -> bool {
        self.cloze || self.model.contains("Cloze")
    }
}

/// Which notes a run touches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    /// Deck names to process; empty means every note
    pub decks: Vec<String>,
    /// Also process `deck::child` decks
    pub include_subdecks: bool,
    pub skip_cloze: bool,
    /// Refuse to run on more selected notes than this
    pub max_notes: Option<usize>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            decks: Vec::new(),
            include_subdecks: true,
            skip_cloze: false,
            max_notes: None,
        }
    }
}

impl BatchOptions {
    /// Whether a note in `deck` belongs to this run
    pub fn selects(&self, deck: &str) -> bool {
        if self.decks.is_empty() {
            return true;
        }
        self.decks.iter().any(|wanted| {
            deck == wanted
                || (self.include_subdecks
                    && deck
                        .strip_prefix(wanted.as_str())
                        .is_some_and(|rest| rest.starts_with("::")))
        })
    }
}

/// Position reported before each note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub index: usize,
    pub total: usize,
}

/// Counts for a finished (or stopped) run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub notes_seen: usize,
    pub notes_modified: usize,
    pub total_replacements: usize,
    /// The progress callback stopped the run early
    pub cancelled: bool,
}

/// Color every selected note in place
///
/// `progress` is called before each note; returning `Break` stops the
/// run, leaving already processed notes modified.
pub fn run<F>(
    notes: &mut [Note],
    table: &TermTable,
    coloring: &ColoringOptions,
    batch: &BatchOptions,
    mut progress: F,
) -> Result<BatchReport>
where
    F: FnMut(Progress) -> ControlFlow<()>,
{
    if table.is_empty() {
        return Err(ColorCodeError::EmptyDictionary);
    }

    let selected: Vec<usize> = notes
        .iter()
        .enumerate()
        .filter(|(_, note)| batch.selects(&note.deck))
        .map(|(i, _)| i)
        .collect();
    if let Some(limit) = batch.max_notes {
        if selected.len() > limit {
            return Err(ColorCodeError::TooManyNotes {
                count: selected.len(),
                limit,
            });
        }
    }

    let matcher = CompiledMatcher::compile(table, coloring)?;
    let annotator = Annotator::new(&matcher, coloring);
    let total = selected.len();
    info!(notes = total, terms = matcher.len(), "coloring notes");

    let mut report = BatchReport::default();
    for (index, &i) in selected.iter().enumerate() {
        if progress(Progress { index, total }).is_break() {
            report.cancelled = true;
            break;
        }
        if index % PROGRESS_EVERY == 0 {
            info!("processing notes ({}/{})", index + 1, total);
        }

        let note = &mut notes[i];
        report.notes_seen += 1;
        if batch.skip_cloze && note.is_cloze() {
            continue;
        }

        let mut modified = false;
        for value in note.fields.values_mut() {
            let out = annotator.apply(value);
            // Write back even when only normalization changed the text
            if out.is_changed_from(value) {
                *value = out.html;
                report.total_replacements += out.replacements;
                modified = true;
            }
        }
        if modified {
            report.notes_modified += 1;
        }
    }

    Ok(report)
}

/// Read a notes file
pub fn load_notes(path: &Path) -> Result<Vec<Note>> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Write a notes file
pub fn save_notes(path: &Path, notes: &[Note]) -> Result<()> {
    let mut json = serde_json::to_string_pretty(notes)?;
    json.push('\n');
    fs::write(path, json)?;
    Ok(())
}
