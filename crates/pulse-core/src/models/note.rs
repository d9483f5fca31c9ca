use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Maximum number of notes retained per subject (FIFO cap).
pub const MAX_NOTE_ENTRIES: usize = 200;

/// Origin of a free-text note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum NoteSource {
    Advisory,
    Clinician,
}

/// A free-text annotation attached to a subject. Append-only, FIFO-capped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NoteEntry {
    pub value: String,
    pub date: Date,
    pub source: NoteSource,
}
