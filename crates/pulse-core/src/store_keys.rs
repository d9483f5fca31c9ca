//! Document-store key/path conventions.
//!
//! Pure string functions — no AWS SDK dependency. These define the canonical
//! layout of objects in the Pulse bucket.

use uuid::Uuid;

pub fn subject(id: Uuid) -> String {
    format!("subjects/{id}.json")
}

pub const SUBJECTS_PREFIX: &str = "subjects/";
