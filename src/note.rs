//! Core data structures for the simplenotes application.
//!
//! This module contains the `Note` record, its id generator and the clock
//! used to stamp creation and modification times.
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum title length accepted from user input, in characters.
pub const MAX_TITLE_CHARS: usize = 120;

/// Represents a single note in our system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier for the note
    pub id: String,
    /// Note title, never empty once stored
    pub title: String,
    /// Free-form note body
    pub content: String,
    /// Milliseconds since the Unix epoch when the note was created
    pub created_at: i64,
    /// Milliseconds since the Unix epoch of the last edit or pin change
    pub updated_at: i64,
    /// Pinned notes are listed before all others
    #[serde(default)]
    pub pinned: bool,
}

impl Note {
    /// Creates a new unpinned note stamped with `now`.
    pub fn new(title: impl Into<String>, content: impl Into<String>, now: i64) -> Self {
        Note {
            id: generate_note_id(),
            title: title.into(),
            content: content.into(),
            created_at: now,
            updated_at: now,
            pinned: false,
        }
    }

    /// Returns `true` if `needle` (already lowercased) occurs in the title or content.
    pub fn matches(&self, needle: &str) -> bool {
        format!("{}\n{}", self.title, self.content)
            .to_lowercase()
            .contains(needle)
    }

    /// Moves `updated_at` forward to `now`, never below `created_at`.
    pub(crate) fn touch(&mut self, now: i64) {
        self.updated_at = now.max(self.created_at);
    }
}

/// Generates a random, collision-resistant note id.
pub fn generate_note_id() -> String {
    Uuid::new_v4().to_string()
}

/// Source of "now" for note timestamps.
pub trait Clock {
    /// Current time in milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}

/// Wall clock backed by `chrono::Utc`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}
