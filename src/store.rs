//! The in-memory note collection and its mutation rules.
//!
//! `NoteStore` owns the canonical list of notes. Every successful mutation is
//! written through the [`NotePersistence`] adapter; views are derived on read.

use log::{debug, info, warn};

use crate::{Clock, KeyValueStorage, Note, NotePersistence, NotesError, Result, SystemClock};

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;

/// User confirmation asked before a destructive action.
pub trait Confirm {
    /// Returns `true` if the user accepts `message`.
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

/// Result of [`NoteStore::delete_with_confirmation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The note was removed.
    Deleted(Note),
    /// The user declined; nothing changed.
    Cancelled,
}

/// Owns the note collection and keeps storage in sync with it.
pub struct NoteStore<S: KeyValueStorage> {
    /// Collection in insertion order, newest first
    notes: Vec<Note>,

    persistence: NotePersistence<S>,

    clock: Box<dyn Clock>,

    /// Whether the most recent write reached storage
    last_save_ok: bool,
}

impl<S: KeyValueStorage> NoteStore<S> {
    /// Loads the stored collection, seeding starter notes if there is none.
    pub fn open(persistence: NotePersistence<S>) -> Self {
        Self::open_with_clock(persistence, Box::new(SystemClock))
    }

    /// Like [`NoteStore::open`], reading time from `clock`.
    pub fn open_with_clock(persistence: NotePersistence<S>, clock: Box<dyn Clock>) -> Self {
        let loaded = persistence
            .load_at(clock.now_millis())
            .unwrap_or_default();
        let mut store = Self {
            notes: loaded,
            persistence,
            clock,
            last_save_ok: true,
        };

        if store.notes.is_empty() {
            info!("No stored notes, seeding starter content");
            store.notes = store.seed();
            store.persist();
        }

        store
    }

    /// Wraps an existing collection without reading storage.
    pub fn with_notes(
        notes: Vec<Note>,
        persistence: NotePersistence<S>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            notes,
            persistence,
            clock,
            last_save_ok: true,
        }
    }

    /// Creates a note and stores it at the front of the collection.
    pub fn create(&mut self, title: &str, content: &str) -> Result<Note> {
        let title = validate_title(title)?;
        let note = Note::new(title, content, self.clock.now_millis());
        info!("Creating note: {}", note.id);

        self.notes.insert(0, note.clone());
        self.persist();
        Ok(note)
    }

    /// Replaces title and content of an existing note.
    pub fn update(&mut self, id: &str, title: &str, content: &str) -> Result<Note> {
        let title = validate_title(title)?;
        let now = self.clock.now_millis();
        let note = self.find_mut(id)?;

        note.title = title.to_string();
        note.content = content.to_string();
        note.touch(now);
        let updated = note.clone();

        info!("Updated note: {}", id);
        self.persist();
        Ok(updated)
    }

    /// Flips the pinned flag of a note.
    pub fn toggle_pin(&mut self, id: &str) -> Result<Note> {
        let now = self.clock.now_millis();
        let note = self.find_mut(id)?;

        note.pinned = !note.pinned;
        note.touch(now);
        let toggled = note.clone();

        info!("Note {} pinned: {}", id, toggled.pinned);
        self.persist();
        Ok(toggled)
    }

    /// Removes a note. Returns `false`, changing nothing, if `id` is unknown.
    ///
    /// No confirmation is asked here; see [`NoteStore::delete_with_confirmation`].
    pub fn delete(&mut self, id: &str) -> bool {
        let Some(index) = self.notes.iter().position(|n| n.id == id) else {
            debug!("Cannot delete note {}: not found", id);
            return false;
        };

        self.notes.remove(index);
        info!("Deleted note: {}", id);
        self.persist();
        true
    }

    /// Asks `confirm` before deleting the note.
    pub fn delete_with_confirmation(
        &mut self,
        id: &str,
        confirm: &mut dyn Confirm,
    ) -> Result<DeleteOutcome> {
        let note = self.get(id).ok_or_else(|| NotesError::NoteNotFound {
            id: id.to_string(),
        })?;

        let message = format!("Delete \"{}\"? This cannot be undone.", note.title);
        if !confirm.confirm(&message) {
            debug!("Deletion of {} cancelled", id);
            return Ok(DeleteOutcome::Cancelled);
        }

        self.delete(id);
        Ok(DeleteOutcome::Deleted(note))
    }

    /// Returns a copy of the note with `id`.
    pub fn get(&self, id: &str) -> Option<Note> {
        self.notes.iter().find(|n| n.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// All notes, pinned first, then most recently updated first.
    ///
    /// Ties keep collection order.
    pub fn sorted_view(&self) -> Vec<Note> {
        let mut sorted = self.notes.clone();
        sort_notes(&mut sorted);
        sorted
    }

    /// Sorted notes whose title or content contains `query`, ignoring case.
    ///
    /// A blank query returns the full sorted view.
    pub fn filtered_view(&self, query: &str) -> Vec<Note> {
        let needle = query.trim().to_lowercase();
        let sorted = self.sorted_view();
        if needle.is_empty() {
            return sorted;
        }

        let matches: Vec<Note> = sorted.into_iter().filter(|n| n.matches(&needle)).collect();
        debug!("Query '{}' matched {} notes", needle, matches.len());
        matches
    }

    /// Starter notes used when storage holds nothing.
    pub fn seed(&self) -> Vec<Note> {
        let now = self.clock.now_millis();

        let mut welcome = Note::new(
            "Welcome to Simple Notes",
            "This app stores notes offline on this machine.\n\nTry: pinning a note, editing it, or searching for a keyword.",
            now - 6 * HOUR_MS,
        );
        welcome.updated_at = now - 2 * HOUR_MS;
        welcome.pinned = true;

        let mut checklist = Note::new(
            "Quick checklist",
            "- Add a new note\n- Edit an existing note\n- Delete with confirmation\n- Search by title/content",
            now - 45 * MINUTE_MS,
        );
        checklist.updated_at = now - 30 * MINUTE_MS;

        vec![welcome, checklist]
    }

    /// Whether the last write through the persistence adapter succeeded.
    pub fn last_save_succeeded(&self) -> bool {
        self.last_save_ok
    }

    pub fn persistence(&self) -> &NotePersistence<S> {
        &self.persistence
    }

    /// Drops every note, removes the storage slot, and reseeds.
    pub fn reset(&mut self) -> Result<()> {
        self.persistence.clear()?;
        self.notes = self.seed();
        self.persist();
        Ok(())
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut Note> {
        self.notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| NotesError::NoteNotFound { id: id.to_string() })
    }

    fn persist(&mut self) {
        self.last_save_ok = self.persistence.save(&self.notes);
        if !self.last_save_ok {
            warn!("Changes are kept in memory only; the last write was skipped");
        }
    }
}

/// Sorts pinned notes first, then by `updated_at` descending. The sort is stable.
pub fn sort_notes(notes: &mut [Note]) {
    notes.sort_by(|a, b| {
        b.pinned
            .cmp(&a.pinned)
            .then_with(|| b.updated_at.cmp(&a.updated_at))
    });
}

fn validate_title(title: &str) -> Result<&str> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(NotesError::EmptyTitle);
    }
    Ok(trimmed)
}
