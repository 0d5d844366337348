//! Whole-collection persistence of notes into a single key-value slot.
//!
//! Loading never fails: unreadable or malformed data degrades to "absent",
//! and individual malformed entries are repaired or dropped.

use std::collections::HashSet;

use log::{debug, error, info, warn};
use serde_json::{Map, Value};

use crate::{Clock, KeyValueStorage, Note, Result, SystemClock};

/// Storage slot holding the note collection. Bump the suffix to change the schema.
pub const NOTES_STORAGE_KEY: &str = "notes.v1";

/// Reads and writes the note collection as one JSON array.
#[derive(Debug)]
pub struct NotePersistence<S: KeyValueStorage> {
    storage: S,
    key: String,
}

impl<S: KeyValueStorage> NotePersistence<S> {
    /// Creates an adapter using the default `notes.v1` slot.
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, NOTES_STORAGE_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Loads the stored collection.
    ///
    /// Returns `None` when the slot is missing, empty, not JSON, or not an array.
    pub fn load(&self) -> Option<Vec<Note>> {
        self.load_at(SystemClock.now_millis())
    }

    /// Like [`NotePersistence::load`], using `now` for missing timestamps.
    pub fn load_at(&self, now: i64) -> Option<Vec<Note>> {
        let raw = match self.storage.get_item(&self.key) {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => {
                debug!("No stored notes under {}", self.key);
                return None;
            }
            Err(e) => {
                warn!("Failed to read slot {}: {}", self.key, e);
                return None;
            }
        };

        let parsed: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Stored notes under {} are not valid JSON: {}", self.key, e);
                return None;
            }
        };

        let notes = sanitize_notes(&parsed, now)?;
        info!("Loaded {} notes from {}", notes.len(), self.key);
        Some(notes)
    }

    /// Overwrites the slot with the full collection.
    ///
    /// Returns `false` if the write was skipped because serialization or the
    /// storage write failed. The previous value is left untouched in that case.
    pub fn save(&mut self, notes: &[Note]) -> bool {
        let json = match serde_json::to_string(notes) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize notes, skipping write: {}", e);
                return false;
            }
        };

        match self.storage.set_item(&self.key, &json) {
            Ok(()) => {
                debug!("Saved {} notes to {}", notes.len(), self.key);
                true
            }
            Err(e) => {
                error!("Failed to write notes to {}, skipping write: {}", self.key, e);
                false
            }
        }
    }

    /// Removes the stored collection entirely.
    pub fn clear(&mut self) -> Result<()> {
        info!("Clearing stored notes under {}", self.key);
        self.storage.remove_item(&self.key)
    }
}

/// Rebuilds notes from an untrusted JSON value.
///
/// Returns `None` unless `value` is an array. Non-object elements are skipped,
/// fields are coerced to their expected types (`now` stands in for missing
/// timestamps), and entries without an id or title, or repeating an earlier
/// id, are dropped.
pub fn sanitize_notes(value: &Value, now: i64) -> Option<Vec<Note>> {
    let entries = value.as_array()?;
    let mut seen = HashSet::with_capacity(entries.len());
    let mut notes = Vec::with_capacity(entries.len());

    for entry in entries {
        let Some(object) = entry.as_object() else {
            debug!("Skipping non-object note entry");
            continue;
        };

        let note = sanitize_note(object, now);
        if note.id.is_empty() || note.title.is_empty() {
            debug!("Dropping note entry without id or title");
            continue;
        }
        if !seen.insert(note.id.clone()) {
            warn!("Dropping duplicate note id {}", note.id);
            continue;
        }
        notes.push(note);
    }

    Some(notes)
}

fn sanitize_note(object: &Map<String, Value>, now: i64) -> Note {
    let created_at = millis_field(object, "createdAt").unwrap_or(now);
    let updated_at = millis_field(object, "updatedAt").unwrap_or(now);

    Note {
        id: string_field(object, "id"),
        title: string_field(object, "title"),
        content: string_field(object, "content"),
        created_at,
        updated_at: updated_at.max(created_at),
        pinned: object.get("pinned").is_some_and(is_truthy),
    }
}

fn string_field(object: &Map<String, Value>, name: &str) -> String {
    object
        .get(name)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn millis_field(object: &Map<String, Value>, name: &str) -> Option<i64> {
    let value = object.get(name)?;
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite())
            .map(|f| f.trunc() as i64)
    })
}

/// Loose boolean coercion: `null`, `false`, `0` and `""` are false, everything else is true.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStorage, NotesError};
    use serde_json::json;

    const NOW: i64 = 1_700_000_000_000;

    fn persistence_with(raw: &str) -> NotePersistence<MemoryStorage> {
        let mut storage = MemoryStorage::new();
        storage.set_item(NOTES_STORAGE_KEY, raw).unwrap();
        NotePersistence::new(storage)
    }

    #[test]
    fn load_is_absent_for_missing_empty_or_invalid_blobs() {
        assert!(NotePersistence::new(MemoryStorage::new()).load().is_none());
        assert!(persistence_with("").load().is_none());
        assert!(persistence_with("{not json").load().is_none());
        assert!(persistence_with(r#"{"id":"a","title":"T"}"#).load().is_none());
        assert!(persistence_with("42").load().is_none());
    }

    #[test]
    fn load_drops_entries_without_id_or_title() {
        let persistence =
            persistence_with(r#"[{"id":"a","title":"T"},{"id":"","title":"X"},{"foo":1}]"#);
        let notes = persistence.load().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, "a");
        assert_eq!(notes[0].title, "T");
        assert_eq!(notes[0].content, "");
        assert!(!notes[0].pinned);
    }

    #[test]
    fn load_at_fills_missing_timestamps_with_given_time() {
        let persistence = persistence_with(r#"[{"id":"a","title":"T","createdAt":"soon"}]"#);
        let notes = persistence.load_at(NOW).unwrap();
        assert_eq!(notes[0].created_at, NOW);
        assert_eq!(notes[0].updated_at, NOW);
    }

    #[test]
    fn sanitize_coerces_field_types() {
        let value = json!([
            {"id": "a", "title": "T", "content": 7, "createdAt": "yesterday", "updatedAt": null, "pinned": "yes"},
            {"id": "b", "title": "U", "createdAt": 10.9, "updatedAt": 20, "pinned": 0},
            {"id": 3, "title": "V"},
            "not an object",
            null
        ]);
        let notes = sanitize_notes(&value, NOW).unwrap();
        assert_eq!(notes.len(), 2);

        assert_eq!(notes[0].content, "");
        assert_eq!(notes[0].created_at, NOW);
        assert_eq!(notes[0].updated_at, NOW);
        assert!(notes[0].pinned);

        assert_eq!(notes[1].created_at, 10);
        assert_eq!(notes[1].updated_at, 20);
        assert!(!notes[1].pinned);
    }

    #[test]
    fn sanitize_restores_timestamp_order_and_unique_ids() {
        let value = json!([
            {"id": "a", "title": "first", "createdAt": 500, "updatedAt": 100},
            {"id": "a", "title": "second", "createdAt": 1, "updatedAt": 2}
        ]);
        let notes = sanitize_notes(&value, NOW).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "first");
        assert_eq!(notes[0].updated_at, 500);
    }

    #[test]
    fn truthiness_follows_loose_boolean_rules() {
        for (value, expected) in [
            (json!(true), true),
            (json!(false), false),
            (json!(1), true),
            (json!(0), false),
            (json!(0.0), false),
            (json!(""), false),
            (json!("false"), true),
            (json!([]), true),
            (json!({}), true),
            (Value::Null, false),
        ] {
            assert_eq!(is_truthy(&value), expected, "{value}");
        }
    }

    #[test]
    fn save_overwrites_previous_value() {
        let mut persistence = persistence_with("garbage");
        let note = Note::new("Saved", "body", NOW);
        assert!(persistence.save(std::slice::from_ref(&note)));
        assert_eq!(persistence.load().unwrap(), vec![note]);

        assert!(persistence.save(&[]));
        assert_eq!(persistence.load().unwrap(), Vec::<Note>::new());
    }

    struct BrokenStorage;

    impl KeyValueStorage for BrokenStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>> {
            Err(NotesError::ApplicationError {
                message: "unreadable".to_string(),
            })
        }

        fn set_item(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(NotesError::ApplicationError {
                message: "read-only".to_string(),
            })
        }

        fn remove_item(&mut self, _key: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn storage_failures_never_escape() {
        let mut persistence = NotePersistence::new(BrokenStorage);
        assert!(persistence.load().is_none());
        assert!(!persistence.save(&[Note::new("T", "", NOW)]));
    }
}
