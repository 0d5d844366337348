use simplenotes::{KeyValueStorage, MemoryStorage, NotePersistence, NoteStore, NOTES_STORAGE_KEY};

fn persistence_with(raw: &str) -> NotePersistence<MemoryStorage> {
    let mut storage = MemoryStorage::new();
    storage.set_item(NOTES_STORAGE_KEY, raw).unwrap();
    NotePersistence::new(storage)
}

#[test]
fn malformed_entries_are_dropped_on_load() {
    let persistence =
        persistence_with(r#"[{"id":"a","title":"T"},{"id":"","title":"X"},{"foo":1}]"#);
    let notes = persistence.load().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].id, "a");
}

#[test]
fn sanitized_collection_is_used_by_the_store() {
    let raw = r#"[
        {"id":"old","title":"Old","content":"x","createdAt":1000,"updatedAt":2000,"pinned":false},
        {"id":"new","title":"New","content":"y","createdAt":1000,"updatedAt":3000,"pinned":false},
        {"id":"pin","title":"Pinned","content":"z","createdAt":1000,"updatedAt":1000,"pinned":true}
    ]"#;
    let store = NoteStore::open(persistence_with(raw));

    let order: Vec<_> = store.sorted_view().into_iter().map(|n| n.id).collect();
    assert_eq!(order, ["pin", "new", "old"]);
}

#[test]
fn stored_json_uses_the_documented_layout() {
    let mut persistence = NotePersistence::new(MemoryStorage::new());
    let store_notes = NoteStore::open(NotePersistence::new(MemoryStorage::new())).sorted_view();
    assert!(persistence.save(&store_notes));

    let raw = persistence.storage().get_item(NOTES_STORAGE_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let first = value.as_array().unwrap()[0].as_object().unwrap();
    let mut keys: Vec<_> = first.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        ["content", "createdAt", "id", "pinned", "title", "updatedAt"]
    );
}
