use super::*;
use crate::{
    settings::model::{BackgroundChoice, VerticalAnchor},
    storage::kv::MemoryStore,
};

fn stamp() -> String {
    "2026-01-01T00:00:00+00:00".to_string()
}

#[test]
fn empty_or_blank_names_are_ignored() {
    let mut kv = MemoryStore::new();
    let mut store = PresetStore::default();
    assert_eq!(store.save(&mut kv, "", &Settings::default()).unwrap(), None);
    assert_eq!(store.save(&mut kv, "   ", &Settings::default()).unwrap(), None);
    assert!(store.list().is_empty());
    assert!(kv.is_empty());
}

#[test]
fn save_trims_name_and_writes_through() {
    let mut kv = MemoryStore::new();
    let mut store = PresetStore::default();
    let p = store
        .save_at(&mut kv, "  Night  ", &Settings::default(), 1000, stamp())
        .unwrap()
        .unwrap();
    assert_eq!(p.name, "Night");
    assert_eq!(p.id, "1000");

    let reloaded = PresetStore::load_all(&kv);
    assert_eq!(reloaded.list(), store.list());
}

#[test]
fn ids_stay_unique_within_the_same_millisecond() {
    let mut kv = MemoryStore::new();
    let mut store = PresetStore::default();
    let a = store
        .save_at(&mut kv, "a", &Settings::default(), 5, stamp())
        .unwrap()
        .unwrap();
    let b = store
        .save_at(&mut kv, "b", &Settings::default(), 5, stamp())
        .unwrap()
        .unwrap();
    assert_eq!(a.id, "5");
    assert_eq!(b.id, "6");
}

#[test]
fn delete_removes_exactly_one_and_keeps_order() {
    let mut kv = MemoryStore::new();
    let mut store = PresetStore::default();
    for (i, name) in ["one", "two", "three", "four"].iter().enumerate() {
        store
            .save_at(&mut kv, name, &Settings::default(), i as i64 * 10, stamp())
            .unwrap();
    }

    assert!(store.delete(&mut kv, "10").unwrap());
    let names: Vec<&str> = store.list().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["one", "three", "four"]);

    assert!(!store.delete(&mut kv, "10").unwrap());
    let reloaded = PresetStore::load_all(&kv);
    assert_eq!(reloaded.list(), store.list());
}

#[test]
fn apply_then_resave_preserves_snapshot() {
    let mut kv = MemoryStore::new();
    let mut store = PresetStore::default();
    let custom = Settings {
        content_gap: 40.0,
        vertical_align: VerticalAnchor::End,
        ..Settings::default().with_background(BackgroundChoice::Solid("#123456".to_string()))
    };
    let original = store
        .save_at(&mut kv, "custom", &custom, 1, stamp())
        .unwrap()
        .unwrap();

    let mut live = PresetStore::apply(&original);
    let copy = store
        .save_at(&mut kv, "custom copy", &live, 2, stamp())
        .unwrap()
        .unwrap();
    assert_eq!(
        serde_json::to_string(&copy.settings).unwrap(),
        serde_json::to_string(&original.settings).unwrap()
    );

    // later edits to the live snapshot never reach stored presets
    live.content_gap = 0.0;
    assert_eq!(store.get(&original.id).unwrap().settings.content_gap, 40.0);
}

#[test]
fn corrupt_storage_loads_empty() {
    let mut kv = MemoryStore::new();
    kv.set(keys::PRESETS, "[{\"id\": 3").unwrap();
    assert!(PresetStore::load_all(&kv).list().is_empty());
}

#[test]
fn find_by_name_matches_trimmed() {
    let mut kv = MemoryStore::new();
    let mut store = PresetStore::default();
    store
        .save_at(&mut kv, "Gold", &Settings::default(), 1, stamp())
        .unwrap();
    assert!(store.find_by_name(" Gold ").is_some());
    assert!(store.find_by_name("gold").is_none());
}
