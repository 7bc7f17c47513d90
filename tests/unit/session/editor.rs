use super::*;
use crate::{
    layout::compose::Content,
    settings::model::{BackgroundChoice, VerticalAnchor},
    storage::kv::MemoryStore,
};

fn verse(n: u32, text: &str) -> Verse {
    Verse {
        number: n,
        arabic: format!("arab {text}"),
        transliteration: None,
        translation: text.to_string(),
    }
}

fn fatihah() -> Surah {
    Surah {
        number: 1,
        name: "الفاتحة".into(),
        name_latin: "Al-Fatihah".into(),
        verse_count: 7,
    }
}

#[test]
fn selecting_a_chapter_resets_the_verse() {
    let mut s = EditorSession::new();
    s.select_verse(5).unwrap();
    assert_eq!(s.verse(), 5);

    let effects = s.select_chapter(2).unwrap();
    assert_eq!(effects, vec![PersistEffect::SaveSelection]);
    assert_eq!((s.chapter(), s.verse()), (2, 1));
    assert_eq!(s.verse_state(), &VerseState::Idle);
}

#[test]
fn zero_ordinals_are_rejected() {
    let mut s = EditorSession::new();
    assert!(matches!(s.select_chapter(0), Err(VerseCardError::Validation(_))));
    assert!(matches!(s.select_verse(0), Err(VerseCardError::Validation(_))));
    assert_eq!((s.chapter(), s.verse()), (1, 1));
}

#[test]
fn stale_fetch_completions_are_discarded() {
    let mut s = EditorSession::new();
    let first = s.begin_verse_fetch();
    s.select_verse(2).unwrap();
    let second = s.begin_verse_fetch();
    assert!(second.token > first.token);
    assert_eq!(second.verse, 2);

    assert!(!s.finish_verse_fetch(first, Some(verse(1, "old"))));
    assert_eq!(s.verse_state(), &VerseState::Loading);

    assert!(s.finish_verse_fetch(second, Some(verse(2, "new"))));
    assert_eq!(s.current_verse().unwrap().translation, "new");

    // A completed ticket cannot land twice.
    assert!(!s.finish_verse_fetch(second, None));
    assert!(s.current_verse().is_some());
}

#[test]
fn failed_fetch_shows_the_placeholder_not_a_stale_verse() {
    let mut s = EditorSession::new();
    let t = s.begin_verse_fetch();
    s.finish_verse_fetch(t, Some(verse(1, "first")));

    s.select_verse(300).unwrap();
    let t = s.begin_verse_fetch();
    assert!(matches!(s.composition().content, Content::Loading));
    s.finish_verse_fetch(t, None);

    assert_eq!(s.verse_state(), &VerseState::Missing);
    assert!(matches!(s.composition().content, Content::Empty { .. }));
}

#[test]
fn edits_apply_only_to_the_loaded_verse() {
    let mut s = EditorSession::new();
    assert!(!s.edit_arabic("x"));

    let t = s.begin_verse_fetch();
    s.finish_verse_fetch(t, Some(verse(1, "orig")));
    assert!(s.edit_arabic("edited arab"));
    assert!(s.edit_translation("edited"));
    assert_eq!(s.current_verse().unwrap().arabic, "edited arab");

    s.select_verse(2).unwrap();
    assert!(s.current_verse().is_none());
    assert!(!s.edit_translation("lost"));
}

#[test]
fn composition_uses_the_chapter_metadata_once_loaded() {
    let mut s = EditorSession::new();
    let t = s.begin_verse_fetch();
    s.finish_verse_fetch(t, Some(verse(1, "Dengan nama Allah")));

    let comp = s.composition();
    assert_eq!(comp.chapter_number, None);

    s.set_chapters(vec![fatihah()]);
    let comp = s.composition();
    assert_eq!(comp.chapter_number, Some(1));
    assert_eq!(comp.verse_number, 1);
    assert_eq!(s.current_chapter().unwrap().name_latin, "Al-Fatihah");
}

#[test]
fn effects_round_trip_through_storage() {
    let mut kv = MemoryStore::new();
    let mut s = EditorSession::new();

    let mut effects = s.select_chapter(18).unwrap();
    effects.extend(s.select_verse(10).unwrap());
    let mut settings = s.settings().with_background(BackgroundChoice::Transparent);
    settings.vertical_align = VerticalAnchor::End;
    effects.extend(s.replace_settings(settings.clone()));
    effects.extend(s.set_dark_mode(true));
    s.apply_effects(&mut kv, &effects).unwrap();

    let restored = EditorSession::restore(&kv);
    assert_eq!((restored.chapter(), restored.verse()), (18, 10));
    assert!(restored.dark_mode());
    assert_eq!(restored.settings(), &settings);
    assert_eq!(restored.verse_state(), &VerseState::Idle);
}

#[test]
fn corrupt_storage_restores_defaults() {
    let mut kv = MemoryStore::new();
    kv.set(keys::SELECTED_SURAH, "0").unwrap();
    kv.set(keys::SELECTED_AYAT, "not json").unwrap();
    kv.set(keys::DARK_MODE, "\"yes\"").unwrap();
    kv.set(keys::SETTINGS, "{broken").unwrap();

    let s = EditorSession::restore(&kv);
    assert_eq!((s.chapter(), s.verse()), (1, 1));
    assert!(!s.dark_mode());
    assert_eq!(s.settings(), &Settings::default());
}

#[test]
fn transitions_without_effects_do_not_touch_storage() {
    let mut kv = MemoryStore::new();
    let s = EditorSession::new();
    s.apply_effects(&mut kv, &[]).unwrap();
    assert!(kv.is_empty());
}
