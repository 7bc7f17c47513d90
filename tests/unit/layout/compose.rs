use super::*;
use crate::settings::model::BackgroundChoice;

fn fatihah() -> Surah {
    Surah {
        number: 1,
        name: "الفاتحة".to_string(),
        name_latin: "Al-Fatihah".to_string(),
        verse_count: 7,
    }
}

fn verse_one() -> Verse {
    Verse {
        number: 1,
        arabic: "بِسْمِ اللّٰهِ الرَّحْمٰنِ الرَّحِيْمِ".to_string(),
        transliteration: Some("bismillāhir-raḥmānir-raḥīm".to_string()),
        translation: "Dengan nama Allah Yang Maha Pengasih, Maha Penyayang.".to_string(),
    }
}

#[test]
fn fatihah_defaults_compose_center_anchor_with_footer() {
    let comp = compose(
        &Settings::default(),
        Some(&verse_one()),
        Some(&fatihah()),
        1,
        false,
    );
    assert_eq!(comp.canvas, Canvas::STORY);
    assert_eq!(comp.chapter_number, Some(1));

    let Content::Blocks {
        anchor,
        padding_x,
        blocks,
    } = &comp.content
    else {
        panic!("expected verse blocks, got {:?}", comp.content);
    };
    assert_eq!(*anchor, VerticalAnchor::Center);
    assert_eq!(*padding_x, 32.0);

    let ids: Vec<BlockId> = blocks.iter().map(|b| b.id).collect();
    assert_eq!(
        ids,
        [
            BlockId::Arabic,
            BlockId::Translation,
            BlockId::Divider,
            BlockId::Footer
        ]
    );
    assert_eq!(blocks[0].spacing_before, 0.0);
    assert_eq!(blocks[1].spacing_before, 32.0);

    let BlockKind::Text { style, .. } = &blocks[0].kind else {
        panic!("arabic block is text");
    };
    assert_eq!(style.font_family, Settings::default().arabic.font_family);

    let BlockKind::Footer {
        leading, trailing, ..
    } = &blocks[3].kind
    else {
        panic!("last block is footer");
    };
    assert_eq!(leading, "QS. Al-Fatihah");
    assert_eq!(trailing, "Ayat 1");
}

#[test]
fn hidden_translation_removes_gap() {
    let settings = Settings {
        show_translation: false,
        show_surah_info: false,
        ..Settings::default()
    };
    let comp = compose(&settings, Some(&verse_one()), Some(&fatihah()), 1, false);
    let Content::Blocks { blocks, .. } = comp.content else {
        panic!("expected blocks");
    };
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].spacing_before, 0.0);
}

#[test]
fn missing_verse_shows_placeholder_not_text() {
    let comp = compose(&Settings::default(), None, Some(&fatihah()), 3, false);
    let Content::Empty { prompt, style } = &comp.content else {
        panic!("expected placeholder, got {:?}", comp.content);
    };
    assert_eq!(prompt, EMPTY_PROMPT);
    assert_eq!(style.align, TextAlign::Center);
}

#[test]
fn loading_suppresses_text_and_prompt() {
    let with_verse = compose(&Settings::default(), Some(&verse_one()), None, 1, true);
    let without = compose(&Settings::default(), None, None, 1, true);
    assert_eq!(with_verse.content, Content::Loading);
    assert_eq!(without.content, Content::Loading);
}

#[test]
fn exactly_one_background_for_every_flag_combination() {
    let photo = "data:image/png;base64,AAAA".to_string();
    for transparent in [false, true] {
        for with_photo in [false, true] {
            let settings = Settings {
                is_transparent: transparent,
                background_image: with_photo.then(|| photo.clone()),
                ..Settings::default()
            };
            let comp = compose(&settings, Some(&verse_one()), None, 1, false);
            let expected = if transparent {
                Background::Transparent
            } else if with_photo {
                Background::Photo(photo.clone())
            } else {
                Background::Solid(Rgba8::opaque(0x0f, 0x17, 0x2a))
            };
            assert_eq!(comp.background, expected);
            assert_eq!(comp.overlay.is_some(), !transparent && with_photo);
        }
    }
}

#[test]
fn missing_chapter_leaves_footer_label_blank() {
    let comp = compose(&Settings::default(), Some(&verse_one()), None, 4, false);
    let Content::Blocks { blocks, .. } = comp.content else {
        panic!("expected blocks");
    };
    let footer = blocks.iter().find(|b| b.id == BlockId::Footer).unwrap();
    let BlockKind::Footer {
        leading, trailing, ..
    } = &footer.kind
    else {
        panic!("footer kind");
    };
    assert!(leading.is_empty());
    assert_eq!(trailing, "Ayat 4");
}

#[test]
fn photo_with_overlay_disabled_has_no_tint() {
    let settings = Settings {
        overlay_enabled: false,
        ..Settings::default().with_background(BackgroundChoice::Photo("data:x".to_string()))
    };
    let comp = compose(&settings, Some(&verse_one()), None, 1, false);
    assert_eq!(comp.overlay, None);
}
