use super::*;
use crate::{
    corpus::model::{Surah, Verse},
    layout::compose::compose,
    layout::order::{FOOTER_MARGIN, RULE_PADDING},
    settings::model::Settings,
};

/// Monospace stand-in: every char is half an em wide, lines are `size * line_height` tall.
struct GridMeasure;

impl TextMeasure for GridMeasure {
    fn measure(
        &mut self,
        text: &str,
        style: &TextStyle,
        max_width: f64,
    ) -> VerseCardResult<Size> {
        let em = f64::from(style.font_size);
        let per_line = ((max_width / (em * 0.5)).floor() as usize).max(1);
        let chars = text.chars().count().max(1);
        let lines = chars.div_ceil(per_line);
        let width = (chars.min(per_line) as f64) * em * 0.5;
        Ok(Size::new(
            width,
            lines as f64 * em * f64::from(style.line_height),
        ))
    }
}

fn verse(arabic: &str, translation: &str) -> Verse {
    Verse {
        number: 1,
        arabic: arabic.to_string(),
        transliteration: None,
        translation: translation.to_string(),
    }
}

fn chapter() -> Surah {
    Surah {
        number: 1,
        name: "الفاتحة".to_string(),
        name_latin: "Al-Fatihah".to_string(),
        verse_count: 7,
    }
}

fn frames(settings: &Settings) -> Vec<Rect> {
    let comp = compose(settings, Some(&verse("abcd", "efgh")), Some(&chapter()), 1, false);
    match arrange(&comp, &mut GridMeasure).unwrap().placement {
        Placement::Blocks(f) => f,
        other => panic!("expected blocks, got {other:?}"),
    }
}

#[test]
fn center_anchor_centers_the_group_and_separates_by_gap() {
    let settings = Settings::default();
    let f = frames(&settings);
    assert_eq!(f.len(), 4);

    // arabic 32 * 2.0, translation 16 * 1.6, divider 1, footer 12 * 1.4
    let arabic_h = 64.0;
    let translation_h = 25.6;
    let footer_h = 12.0 * 1.4f32 as f64;
    let total = arabic_h + 32.0 + translation_h + FOOTER_MARGIN + 1.0 + RULE_PADDING + footer_h;

    assert!((f[0].y0 - (640.0 - total) / 2.0).abs() < 1e-6);
    assert!((f[0].height() - arabic_h).abs() < 1e-6);
    assert!((f[1].y0 - f[0].y1 - 32.0).abs() < 1e-6);
    assert!((f[2].y0 - f[1].y1 - FOOTER_MARGIN).abs() < 1e-6);
    assert!((f[3].y1 - (640.0 + total) / 2.0).abs() < 1e-4);
}

#[test]
fn horizontal_padding_insets_both_sides() {
    let settings = Settings {
        horizontal_padding: 20.0,
        ..Settings::default()
    };
    for r in frames(&settings) {
        assert_eq!(r.x0, 20.0);
        assert_eq!(r.x1, 340.0);
    }
}

#[test]
fn start_and_end_use_fixed_insets() {
    let start = frames(&Settings {
        vertical_align: VerticalAnchor::Start,
        ..Settings::default()
    });
    assert_eq!(start[0].y0, ANCHOR_INSET);

    let end = frames(&Settings {
        vertical_align: VerticalAnchor::End,
        ..Settings::default()
    });
    assert!((end.last().unwrap().y1 - (640.0 - ANCHOR_INSET)).abs() < 1e-6);
    // footer first when anchored to the end
    assert!(end[0].height() < 20.0);
}

#[test]
fn long_text_wraps_and_grows() {
    let settings = Settings::default();
    let short = compose(&settings, Some(&verse("ab", "cd")), None, 1, false);
    let long_text = "x".repeat(200);
    let long = compose(&settings, Some(&verse(&long_text, "cd")), None, 1, false);

    let h = |c: &Composition| match arrange(c, &mut GridMeasure).unwrap().placement {
        Placement::Blocks(f) => f[0].height(),
        _ => unreachable!(),
    };
    assert!(h(&long) > h(&short));
}

#[test]
fn placeholder_and_spinner_are_centered() {
    let settings = Settings::default();
    let empty = compose(&settings, None, None, 1, false);
    let Placement::Placeholder { glyph, prompt } = arrange(&empty, &mut GridMeasure)
        .unwrap()
        .placement
    else {
        panic!("expected placeholder");
    };
    assert_eq!(glyph.center().x, 180.0);
    assert!(prompt.y0 > glyph.y1);

    let loading = compose(&settings, None, None, 1, true);
    let Placement::Spinner { bounds } = arrange(&loading, &mut GridMeasure).unwrap().placement
    else {
        panic!("expected spinner");
    };
    assert_eq!(bounds.center(), kurbo::Point::new(180.0, 320.0));
}
