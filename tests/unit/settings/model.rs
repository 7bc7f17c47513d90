use super::*;

#[test]
fn defaults_match_documented_values() {
    let s = Settings::default();
    assert_eq!(s.arabic.font_family, "Amiri");
    assert_eq!(s.arabic.font_size, 32.0);
    assert_eq!(s.translation.font_family, "Inter");
    assert_eq!(s.content_gap, 32.0);
    assert_eq!(s.vertical_align, VerticalAnchor::Center);
    assert!(s.show_surah_info && s.show_divider && s.show_translation);
    assert_eq!(
        s.background_mode(),
        BackgroundMode::Solid(Rgba8::opaque(0x0f, 0x17, 0x2a))
    );
}

#[test]
fn json_uses_camel_case_and_lowercase_enums() {
    let v = serde_json::to_value(Settings::default()).unwrap();
    assert_eq!(v["backgroundColor"], "#0f172a");
    assert_eq!(v["verticalAlign"], "center");
    assert_eq!(v["arabic"]["fontFamily"], "Amiri");
    assert_eq!(v["arabic"]["align"], "center");
    assert!(v.get("backgroundImage").is_none());
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let s: Settings = serde_json::from_str(r#"{"contentGap":40,"verticalAlign":"end"}"#).unwrap();
    assert_eq!(s.content_gap, 40.0);
    assert_eq!(s.vertical_align, VerticalAnchor::End);
    assert_eq!(s.arabic, Settings::default().arabic);
    assert_eq!(s.background_color, "#0f172a");
}

#[test]
fn transparent_wins_over_photo() {
    let s = Settings {
        is_transparent: true,
        background_image: Some("data:image/png;base64,AAAA".to_string()),
        ..Settings::default()
    };
    assert_eq!(s.background_mode(), BackgroundMode::Transparent);
    assert_eq!(s.overlay_tint(), None);
}

#[test]
fn with_background_never_leaves_contradictions() {
    let base = Settings::default();
    let photo = base.with_background(BackgroundChoice::Photo("data:x".to_string()));
    assert!(!photo.is_transparent);
    assert_eq!(photo.background_mode(), BackgroundMode::Photo("data:x".to_string()));

    let clear = photo.with_background(BackgroundChoice::Transparent);
    assert!(clear.is_transparent);
    assert_eq!(clear.background_image, None);

    let solid = clear.with_background(BackgroundChoice::Solid("#ff0000".to_string()));
    assert!(!solid.is_transparent);
    assert_eq!(solid.background_image, None);
    assert_eq!(solid.background_mode(), BackgroundMode::Solid(Rgba8::opaque(255, 0, 0)));

    // the source snapshot is untouched
    assert_eq!(base, Settings::default());
}

#[test]
fn overlay_only_applies_to_photos() {
    let solid = Settings::default();
    assert_eq!(solid.overlay_tint(), None);

    let photo = solid.with_background(BackgroundChoice::Photo("data:x".to_string()));
    let tint = photo.overlay_tint().unwrap();
    assert_eq!((tint.r, tint.g, tint.b), (0, 0, 0));
    assert_eq!(tint.a, 102);

    let disabled = Settings {
        overlay_enabled: false,
        ..photo
    };
    assert_eq!(disabled.overlay_tint(), None);
}

#[test]
fn out_of_range_opacity_is_clamped_at_use() {
    let s = Settings {
        overlay_opacity: 250.0,
        ..Settings::default().with_background(BackgroundChoice::Photo("data:x".to_string()))
    };
    assert_eq!(s.overlay_tint().unwrap().a, 255);
}
