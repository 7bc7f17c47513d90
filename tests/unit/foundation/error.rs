use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        VerseCardError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(VerseCardError::fetch("x").to_string().contains("fetch error:"));
    assert!(VerseCardError::font("x").to_string().contains("font error:"));
    assert!(
        VerseCardError::export("x")
            .to_string()
            .contains("export error:")
    );
    assert!(
        VerseCardError::storage("x")
            .to_string()
            .contains("storage error:")
    );
    assert!(
        VerseCardError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = VerseCardError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn serde_json_errors_convert_to_serde_variant() {
    let err: VerseCardError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, VerseCardError::Serde(_)));
}
