use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_apply_when_nothing_is_set() {
    let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(cfg.api_base, DEFAULT_API_BASE);
    assert!(cfg.state_dir.ends_with("versecard"));
    assert_eq!(cfg.fonts_dir, cfg.state_dir.join("fonts"));
    assert_eq!(cfg.out_dir, PathBuf::from("."));
    assert_eq!(cfg.http_timeout, None);
}

#[test]
fn variables_override_defaults() {
    let cfg = AppConfig::from_lookup(lookup(&[
        (env::API_BASE, "http://127.0.0.1:9000/api/"),
        (env::STATE_DIR, "/tmp/vc-state"),
        (env::OUT_DIR, "/tmp/vc-out"),
        (env::HTTP_TIMEOUT_SECS, "15"),
    ]))
    .unwrap();
    assert_eq!(cfg.api_base, "http://127.0.0.1:9000/api");
    assert_eq!(cfg.state_dir, PathBuf::from("/tmp/vc-state"));
    assert_eq!(cfg.fonts_dir, PathBuf::from("/tmp/vc-state/fonts"));
    assert_eq!(cfg.out_dir, PathBuf::from("/tmp/vc-out"));
    assert_eq!(cfg.http_timeout, Some(Duration::from_secs(15)));
}

#[test]
fn blank_values_count_as_unset_and_zero_timeout_disables_it() {
    let cfg = AppConfig::from_lookup(lookup(&[
        (env::API_BASE, "   "),
        (env::FONTS_DIR, "/srv/fonts"),
        (env::HTTP_TIMEOUT_SECS, "0"),
    ]))
    .unwrap();
    assert_eq!(cfg.api_base, DEFAULT_API_BASE);
    assert_eq!(cfg.fonts_dir, PathBuf::from("/srv/fonts"));
    assert_eq!(cfg.http_timeout, None);
}

#[test]
fn malformed_timeout_is_a_validation_error() {
    let err = AppConfig::from_lookup(lookup(&[(env::HTTP_TIMEOUT_SECS, "soon")])).unwrap_err();
    assert!(matches!(err, VerseCardError::Validation(_)));
}
