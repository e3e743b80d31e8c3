// tests/config/settings_test.rs
use std::path::Path;

use cubist::config::{Settings, SettingsError};

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.cardinality_threshold, 100_000);
    assert_eq!(settings.row_dimension_cap, 3);
    assert_eq!(settings.level_sample_size, 50);
    assert_eq!(settings.classifier.variable_marker, "VARIABLE");
    assert_eq!(settings.classifier.group_marker, "APARTADO");
    assert_eq!(settings.classifier.measure_marker, "MEASURE");
}

#[test]
fn test_partial_toml_falls_back_to_defaults() {
    let settings: Settings = toml::from_str(
        r#"
        cardinality_threshold = 500

        [classifier]
        group_marker = "SECCION"
        "#,
    )
    .unwrap();

    assert_eq!(settings.cardinality_threshold, 500);
    assert_eq!(settings.row_dimension_cap, 3);
    assert_eq!(settings.classifier.group_marker, "SECCION");
    assert_eq!(settings.classifier.variable_marker, "VARIABLE");
}

#[test]
fn test_empty_toml_is_all_defaults() {
    let settings: Settings = toml::from_str("").unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn test_missing_file_is_reported() {
    let err = Settings::load(Path::new("/nonexistent/cubist.toml")).unwrap_err();
    assert!(matches!(err, SettingsError::FileNotFound(_)));
}

#[test]
fn test_no_path_means_defaults() {
    let settings = Settings::load_or_default(None).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn test_settings_round_trip_through_toml() {
    let mut settings = Settings::default();
    settings.cardinality_threshold = 42;
    let rendered = toml::to_string(&settings).unwrap();
    let parsed: Settings = toml::from_str(&rendered).unwrap();
    assert_eq!(parsed, settings);
}
