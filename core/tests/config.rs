//! Configuration loading and validation.

use personalization_core::{
    config::{EngineConfig, MAX_DAYS},
    engine::PersonalizationEngine,
    error::SimError,
};

#[test]
fn load_fills_missing_fields_with_defaults() {
    let path = std::env::temp_dir().join("personalization-config-test.json");
    std::fs::write(
        &path,
        r#"{ "population": 12, "seed": 7, "as_of": "2024-03-01T00:00:00Z" }"#,
    )
    .unwrap();

    let config = EngineConfig::load(path.to_str().unwrap()).unwrap();
    assert_eq!(config.population, 12);
    assert_eq!(config.seed, 7);
    assert_eq!(config.days_back, 30);
    assert_eq!(config.top_k, 5);
    assert_eq!(config.recent_window, 50);
    assert_eq!(config.as_of.to_rfc3339(), "2024-03-01T00:00:00+00:00");

    let _ = std::fs::remove_file(path);
}

#[test]
fn load_reports_missing_file() {
    let err = EngineConfig::load("/definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("Cannot read"), "{err}");
}

#[test]
fn validate_rejects_zero_window() {
    let mut config = EngineConfig::default_test();
    config.recent_window = 0;
    assert!(matches!(
        config.validate(),
        Err(SimError::InvalidParameter { name: "recent_window", .. })
    ));
    assert!(EngineConfig::default_test().validate().is_ok());
}

#[test]
fn validate_rejects_windows_past_the_date_range() {
    let mut config = EngineConfig::default_test();
    config.lookback_days = u32::MAX;
    assert!(matches!(
        config.validate(),
        Err(SimError::InvalidParameter { name: "lookback_days", .. })
    ));

    let mut config = EngineConfig::default_test();
    config.days_back = u32::MAX;
    assert!(matches!(
        PersonalizationEngine::new(config),
        Err(SimError::InvalidParameter { name: "days_back", .. })
    ));

    let mut config = EngineConfig::default_test();
    config.days_back = MAX_DAYS;
    config.lookback_days = MAX_DAYS;
    assert!(config.validate().is_ok(), "the maximum itself is allowed");
    config.days_back = MAX_DAYS + 1;
    assert!(config.validate().is_err());
}
