//! Integration tests for Settings loading from a config file.
//!
//! Environment overrides live in `config_env_test.rs` so that process-wide
//! variables never leak into these tests.

use std::fs;

use tempfile::TempDir;

use taskmap::application::ApplicationError;
use taskmap::config::Settings;

#[test]
fn given_no_config_file_when_load_then_defaults() {
    let dir = TempDir::new().unwrap();
    let settings = Settings::load_from(Some(&dir.path().join("missing.toml"))).expect("load");
    assert_eq!(settings, Settings::default());
}

#[test]
fn given_partial_config_when_load_then_only_given_keys_replaced() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("taskmap.toml");
    fs::write(
        &path,
        r#"
[layout]
gap = 24
base_sizes = [400, 200]

[labels]
unnamed = "(untitled)"
"#,
    )
    .unwrap();

    let settings = Settings::load_from(Some(&path)).expect("load");

    assert_eq!(settings.layout.gap, 24);
    assert_eq!(settings.layout.base_sizes, vec![400, 200]);
    assert_eq!(settings.layout.padding, Settings::default().layout.padding);
    assert_eq!(settings.labels.unnamed, "(untitled)");
    assert_eq!(settings.labels.empty_cell, "—");
    assert_eq!(settings.layout_config().base_size(5), 200);
}

#[test]
fn given_increasing_base_sizes_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("taskmap.toml");
    fs::write(&path, "[layout]\nbase_sizes = [100, 200]\n").unwrap();

    let result = Settings::load_from(Some(&path));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_malformed_toml_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("taskmap.toml");
    fs::write(&path, "[layout\ngap = ").unwrap();

    assert!(matches!(
        Settings::load_from(Some(&path)),
        Err(ApplicationError::Config { .. })
    ));
}

#[test]
fn given_template_when_loaded_as_config_then_equals_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("taskmap.toml");
    fs::write(&path, Settings::template()).unwrap();

    let settings = Settings::load_from(Some(&path)).expect("load");

    assert_eq!(settings, Settings::default());
}

#[test]
fn given_settings_when_shown_as_toml_then_round_trips_through_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("taskmap.toml");
    let mut custom = Settings::default();
    custom.titles.fallback = "Todo".into();
    fs::write(&path, custom.to_toml().expect("toml")).unwrap();

    let loaded = Settings::load_from(Some(&path)).expect("load");

    assert_eq!(loaded.default_title(9), "Todo");
}
