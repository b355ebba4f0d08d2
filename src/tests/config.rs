use super::{parse_max_entries, Config, DEFAULT_SASS_MIGRATOR_MAX_ENTRIES};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_parse_max_entries_accepts_integers() {
    assert_eq!(parse_max_entries(Some("5")), Some(5));
    assert_eq!(parse_max_entries(Some(" 40 ")), Some(40));
}

#[test]
fn test_parse_max_entries_treats_garbage_as_absent() {
    assert_eq!(parse_max_entries(None), None);
    assert_eq!(parse_max_entries(Some("")), None);
    assert_eq!(parse_max_entries(Some("twenty")), None);
    assert_eq!(parse_max_entries(Some("-3")), None);
    assert_eq!(parse_max_entries(Some("0")), None);
}

#[test]
fn test_missing_config_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_from(&dir.path().join("absent.toml"));

    assert_eq!(config, Config::default());
    assert_eq!(config.max_entries(), DEFAULT_SASS_MIGRATOR_MAX_ENTRIES);
    assert_eq!(config.sass_migrator_command, vec!["npx", "sass-migrator"]);
}

#[test]
fn test_partial_config_file_fills_defaults() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "sass_migrator_max_entries = 7").unwrap();

    let config = Config::load_from(file.path());

    assert_eq!(config.max_entries(), 7);
    assert_eq!(config.component_extension, "vue");
    assert!(config.run_division);
}

#[test]
fn test_zero_ceiling_falls_back_to_default() {
    let config = Config {
        sass_migrator_max_entries: 0,
        ..Config::default()
    };
    assert_eq!(config.max_entries(), DEFAULT_SASS_MIGRATOR_MAX_ENTRIES);
}
