//! CLI config loading from JSON files

use std::fs;
use tempfile::TempDir;
use telegram_logger::cli::{load_options_from_file, resolve_options};
use telegram_logger::{ParseMode, TelegramConfig};

#[test]
fn test_load_options_from_json_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tglog.json");
    fs::write(
        &path,
        r#"{
            "bot_token": "123:abc",
            "chat_id": -1001,
            "parse_mode": "MarkdownV2",
            "timeout": 10,
            "thread_id": 4
        }"#,
    )
    .unwrap();

    let options = load_options_from_file(&path).unwrap();
    let config = TelegramConfig::from_options(options).unwrap();
    assert_eq!(config.chat_id(), "-1001");
    assert_eq!(config.parse_mode(), ParseMode::MarkdownV2);
    assert_eq!(config.timeout_secs(), 10);
    assert_eq!(config.message_thread_id(), Some(4));
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.json");
    let err = load_options_from_file(&path).unwrap_err();
    assert!(err.to_string().contains("Configuration file not found"));
}

#[test]
fn test_malformed_json_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();
    let err = load_options_from_file(&path).unwrap_err();
    assert!(err.to_string().contains("Invalid configuration format"));
}

#[test]
fn test_explicit_missing_path_fails_resolution() {
    let dir = TempDir::new().unwrap();
    assert!(resolve_options(Some(dir.path().join("nope.json").as_path())).is_err());
}

#[test]
fn test_invalid_values_fail_validation_not_loading() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, r#"{"bot_token": "t", "chat_id": "1", "timeout": -5}"#).unwrap();

    let options = load_options_from_file(&path).unwrap();
    assert!(TelegramConfig::from_options(options).is_err());
}
