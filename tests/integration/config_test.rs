use std::fs;
use std::time::Duration;

use procgate::core::Config;
use tempfile::TempDir;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.poll_interval(), Duration::from_secs(5));
    assert_eq!(config.os_call_timeout(), Duration::from_millis(3000));
}

#[test]
fn test_config_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("procgate").join("config.json");

    let mut config = Config::default();
    config.set_poll_interval_secs(12).unwrap();
    config.set_os_call_timeout_ms(750).unwrap();
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_config_load_missing_file_returns_default() {
    let temp_dir = TempDir::new().unwrap();
    let loaded = Config::load_from(&temp_dir.path().join("absent.json")).unwrap();
    assert_eq!(loaded, Config::default());
}

#[test]
fn test_config_corrupt_file_returns_default() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(&path, b"{ not json").unwrap();

    assert_eq!(Config::load_from(&path).unwrap(), Config::default());
}

#[test]
fn test_config_rejects_tiny_values() {
    let mut config = Config::default();
    assert!(config.set_poll_interval_secs(0).is_err());
    assert!(config.set_os_call_timeout_ms(10).is_err());
    assert_eq!(config, Config::default());
}
