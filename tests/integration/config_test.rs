use battalert::core::config::{Config, ProbeConfig, Thresholds};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.low_threshold, 22);
    assert_eq!(config.high_threshold, 78);
    assert_eq!(config.poll_interval_secs, 15);
}

#[test]
fn test_config_load_nonexistent_returns_default() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::load_from(&temp_dir.path().join("missing.json")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_empty_file_returns_default() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(&path, "\n").unwrap();

    assert_eq!(Config::load_from(&path).unwrap(), Config::default());
}

#[test]
fn test_config_corrupt_file_returns_default() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(&path, "{ not json").unwrap();

    assert_eq!(Config::load_from(&path).unwrap(), Config::default());
}

#[test]
fn test_config_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("config.json");

    let mut config = Config {
        poll_interval_secs: 30,
        probe: ProbeConfig {
            program: "pmset".to_string(),
            args: vec!["-g".to_string(), "batt".to_string()],
            charging_marker: "AC Power".to_string(),
            timeout_ms: 2_000,
        },
        ..Default::default()
    };
    config.set_thresholds(Thresholds::new(15, 85).unwrap());
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.thresholds(), Thresholds { low: 15, high: 85 });
    assert!(!path.with_extension("json.tmp").exists());
}
