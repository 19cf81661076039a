//! Configuration file tests

use mask_fit::{
    config::{Config, EXAMPLE_CONFIG},
    session::CaptureSession,
    Error,
};
use std::path::PathBuf;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("mask-fit-{}-{name}", std::process::id()))
}

#[test]
fn test_config_file_round_trip() {
    let path = temp_path("round-trip.yaml");
    let mut config = Config::default();
    config.capture.scan_frames = 45;
    config.pose.front_yaw_threshold_deg = 8.0;

    config.to_file(&path).unwrap();
    let loaded = Config::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded, config);
}

#[test]
fn test_example_config_file() {
    let path = temp_path("example.yaml");
    std::fs::write(&path, EXAMPLE_CONFIG).unwrap();
    let loaded = Config::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded, Config::default());
    assert!(CaptureSession::new(loaded).is_ok());
}

#[test]
fn test_missing_file_is_io_error() {
    let result = Config::from_file(temp_path("does-not-exist.yaml"));
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_overlapping_yaw_thresholds_rejected() {
    let config = Config::from_yaml("pose:\n  front_yaw_threshold_deg: 40.0\n").unwrap();
    assert!(matches!(config.validate(), Err(Error::ConfigError(_))));
    assert!(matches!(CaptureSession::new(config), Err(Error::ConfigError(_))));
}
