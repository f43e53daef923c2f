//! Integration tests for logging initialization
//!
//! tracing_subscriber can only be initialized once per process, so the
//! file-layer test does the single init for this test binary.

use sentinel::config::LoggingConfig;
use sentinel::logging::init_logging;
use tempfile::TempDir;

#[test]
fn test_init_logging_with_file_layer() {
    let temp_dir = TempDir::new().unwrap();
    let config = LoggingConfig {
        local_enabled: true,
        local_path: temp_dir.path().to_string_lossy().to_string(),
        local_rotation: "daily".to_string(),
    };

    let guard = init_logging("debug", &config).expect("logging init failed");

    tracing::info!(test = true, "logging integration test line");
    tracing::debug!("debug line");

    // Dropping the guard flushes the non-blocking writer
    drop(guard);

    let entries: Vec<_> = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    assert!(
        entries.iter().any(|name| name.starts_with("sentinel.log")),
        "expected a rolling log file, found: {entries:?}"
    );
}

#[test]
fn test_invalid_log_level_is_rejected() {
    let config = LoggingConfig::default();
    assert!(init_logging("shout", &config).is_err());
}
