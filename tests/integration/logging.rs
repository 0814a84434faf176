//! Integration tests for file logging.
//!
//! Environment variables used:
//! - LOG_MODE: "stdout" (default) or "file"
//! - LOG_LEVEL: log level ("trace", "debug", "info", "warn", "error"); default is "info"
//! - LOG_DATA_DIR: directory of `watchgod.log` in file mode
//! - LOG_MAX_SIZE: byte limit per rolled file
//!
//!   Refer to `src/logging/mod.rs` for more details.
use chrono::Utc;
use std::{env, fs, path::Path, sync::Mutex, thread, time::Duration};
use tempfile::TempDir;
use watchgod::logging::{
    compute_rolled_file_path, setup_logging, space_based_rolling, LogSettings, LOG_FILE_NAME,
};

static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

#[test]
fn test_invalid_log_max_size_is_rejected() {
    let _guard = ENV_MUTEX
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    env::set_var("LOG_MODE", "file");
    env::set_var("LOG_MAX_SIZE", "invalid_value");

    let result = LogSettings::from_env();
    env::remove_var("LOG_MAX_SIZE");

    let err = result.expect_err("LOG_MAX_SIZE must be numeric");
    assert!(err.to_string().contains("LOG_MAX_SIZE"));
}

// The global logger can be installed once per process, so this is the only
// test in the binary that calls setup_logging.
#[test]
fn test_setup_logging_file_mode_creates_log_file() {
    let _guard = ENV_MUTEX
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let temp_log_dir = temp_dir.path().join("nested");
    let temp_log_dir = temp_log_dir.to_str().unwrap();

    env::remove_var("LOG_MAX_SIZE");
    env::set_var("LOG_MODE", "file");
    env::set_var("LOG_LEVEL", "debug");
    env::set_var("LOG_DATA_DIR", format!("{}/", temp_log_dir));

    setup_logging().expect("file logging should initialize");
    log::info!("integration log line");
    thread::sleep(Duration::from_millis(200));

    let expected_path =
        compute_rolled_file_path(&format!("{}/{}", temp_log_dir, LOG_FILE_NAME), &today(), 1);
    assert!(
        Path::new(&expected_path).exists(),
        "Expected log file {} does not exist",
        expected_path
    );
    let contents = fs::read_to_string(&expected_path).unwrap();
    assert!(contents.contains("integration log line"));

    env::remove_var("LOG_MODE");
    env::remove_var("LOG_LEVEL");
    env::remove_var("LOG_DATA_DIR");
}

/// An existing file over the size limit makes logging continue in the next index.
#[test]
fn test_log_file_rolls_when_existing_file_is_full() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let base_file = temp_dir.path().join(LOG_FILE_NAME);
    let base_file = base_file.to_str().unwrap();
    let date_str = today();

    let first = compute_rolled_file_path(base_file, &date_str, 1);
    fs::write(&first, "Existing log file").expect("Failed to create pre-existing log file");

    let rolled_path = space_based_rolling(base_file, &date_str, 10);

    assert_eq!(rolled_path, compute_rolled_file_path(base_file, &date_str, 2));
    assert!(rolled_path.contains("watchgod-"));
}

#[test]
fn test_space_based_rolling_returns_first_file_when_under_max_size() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let base_file = temp_dir.path().join("test_watchgod.log");
    let base_file = base_file.to_str().unwrap();
    let date_str = today();

    let first = compute_rolled_file_path(base_file, &date_str, 1);
    fs::write(&first, "small file").expect("Failed to write to test log file");

    let rolled_path = space_based_rolling(base_file, &date_str, 10_000);

    assert_eq!(
        rolled_path, first,
        "space_based_rolling should keep the current file while it is within the size threshold"
    );
}
