//! Integration tests for logger behavior.

use pathwise::logger::{current_level, init_file_logging, parse_level, set_level, set_level_from_str, Level};
use pathwise::{debug, error, info, verbose, warn};

#[test]
fn level_parse_accepts_valid() {
    assert!(set_level_from_str("error"));
    assert!(set_level_from_str("WARN"));
    assert!(set_level_from_str("info"));
    assert!(set_level_from_str("debug"));
}

#[test]
fn level_parse_rejects_invalid() {
    assert!(!set_level_from_str("invalid"));
    assert!(!set_level_from_str(""));
    assert_eq!(parse_level("trace"), None);
}

#[test]
fn set_level_round_trips() {
    set_level(Level::Error);
    assert_eq!(current_level(), Level::Error);
    set_level(Level::Debug);
    assert_eq!(current_level(), Level::Debug);
}

#[test]
fn logs_do_not_panic() {
    set_level(Level::Debug);
    info!("info integration");
    warn!("warn integration");
    error!("error integration");
    debug!("debug integration {}", 42);
    verbose!("verbose integration");
}

#[cfg(feature = "file-logging")]
#[test]
fn file_logging_creates_parent_dirs() {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("logs").join("pathwise.log");

    assert!(init_file_logging(&path));
    error!("written to file");
    let content = std::fs::read_to_string(&path).expect("log file should exist");
    assert!(content.contains("[ERROR] written to file"));
}

#[cfg(not(feature = "file-logging"))]
#[test]
fn file_logging_is_disabled() {
    assert!(!init_file_logging(std::path::Path::new("unused.log")));
}
