//! Unit tests for log.rs
//!
//! Tests LogSeverity, the global logger swap, severity filtering and the macros.
//!
//! The logger is global. Tests that install a capturing logger are #[serial]
//! and only look at entries from their own source string, since other tests
//! may log concurrently.

use crate::log::{self, Logger, LogEntry, LogSeverity, DefaultLogger};
use serial_test::serial;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

// ============================================================================
// TEST HELPERS
// ============================================================================

struct CaptureLogger {
    source: &'static str,
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl Logger for CaptureLogger {
    fn log(&self, entry: &LogEntry) {
        if entry.source == self.source {
            self.entries.lock().unwrap().push(entry.clone());
        }
    }
}

fn install_capture(source: &'static str) -> Arc<Mutex<Vec<LogEntry>>> {
    let entries = Arc::new(Mutex::new(Vec::new()));
    log::set_logger(CaptureLogger { source, entries: entries.clone() });
    entries
}

// ============================================================================
// LOG SEVERITY TESTS
// ============================================================================

#[test]
fn test_log_severity_ordering() {
    assert!(LogSeverity::Trace < LogSeverity::Debug);
    assert!(LogSeverity::Debug < LogSeverity::Info);
    assert!(LogSeverity::Info < LogSeverity::Warn);
    assert!(LogSeverity::Warn < LogSeverity::Error);
}

#[test]
fn test_log_severity_labels_are_fixed_width() {
    for severity in [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ] {
        assert_eq!(severity.label().len(), 5);
    }
    assert_eq!(LogSeverity::Warn.label(), "WARN ");
}

#[test]
fn test_default_logger_prints_without_panicking() {
    let logger = DefaultLogger;
    logger.log(&LogEntry {
        severity: LogSeverity::Error,
        timestamp: SystemTime::now(),
        source: "test::log::default".to_string(),
        message: "printed".to_string(),
        file: Some("log_tests.rs"),
        line: Some(1),
    });
}

// ============================================================================
// GLOBAL LOGGER TESTS
// ============================================================================

#[test]
#[serial]
fn test_set_logger_receives_entries() {
    let entries = install_capture("test::log::capture");

    crate::octree_warn!("test::log::capture", "object {} outside", 7);

    let captured = entries.lock().unwrap().clone();
    log::reset_logger();

    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].severity, LogSeverity::Warn);
    assert_eq!(captured[0].message, "object 7 outside");
    assert!(captured[0].file.is_none());
}

#[test]
#[serial]
fn test_error_macro_records_file_and_line() {
    let entries = install_capture("test::log::error");

    crate::octree_error!("test::log::error", "desync");

    let captured = entries.lock().unwrap().clone();
    log::reset_logger();

    assert_eq!(captured.len(), 1);
    assert!(captured[0].file.unwrap().ends_with("log_tests.rs"));
    assert!(captured[0].line.is_some());
}

#[test]
#[serial]
fn test_min_severity_filters_entries() {
    let entries = install_capture("test::log::filter");
    log::set_min_severity(LogSeverity::Warn);

    crate::octree_debug!("test::log::filter", "dropped");
    crate::octree_info!("test::log::filter", "dropped too");
    crate::octree_warn!("test::log::filter", "kept");

    assert!(!log::enabled(LogSeverity::Info));
    assert!(log::enabled(LogSeverity::Error));

    log::set_min_severity(LogSeverity::Info);
    let captured = entries.lock().unwrap().clone();
    log::reset_logger();

    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].message, "kept");
}

#[test]
#[serial]
fn test_trace_enabled_after_lowering_min_severity() {
    let entries = install_capture("test::log::trace");
    log::set_min_severity(LogSeverity::Trace);

    crate::octree_trace!("test::log::trace", "visiting node {}", 0);

    log::set_min_severity(LogSeverity::Info);
    assert_eq!(log::min_severity(), LogSeverity::Info);
    let captured = entries.lock().unwrap().clone();
    log::reset_logger();

    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].severity, LogSeverity::Trace);
}
