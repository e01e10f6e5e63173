/*!
 * Tests for the keyed progress log
 */

use std::time::Duration;

use reelforge::progress::{ProgressLevel, ProgressLog};

#[test]
fn test_progress_append_shouldPreserveOrder() {
    let log = ProgressLog::new();
    log.append("job-1", ProgressLevel::Info, "first");
    log.append("job-1", ProgressLevel::Warning, "second");
    log.append("job-1", ProgressLevel::Error, "third");

    let entries = log.read("job-1");
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].message, "first");
    assert_eq!(entries[1].message, "second");
    assert_eq!(entries[2].message, "third");
    assert_eq!(entries[1].level, ProgressLevel::Warning);
}

#[test]
fn test_progress_read_withUnknownJob_shouldReturnEmpty() {
    let log = ProgressLog::new();
    assert!(log.read("never-written").is_empty());
}

#[test]
fn test_progress_append_beyondCap_shouldKeepNewestEntries() {
    let log = ProgressLog::with_limits(5, Duration::from_secs(3600));
    for i in 0..8 {
        log.append("job-1", ProgressLevel::Info, format!("entry {}", i));
    }

    let entries = log.read("job-1");
    assert_eq!(entries.len(), 5);
    assert_eq!(entries[0].message, "entry 3");
    assert_eq!(entries[4].message, "entry 7");
}

#[test]
fn test_progress_append_atStandardCap_shouldKeepLastHundred() {
    let log = ProgressLog::new();
    for i in 0..105 {
        log.append("job-1", ProgressLevel::Info, format!("entry {}", i));
    }

    let entries = log.read("job-1");
    assert_eq!(entries.len(), 100);
    assert_eq!(entries[0].message, "entry 5");
    assert_eq!(entries[99].message, "entry 104");
}

#[test]
fn test_progress_jobs_shouldBeIsolated() {
    let log = ProgressLog::new();
    log.append("job-a", ProgressLevel::Info, "for a");
    log.append("job-b", ProgressLevel::Info, "for b");

    assert_eq!(log.read("job-a").len(), 1);
    assert_eq!(log.read("job-b").len(), 1);
    assert_eq!(log.read("job-a")[0].message, "for a");
}

#[test]
fn test_progress_read_afterExpiry_shouldReturnEmpty() {
    let log = ProgressLog::with_limits(100, Duration::from_millis(20));
    log.append("job-1", ProgressLevel::Info, "will expire");

    std::thread::sleep(Duration::from_millis(60));
    assert!(log.read("job-1").is_empty());
}

#[test]
fn test_progress_append_afterExpiry_shouldStartFresh() {
    let log = ProgressLog::with_limits(100, Duration::from_millis(20));
    log.append("job-1", ProgressLevel::Info, "stale");

    std::thread::sleep(Duration::from_millis(60));
    log.append("job-1", ProgressLevel::Info, "fresh");

    let entries = log.read("job-1");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].message, "fresh");
}

#[test]
fn test_progress_append_shouldRefreshExpiry() {
    let log = ProgressLog::with_limits(100, Duration::from_millis(80));
    log.append("job-1", ProgressLevel::Info, "first");

    // Keep writing within the window; the first entry must survive
    std::thread::sleep(Duration::from_millis(40));
    log.append("job-1", ProgressLevel::Info, "second");
    std::thread::sleep(Duration::from_millis(40));

    let entries = log.read("job-1");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].message, "first");
}

#[test]
fn test_progress_clone_shouldShareStorage() {
    let log = ProgressLog::new();
    let observer = log.clone();

    log.append("job-1", ProgressLevel::Info, "written through original");
    assert_eq!(observer.read("job-1").len(), 1);
}
