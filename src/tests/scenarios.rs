//! End-to-end timing scenarios against the host monotonic clock.
//!
//! Sleeps only guarantee a lower bound, so upper bounds are deliberately loose.

use std::thread;
use std::time::Duration;

use crate::{ENABLED, ProfileRegistry, ProfilerError, SharedRegistry, TimeUnit};

const SLACK: Duration = Duration::from_millis(250);

fn assert_close(actual: Duration, expected: Duration) {
    assert!(actual >= expected, "{actual:?} < {expected:?}");
    assert!(actual < expected + SLACK, "{actual:?} far above {expected:?}");
}

#[test]
fn test_enabled_by_default() {
    assert!(ENABLED);
}

#[test]
fn test_single_region_ten_millis() {
    let mut registry = ProfileRegistry::new();
    registry.begin("a").unwrap();
    thread::sleep(Duration::from_millis(10));
    registry.end("a");

    let report = registry.report();
    let row = report.row("a").unwrap();
    assert_eq!(row.call_count, 1);
    assert_close(row.total_elapsed, Duration::from_millis(10));

    let text = report.to_string();
    let line = text.lines().nth(1).unwrap();
    assert!(line.starts_with("a               1             0.0"), "{line:?}");
    assert!(line.ends_with(" sec"));
}

#[test]
fn test_loop_of_four_sleeps() {
    let mut registry = ProfileRegistry::new();
    for _ in 0..10 {
        registry.begin("b").unwrap();
        for _ in 0..4 {
            thread::sleep(Duration::from_millis(10));
        }
        registry.end("b");
    }

    let entry = registry.get("b").unwrap();
    assert_eq!(entry.call_count(), 10);
    assert_close(entry.total_elapsed(), Duration::from_millis(400));
}

#[test]
fn test_repeated_pairs_scale_with_count() {
    let mut registry = ProfileRegistry::new();
    let n = 5;
    let d = Duration::from_millis(4);
    for _ in 0..n {
        registry.begin("x").unwrap();
        thread::sleep(d);
        registry.end("x");
    }
    let entry = registry.get("x").unwrap();
    assert_eq!(entry.call_count(), n);
    assert_close(entry.total_elapsed(), d * n as u32);
}

#[test]
fn test_main_and_loop_report_order() {
    let mut registry = ProfileRegistry::new();
    {
        let _main = registry.region("main").unwrap();
        thread::sleep(Duration::from_millis(10));
    }
    for _ in 0..3 {
        let _region = registry.region("foo for").unwrap();
        thread::sleep(Duration::from_millis(2));
    }
    registry.end("never started");

    let report = registry.report();
    let names: Vec<_> = report.rows().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["main", "foo for"]);
    assert_eq!(report.to_string().lines().count(), 3);
    assert_eq!(report.to_string(), registry.report().to_string());
}

#[test]
fn test_capacity_overflow_is_recoverable() {
    let mut registry = ProfileRegistry::builder().capacity(4).build().unwrap();
    let mut failures = 0;
    for i in 0..10 {
        match registry.begin(&format!("r{i}")) {
            Ok(()) => {
                registry.end(&format!("r{i}"));
            }
            Err(ProfilerError::CapacityExceeded { capacity, .. }) => {
                assert_eq!(capacity, 4);
                failures += 1;
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(failures, 6);
    assert_eq!(registry.report().len(), 4);
    assert!(registry.entries().all(|e| e.call_count() == 1));
}

#[test]
fn test_shared_registry_across_threads() {
    let shared = SharedRegistry::from(
        ProfileRegistry::builder()
            .unit(TimeUnit::Milliseconds)
            .build()
            .unwrap(),
    );
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let registry = shared.clone();
            thread::spawn(move || {
                let _region = registry.region(format!("thread-{i}")).unwrap();
                thread::sleep(Duration::from_millis(5));
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let report = shared.report().unwrap();
    assert_eq!(report.len(), 4);
    for row in report.rows() {
        assert_eq!(row.call_count, 1);
        assert_close(row.total_elapsed, Duration::from_millis(5));
    }
    assert!(report.to_string().contains(" ms\n"));
}
