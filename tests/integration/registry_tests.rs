//! Span lifecycle and sweeping tests.
//!
//! These tests cover the registry behaviors visible through the facade:
//! misuse recovery, out-of-order completion and abandoned span reclamation,
//! both manual and via the background sweeper.

use std::time::Duration;

use spanpipe::{CallDescriptor, Outcome};
use spanpipe::testing::RecordingSink;

use crate::common::{expiring_pipeline, recording_pipeline};

/// Test that a double end emits one record and counts the misuse
#[test]
fn test_double_end_emits_single_record() {
    let (tracer, sink) = recording_pipeline(&[]);

    let context = tracer.start(None, CallDescriptor::new("op"));
    tracer.end(Some(&context), Outcome::Success);
    tracer.end(Some(&context), Outcome::Success);

    assert_eq!(sink.len(), 1);
    let stats = tracer.stats();
    assert_eq!(stats.completed_ok, 1);
    assert_eq!(stats.logic_errors, 1);
}

/// Test that ending with a pending outcome is rejected and the span survives
#[test]
fn test_end_with_pending_outcome_keeps_span_open() {
    let (tracer, sink) = recording_pipeline(&[]);

    let context = tracer.start(None, CallDescriptor::new("op"));
    tracer.end(Some(&context), Outcome::Pending);

    assert!(sink.is_empty());
    assert_eq!(tracer.open_spans(), 1);
    assert_eq!(tracer.stats().logic_errors, 1);

    // A proper close still works afterwards
    tracer.end(Some(&context), Outcome::Success);
    assert_eq!(sink.len(), 1);
    assert_eq!(tracer.open_spans(), 0);
}

/// Test completion arriving in any order
#[test]
fn test_out_of_order_completion() {
    let (tracer, sink) = recording_pipeline(&[]);

    let parent = tracer.start(None, CallDescriptor::new("batch"));
    let child = tracer.start(Some(&parent), CallDescriptor::new("item"));

    // Parent finishes before its child
    tracer.end(Some(&parent), Outcome::Success);
    tracer.end(Some(&child), Outcome::Success);

    let records = sink.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name, "batch");
    assert_eq!(records[1].name, "item");
    assert_eq!(records[1].parent_span_id.as_ref(), Some(parent.span_id()));
    assert_eq!(tracer.stats().logic_errors, 0);
}

/// Test open span accounting
#[test]
fn test_open_spans_counts_pending() {
    let (tracer, _sink) = recording_pipeline(&[]);

    let a = tracer.start(None, CallDescriptor::new("a"));
    let _b = tracer.start(None, CallDescriptor::new("b"));
    let _c = tracer.start(None, CallDescriptor::new("c"));
    assert_eq!(tracer.open_spans(), 3);

    tracer.end(Some(&a), Outcome::Success);
    assert_eq!(tracer.open_spans(), 2);
}

/// Test a manual sweep reclaiming an abandoned span as dropped
#[test]
fn test_manual_sweep_reclaims_abandoned_span() {
    let (tracer, sink) = expiring_pipeline(
        Duration::from_millis(10),
        Duration::from_secs(60),
    );

    tracer.start(None, CallDescriptor::new("abandoned"));
    std::thread::sleep(Duration::from_millis(30));

    assert_eq!(tracer.sweep_now(), 1);
    assert_eq!(tracer.open_spans(), 0);

    let record = sink.find("abandoned").expect("swept span should be recorded");
    assert!(record.is_dropped());

    let stats = tracer.stats();
    assert_eq!(stats.swept, 1);
    assert_eq!(stats.dropped, 1);
}

/// Test that a sweep leaves fresh spans alone
#[test]
fn test_sweep_only_reclaims_expired_spans() {
    let (tracer, sink) = expiring_pipeline(
        Duration::from_millis(50),
        Duration::from_secs(60),
    );

    tracer.start(None, CallDescriptor::new("old"));
    std::thread::sleep(Duration::from_millis(100));
    tracer.start(None, CallDescriptor::new("fresh"));

    assert_eq!(tracer.sweep_now(), 1);
    assert_eq!(tracer.open_spans(), 1);
    assert!(sink.find("old").is_some_and(|r| r.is_dropped()));
    assert!(sink.find("fresh").is_none());
}

/// Test a completion arriving after the sweep already closed the span
#[test]
fn test_late_completion_after_sweep_is_recovered() {
    let (tracer, sink) = expiring_pipeline(
        Duration::from_millis(10),
        Duration::from_secs(60),
    );

    let context = tracer.start(None, CallDescriptor::new("slow"));
    std::thread::sleep(Duration::from_millis(30));
    assert_eq!(tracer.sweep_now(), 1);

    // The result finally arrives, but the span is gone
    tracer.end(Some(&context), Outcome::Success);

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert!(records[0].is_dropped());

    let stats = tracer.stats();
    assert_eq!(stats.completed_ok, 0);
    assert_eq!(stats.logic_errors, 1);
}

/// Test the background sweeper reclaiming spans on its own
#[tokio::test]
async fn test_background_sweeper_reclaims_abandoned_spans() {
    let (tracer, sink) = expiring_pipeline(
        Duration::from_millis(5),
        Duration::from_millis(10),
    );

    let handle = tracer.spawn_sweeper();
    assert!(handle.is_active());

    tracer.start(None, CallDescriptor::new("abandoned"));

    // Poll rather than sleep a fixed amount, the sweeper runs on real time
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while sink.is_empty() && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(sink.len(), 1);
    assert!(sink.records()[0].is_dropped());
    assert_eq!(tracer.open_spans(), 0);

    handle.shutdown().await;
}

/// Test that spans stop expiring once the sweeper is shut down
#[tokio::test]
async fn test_sweeper_shutdown_stops_reclamation() {
    let (tracer, sink) = expiring_pipeline(
        Duration::from_millis(5),
        Duration::from_millis(10),
    );

    let handle = tracer.spawn_sweeper();
    handle.shutdown().await;

    tracer.start(None, CallDescriptor::new("survivor"));
    tokio::time::sleep(Duration::from_millis(60)).await;

    assert!(sink.is_empty());
    assert_eq!(tracer.open_spans(), 1);
}

/// Test that a disabled sweep config yields an inert handle
#[tokio::test]
async fn test_disabled_sweeper_is_inert() {
    use spanpipe::{Instrumenter, SweepConfig};

    let sink = RecordingSink::new();
    let tracer = Instrumenter::builder()
        .sink(sink.clone())
        .sweep(SweepConfig::disabled())
        .build()
        .expect("Failed to build pipeline");

    let handle = tracer.spawn_sweeper();
    assert!(!handle.is_active());

    tracer.start(None, CallDescriptor::new("op"));
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(tracer.open_spans(), 1);

    handle.shutdown().await;
}
