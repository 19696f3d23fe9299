//! Completion bridge tests.
//!
//! These tests cover the one-shot guard and the traced future under the
//! conditions that matter in production: racing completions, abandoned
//! futures and error passthrough.

use std::time::Duration;

use spanpipe::bridge::attach;
use spanpipe::{CallDescriptor, CompleteSpanExt, Outcome};

use crate::common::{expiring_pipeline, recording_pipeline, DriverReply};

/// Test that cloned guards share a single shot
#[test]
fn test_guard_clones_share_one_shot() {
    let (tracer, sink) = recording_pipeline(&[]);

    let context = tracer.start(None, CallDescriptor::new("op"));
    let guard = tracer.completion(&context);
    let clone = guard.clone();

    assert!(guard.success());
    assert!(!clone.failure("too late"));

    assert_eq!(sink.len(), 1);
    assert!(sink.records()[0].is_success());
    assert_eq!(tracer.stats().logic_errors, 0);
}

/// Test racing completions producing exactly one record
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_completions_produce_single_record() {
    let (tracer, sink) = recording_pipeline(&[]);

    let context = tracer.start(None, CallDescriptor::new("op"));
    let guard = tracer.completion(&context);

    let results = futures::future::join_all((0..8).map(|_| {
        let guard = guard.clone();
        tokio::spawn(async move { guard.success() })
    }))
    .await;

    let fired = results
        .into_iter()
        .map(|r| r.expect("task should not panic"))
        .filter(|fired| *fired)
        .count();

    assert_eq!(fired, 1);
    assert_eq!(sink.len(), 1);
    assert_eq!(tracer.stats().completed_ok, 1);
}

/// Test a failure message flowing into the record
#[test]
fn test_failure_message_recorded() {
    let (tracer, sink) = recording_pipeline(&[]);

    let context = tracer.start(None, CallDescriptor::new("op"));
    tracer.completion(&context).failure("connection reset");

    let record = &sink.records()[0];
    assert!(record.is_failed());
    assert_eq!(record.outcome.failure_message(), Some("connection reset"));
}

/// Test that dropping an unfired guard leaves the span pending
#[test]
fn test_dropped_guard_leaves_span_pending() {
    let (tracer, sink) = recording_pipeline(&[]);

    let context = tracer.start(None, CallDescriptor::new("op"));
    drop(tracer.completion(&context));

    assert!(sink.is_empty());
    assert_eq!(tracer.open_spans(), 1);

    // The span can still be closed by hand
    tracer.end(Some(&context), Outcome::Success);
    assert_eq!(sink.len(), 1);
}

/// Test an async error resolving the span as failed and passing through
#[tokio::test]
async fn test_async_error_passes_through_unchanged() {
    let (tracer, sink) = recording_pipeline(&[]);

    let error = tracer
        .trace_call(None, CallDescriptor::new("query"), || {
            Ok::<_, String>(async { Err::<(), String>("cursor timeout".to_string()) })
        })
        .expect("trace_call should hand back the future")
        .await
        .expect_err("the future's error should propagate");

    assert_eq!(error, "cursor timeout");

    let record = sink.find("query").expect("record should be emitted");
    assert_eq!(record.outcome.failure_message(), Some("cursor timeout"));
}

/// Test an abandoned traced future staying pending until swept
#[tokio::test]
async fn test_abandoned_future_pending_until_swept() {
    let (tracer, sink) = expiring_pipeline(
        Duration::from_millis(10),
        Duration::from_secs(60),
    );

    let future = tracer
        .trace_call(None, CallDescriptor::new("lost"), || {
            Ok::<_, String>(async { Ok::<_, String>(DriverReply::ok("never seen")) })
        })
        .expect("trace_call should hand back the future");

    assert!(future.context().is_some());
    drop(future);

    // Abandonment is not failure: nothing is emitted yet
    assert!(sink.is_empty());
    assert_eq!(tracer.open_spans(), 1);

    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(tracer.sweep_now(), 1);
    assert!(sink.records()[0].is_dropped());
}

/// Test attaching a guard with the extension method
#[tokio::test]
async fn test_complete_span_extension_method() {
    let (tracer, sink) = recording_pipeline(&[]);

    let context = tracer.start(None, CallDescriptor::new("find"));
    let guard = tracer.completion(&context);

    let reply = async { Ok::<_, String>(DriverReply::ok("done")) }
        .complete_span(guard)
        .await
        .expect("call should succeed");

    assert_eq!(reply.payload, "done");
    assert_eq!(sink.len(), 1);
    assert!(sink.records()[0].is_success());
}

/// Test attaching a guard with the free function
#[tokio::test]
async fn test_attach_free_function() {
    let (tracer, sink) = recording_pipeline(&[]);

    let context = tracer.start(None, CallDescriptor::new("find"));
    let traced = attach(
        async { Ok::<_, String>(()) },
        tracer.completion(&context),
    );
    assert_eq!(traced.context(), Some(&context));

    traced.await.expect("call should succeed");
    assert_eq!(sink.len(), 1);
}
