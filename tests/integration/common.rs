//! Common test harness for spanpipe integration tests.
//!
//! Provides pipeline fixtures wired to a `RecordingSink` and a reply type
//! with an embedded error field, mirroring how a driver integration would
//! use the crate.

use std::borrow::Cow;
use std::time::Duration;

use spanpipe::prelude::*;

/// Builds a pipeline that records into the returned sink.
///
/// `patterns` become ignore patterns; pass `&[]` to trace everything.
pub fn recording_pipeline(patterns: &[&str]) -> (Instrumenter, RecordingSink) {
    init_test_logging();

    let sink = RecordingSink::new();
    let mut builder = Instrumenter::builder().sink(sink.clone());
    for pattern in patterns {
        builder = builder.ignore_pattern(*pattern);
    }
    let tracer = builder.build().expect("Failed to build pipeline");
    (tracer, sink)
}

/// Builds a pipeline whose spans expire quickly, for sweeper tests.
pub fn expiring_pipeline(
    span_expiry: Duration,
    sweep_interval: Duration,
) -> (Instrumenter, RecordingSink) {
    init_test_logging();

    let sink = RecordingSink::new();
    let tracer = Instrumenter::builder()
        .sink(sink.clone())
        .sweep(
            SweepConfig::builder()
                .span_expiry(span_expiry)
                .sweep_interval(sweep_interval)
                .build(),
        )
        .build()
        .expect("Failed to build pipeline");
    (tracer, sink)
}

/// Reply type in the shape drivers actually return: a payload plus an
/// optional error field that marks the call failed at the protocol level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverReply {
    pub payload: &'static str,
    pub error: Option<String>,
}

impl DriverReply {
    pub fn ok(payload: &'static str) -> Self {
        Self { payload, error: None }
    }

    pub fn failed(payload: &'static str, message: impl Into<String>) -> Self {
        Self { payload, error: Some(message.into()) }
    }
}

impl EmbeddedError for DriverReply {
    fn embedded_error(&self) -> Option<Cow<'_, str>> {
        self.error.as_deref().map(Cow::Borrowed)
    }
}

/// Installs a compact subscriber so `RUST_LOG=spanpipe=trace` shows the
/// pipeline's own logging during a test run. Repeated calls are no-ops.
pub fn init_test_logging() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
