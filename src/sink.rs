//! Destinations for finalized span records.
//!
//! The pipeline hands every finalized [`SpanRecord`] to exactly one
//! [`SpanSink`]. Emission is fire-and-forget: the sink has no return
//! value and no way to push an error back into the traced call. Sinks
//! that forward records somewhere slow should buffer internally rather
//! than block the caller.

use std::sync::Arc;

use crate::types::SpanRecord;

/// Receives finalized span records.
///
/// Called exactly once per span context, after the span reaches a
/// terminal outcome. Implementations must be safe to call from any
/// thread; the pipeline holds no lock while emitting.
pub trait SpanSink: Send + Sync {
    /// Consumes one finalized record.
    fn emit(&self, record: SpanRecord);
}

/// A sink that discards every record.
///
/// With this sink the pipeline still tracks spans and counts stats but
/// produces no output, which makes it useful as a stand-in while wiring
/// up instrumentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl SpanSink for NoopSink {
    fn emit(&self, _record: SpanRecord) {}
}

/// Adapts a closure into a [`SpanSink`].
///
/// ## Example
///
/// ```rust
/// use spanpipe::sink::SinkFn;
///
/// let sink = SinkFn::new(|record| {
///     println!("{record}");
/// });
/// ```
pub struct SinkFn<F> {
    f: F,
}

impl<F> SinkFn<F>
where
    F: Fn(SpanRecord) + Send + Sync,
{
    /// Wraps a closure as a sink.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> SpanSink for SinkFn<F>
where
    F: Fn(SpanRecord) + Send + Sync,
{
    fn emit(&self, record: SpanRecord) {
        (self.f)(record);
    }
}

impl<F> std::fmt::Debug for SinkFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkFn").finish_non_exhaustive()
    }
}

impl<S: SpanSink + ?Sized> SpanSink for Arc<S> {
    fn emit(&self, record: SpanRecord) {
        (**self).emit(record);
    }
}
