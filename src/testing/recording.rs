//! In-memory sink that captures emitted records.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::sink::SpanSink;
use crate::types::SpanRecord;

/// A sink that stores every record it receives, in emission order.
///
/// Clones share the same storage, so the copy handed to the builder and
/// the copy kept by the test observe the same records. Useful wherever
/// emission needs to be asserted without a real exporter.
///
/// ## Example
///
/// ```rust
/// use spanpipe::{CallDescriptor, Instrumenter, Outcome};
/// use spanpipe::testing::RecordingSink;
///
/// let sink = RecordingSink::new();
/// let tracer = Instrumenter::builder().sink(sink.clone()).build()?;
///
/// let context = tracer.start(None, CallDescriptor::new("op"));
/// tracer.end(Some(&context), Outcome::failed("timeout"));
///
/// assert_eq!(sink.len(), 1);
/// assert!(sink.find("op").is_some_and(|r| r.is_failed()));
/// # Ok::<(), spanpipe::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    records: Arc<RwLock<Vec<SpanRecord>>>,
}

impl RecordingSink {
    /// Creates an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything recorded so far, in emission order.
    pub fn records(&self) -> Vec<SpanRecord> {
        self.records.read().clone()
    }

    /// Removes and returns everything recorded so far.
    pub fn take(&self) -> Vec<SpanRecord> {
        std::mem::take(&mut *self.records.write())
    }

    /// Returns the first record with the given span name, if any.
    pub fn find(&self, name: &str) -> Option<SpanRecord> {
        self.records.read().iter().find(|r| r.name == name).cloned()
    }

    /// Returns the number of records captured.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Discards everything recorded so far.
    pub fn clear(&self) {
        self.records.write().clear();
    }
}

impl SpanSink for RecordingSink {
    fn emit(&self, record: SpanRecord) {
        self.records.write().push(record);
    }
}
