//! Registry of in-flight spans.
//!
//! The registry is the single owner of pending span state. Starting a call
//! registers an entry under its span ID; ending it removes the entry,
//! builds the finalized [`SpanRecord`] and hands it to the sink. Each
//! context is emitted exactly once, at its first terminal transition.
//! Everything after that first transition is recovered misuse: logged,
//! counted, and otherwise ignored.
//!
//! Emission happens outside the registry lock, so sinks may take as long
//! as they like (or call back into the registry) without stalling starts
//! and ends on other threads.

mod sweep;

pub use sweep::{Sweeper, SweeperHandle};

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use parking_lot::Mutex;

use crate::context::{SpanContext, SpanId};
use crate::error::ErrorKind;
use crate::sink::SpanSink;
use crate::stats::{PipelineCounters, PipelineStats};
use crate::types::{AttrValue, CallKind, Outcome, SpanRecord};

/// How many closed span IDs to remember for double-close diagnostics.
const RECENT_CLOSE_MEMORY: usize = 256;

/// Tracks every span that has started but not yet reached a terminal
/// outcome.
///
/// All methods take `&self` and are safe to call concurrently; a single
/// short-lived [`parking_lot::Mutex`] guards the pending map. Handing a
/// finalized record to the sink never happens under that lock.
///
/// ## Example
///
/// ```rust
/// use std::sync::Arc;
/// use spanpipe::registry::SpanRegistry;
/// use spanpipe::sink::NoopSink;
/// use spanpipe::{CallKind, Outcome};
///
/// let registry = SpanRegistry::new(Arc::new(NoopSink));
/// let context = registry.create(None, "db.query", CallKind::Client, Vec::new());
/// assert_eq!(registry.open_spans(), 1);
///
/// registry.close(&context, Outcome::Success);
/// assert_eq!(registry.open_spans(), 0);
/// ```
pub struct SpanRegistry {
    state: Mutex<RegistryState>,
    sink: Arc<dyn SpanSink>,
    counters: Arc<PipelineCounters>,
}

#[derive(Default)]
struct RegistryState {
    pending: HashMap<SpanId, PendingSpan>,
    /// Ring of recently closed IDs, kept only to tell a double close apart
    /// from a close of a context this registry never issued.
    recently_closed: VecDeque<SpanId>,
}

impl RegistryState {
    fn remember_closed(&mut self, id: SpanId) {
        if self.recently_closed.len() == RECENT_CLOSE_MEMORY {
            self.recently_closed.pop_front();
        }
        self.recently_closed.push_back(id);
    }
}

/// Stored state for one span between start and terminal transition.
struct PendingSpan {
    context: SpanContext,
    name: String,
    kind: CallKind,
    attributes: Vec<(String, AttrValue)>,
    /// Wall-clock start, for the record's timestamps.
    started_at: SystemTime,
    /// Monotonic start, for the record's duration and for expiry checks.
    started_instant: Instant,
}

impl PendingSpan {
    fn age(&self) -> Duration {
        self.started_instant.elapsed()
    }

    fn into_record(self, outcome: Outcome) -> SpanRecord {
        let duration = self.started_instant.elapsed();
        SpanRecord {
            trace_id: self.context.trace_id().clone(),
            span_id: self.context.span_id().clone(),
            parent_span_id: self.context.parent_span_id().cloned(),
            name: self.name,
            kind: self.kind,
            started_at: self.started_at,
            ended_at: self.started_at + duration,
            duration,
            outcome,
            attributes: self.attributes,
        }
    }
}

impl SpanRegistry {
    /// Creates a registry that emits finalized records to `sink`.
    pub fn new(sink: Arc<dyn SpanSink>) -> Self {
        Self {
            state: Mutex::new(RegistryState::default()),
            sink,
            counters: Arc::new(PipelineCounters::default()),
        }
    }

    /// Registers a new pending span and returns its context.
    ///
    /// With a `parent` the new context joins that trace as a child; without
    /// one it roots a fresh trace. The parent itself is untouched either
    /// way.
    pub fn create(
        &self,
        parent: Option<&SpanContext>,
        name: impl Into<String>,
        kind: CallKind,
        attributes: Vec<(String, AttrValue)>,
    ) -> SpanContext {
        let context = match parent {
            Some(parent) => parent.child(),
            None => SpanContext::new_root(),
        };
        let entry = PendingSpan {
            context: context.clone(),
            name: name.into(),
            kind,
            attributes,
            started_at: SystemTime::now(),
            started_instant: Instant::now(),
        };

        tracing::trace!(context = %context, name = %entry.name, "span started");
        self.state
            .lock()
            .pending
            .insert(context.span_id().clone(), entry);
        self.counters.record_started();
        context
    }

    /// Transitions a pending span to a terminal outcome and emits its
    /// record.
    ///
    /// Only the first close of a context does anything. A second close, a
    /// close of a context this registry never issued, or a close with
    /// `Outcome::Pending` is recovered misuse: logged at `warn`, counted
    /// in [`PipelineStats::logic_errors`], and otherwise a no-op. Nothing
    /// here ever propagates back to the traced call.
    pub fn close(&self, context: &SpanContext, outcome: Outcome) {
        if !outcome.is_terminal() {
            tracing::warn!(context = %context, "span close requires a terminal outcome");
            self.counters.record_logic_error();
            return;
        }

        let (entry, recently_closed) = {
            let mut state = self.state.lock();
            match state.pending.remove(context.span_id()) {
                Some(entry) => {
                    state.remember_closed(context.span_id().clone());
                    (Some(entry), false)
                }
                None => (None, state.recently_closed.contains(context.span_id())),
            }
        };

        let Some(entry) = entry else {
            let kind = if recently_closed {
                ErrorKind::DoubleClose
            } else {
                ErrorKind::UnknownContext
            };
            tracing::warn!(context = %context, "{}", kind);
            self.counters.record_logic_error();
            return;
        };

        let record = entry.into_record(outcome);
        match &record.outcome {
            Outcome::Success => self.counters.record_completed_ok(),
            Outcome::Failed(_) => self.counters.record_completed_failed(),
            // Pending was rejected above
            _ => self.counters.record_dropped(),
        }
        tracing::trace!(context = %context, outcome = %record.outcome, "span closed");
        self.sink.emit(record);
    }

    /// Closes every span that has been pending for at least `max_age`.
    ///
    /// Each reclaimed span is emitted once with [`Outcome::Dropped`], the
    /// same path an explicit drop takes. Returns the number reclaimed. A
    /// result that arrives for a swept context later is a logged no-op.
    pub fn sweep_expired(&self, max_age: Duration) -> usize {
        let expired = {
            let mut state = self.state.lock();
            let expired_ids: Vec<SpanId> = state
                .pending
                .iter()
                .filter(|(_, entry)| entry.age() >= max_age)
                .map(|(id, _)| id.clone())
                .collect();

            let mut expired = Vec::with_capacity(expired_ids.len());
            for id in expired_ids {
                if let Some(entry) = state.pending.remove(&id) {
                    state.remember_closed(id);
                    expired.push(entry);
                }
            }
            expired
        };

        let swept = expired.len();
        if swept == 0 {
            return 0;
        }

        for entry in expired {
            let record = entry.into_record(Outcome::Dropped);
            self.counters.record_dropped();
            self.sink.emit(record);
        }
        self.counters.record_swept(swept as u64);
        tracing::debug!(swept, "reclaimed abandoned pending spans");
        swept
    }

    /// Returns the number of spans currently pending.
    pub fn open_spans(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Returns a snapshot of the pipeline counters.
    pub fn stats(&self) -> PipelineStats {
        self.counters.snapshot()
    }

    /// Shares the counter handle with the rest of the pipeline.
    pub(crate) fn counters(&self) -> Arc<PipelineCounters> {
        Arc::clone(&self.counters)
    }
}

impl fmt::Debug for SpanRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpanRegistry")
            .field("open_spans", &self.open_spans())
            .finish_non_exhaustive()
    }
}
