//! Pipeline counters and their snapshots.
//!
//! Counting is lock-free: every component shares one [`PipelineCounters`]
//! and bumps plain atomics. [`PipelineStats`] is the read side, a plain
//! `Copy` snapshot taken via [`Instrumenter::stats`](crate::Instrumenter::stats).

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// A point-in-time snapshot of the pipeline counters.
///
/// Counters only ever increase. Each field is read independently with
/// relaxed ordering, so a snapshot taken while spans are completing may
/// be momentarily inconsistent across fields; totals converge once the
/// pipeline quiesces.
///
/// ## Example
///
/// ```rust
/// use spanpipe::PipelineStats;
///
/// let stats = PipelineStats::default();
/// assert_eq!(stats.started, 0);
/// assert_eq!(stats.completed(), 0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    /// Spans registered by a sampled-in start.
    pub started: u64,
    /// Calls skipped by the sampling decision, never registered.
    pub sampled_out: u64,
    /// Spans closed with `Outcome::Success`.
    pub completed_ok: u64,
    /// Spans closed with `Outcome::Failed`.
    pub completed_failed: u64,
    /// Spans closed with `Outcome::Dropped`, explicitly or by sweep.
    pub dropped: u64,
    /// Abandoned spans reclaimed by sweep. Each also counts in `dropped`.
    pub swept: u64,
    /// Recovered API misuse: double closes, unknown contexts, ends with a
    /// non-terminal outcome.
    pub logic_errors: u64,
}

impl PipelineStats {
    /// Spans that ran to an explicit completion, success or failure.
    pub fn completed(&self) -> u64 {
        self.completed_ok + self.completed_failed
    }

    /// Total records emitted to the sink.
    pub fn emitted(&self) -> u64 {
        self.completed_ok + self.completed_failed + self.dropped
    }

    /// Returns the failure rate over completed spans (0.0 - 1.0).
    pub fn failure_rate(&self) -> f64 {
        let completed = self.completed();
        if completed == 0 {
            return 0.0;
        }
        self.completed_failed as f64 / completed as f64
    }
}

/// Shared write side of the counters.
#[derive(Debug, Default)]
pub(crate) struct PipelineCounters {
    started: AtomicU64,
    sampled_out: AtomicU64,
    completed_ok: AtomicU64,
    completed_failed: AtomicU64,
    dropped: AtomicU64,
    swept: AtomicU64,
    logic_errors: AtomicU64,
}

impl PipelineCounters {
    pub(crate) fn record_started(&self) {
        self.started.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_sampled_out(&self) {
        self.sampled_out.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_completed_ok(&self) {
        self.completed_ok.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_completed_failed(&self) {
        self.completed_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_swept(&self, count: u64) {
        self.swept.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn record_logic_error(&self) {
        self.logic_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> PipelineStats {
        PipelineStats {
            started: self.started.load(Ordering::Relaxed),
            sampled_out: self.sampled_out.load(Ordering::Relaxed),
            completed_ok: self.completed_ok.load(Ordering::Relaxed),
            completed_failed: self.completed_failed.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            swept: self.swept.load(Ordering::Relaxed),
            logic_errors: self.logic_errors.load(Ordering::Relaxed),
        }
    }
}
