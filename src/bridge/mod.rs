//! Bridge between asynchronous results and span closure.
//!
//! Starting a span is synchronous; the result that decides its outcome
//! arrives later, on whatever task or thread runs the call. The bridge
//! carries the span across that gap with a one-shot [`CompletionGuard`]:
//! however many clones of the guard exist, exactly one firing closes the
//! span, and everything after that is ignored. [`TracedFuture`] drives
//! the guard from a future's output, mapping `Ok` without an embedded
//! error to success and anything else to failure, while re-delivering
//! the result unchanged.
//!
//! The bridge never waits. Registration returns immediately and the wait
//! is owned by whoever polls the future. If nothing ever fires the guard,
//! the span stays pending until the registry sweep reclaims it.

mod future;

pub use future::{CompleteSpanExt, TracedFuture, attach};

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::context::SpanContext;
use crate::registry::SpanRegistry;
use crate::types::Outcome;

/// One-shot closer for a single span.
///
/// Created by [`Instrumenter::completion`](crate::Instrumenter::completion).
/// Clones share the same one-shot state: the first [`success`],
/// [`failure`] or [`complete`] call wins across every clone, and later
/// calls return `false` without touching the span. Dropping all clones
/// without firing leaves the span pending for the sweep to reclaim.
///
/// [`success`]: CompletionGuard::success
/// [`failure`]: CompletionGuard::failure
/// [`complete`]: CompletionGuard::complete
#[derive(Clone)]
pub struct CompletionGuard {
    inner: Arc<GuardInner>,
}

struct GuardInner {
    registry: Arc<SpanRegistry>,
    context: SpanContext,
    fired: AtomicBool,
}

impl CompletionGuard {
    pub(crate) fn new(registry: Arc<SpanRegistry>, context: SpanContext) -> Self {
        Self {
            inner: Arc::new(GuardInner {
                registry,
                context,
                fired: AtomicBool::new(false),
            }),
        }
    }

    /// Returns the span context this guard closes.
    pub fn context(&self) -> &SpanContext {
        &self.inner.context
    }

    /// Closes the span with `outcome` if no clone of this guard has fired
    /// yet.
    ///
    /// Returns `true` if this call performed the close. A non-terminal
    /// outcome is recovered misuse: the registry logs and counts it, and
    /// the guard stays live.
    pub fn complete(&self, outcome: Outcome) -> bool {
        if !outcome.is_terminal() {
            // The registry logs and counts the misuse; keep the guard live
            self.inner.registry.close(&self.inner.context, outcome);
            return false;
        }
        if self.inner.fired.swap(true, Ordering::AcqRel) {
            tracing::trace!(context = %self.inner.context, "completion guard already fired");
            return false;
        }
        self.inner.registry.close(&self.inner.context, outcome);
        true
    }

    /// Closes the span with [`Outcome::Success`].
    pub fn success(&self) -> bool {
        self.complete(Outcome::Success)
    }

    /// Closes the span with [`Outcome::Failed`] carrying `error`'s display
    /// form.
    pub fn failure(&self, error: impl fmt::Display) -> bool {
        self.complete(Outcome::failed(error))
    }

    /// Returns `true` if some clone of this guard has already fired.
    pub fn has_fired(&self) -> bool {
        self.inner.fired.load(Ordering::Acquire)
    }
}

impl Drop for GuardInner {
    fn drop(&mut self) {
        if !self.fired.load(Ordering::Acquire) {
            tracing::debug!(context = %self.context, "completion guard dropped unfired, span left pending");
        }
    }
}

impl fmt::Debug for CompletionGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionGuard")
            .field("context", &self.inner.context)
            .field("has_fired", &self.has_fired())
            .finish()
    }
}

/// Reports an error carried inside an otherwise successful value.
///
/// Some protocols deliver failures as a populated error field on a normal
/// response instead of an `Err`. Implementing this trait for the response
/// type lets [`TracedFuture`] close the span as failed in that case while
/// still returning the value unchanged.
///
/// ## Example
///
/// ```rust
/// use std::borrow::Cow;
/// use spanpipe::bridge::EmbeddedError;
///
/// struct DriverReply {
///     error: Option<String>,
/// }
///
/// impl EmbeddedError for DriverReply {
///     fn embedded_error(&self) -> Option<Cow<'_, str>> {
///         self.error.as_deref().map(Cow::Borrowed)
///     }
/// }
/// ```
pub trait EmbeddedError {
    /// Returns the error message embedded in this value, if any.
    fn embedded_error(&self) -> Option<Cow<'_, str>>;
}

impl EmbeddedError for () {
    fn embedded_error(&self) -> Option<Cow<'_, str>> {
        None
    }
}
