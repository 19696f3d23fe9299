//! The instrumenter facade.
//!
//! [`Instrumenter`] ties the pieces together: resolve the descriptor to a
//! name, decide whether to sample it, register a pending span, and close
//! it when the result arrives, by hand or through the completion bridge.
//! It is the only type most integrations touch.
//!
//! The per-call protocol is a small state machine:
//!
//! 1. [`should_start`] (or [`start_if_sampled`]): resolve and decide.
//!    A dropped call allocates nothing and the call proceeds untraced.
//! 2. [`start`]: register the pending span, get its [`SpanContext`].
//! 3. Exactly one close: [`end`] directly, a [`CompletionGuard`] firing,
//!    or a [`TracedFuture`] resolving.
//!
//! Everything here is observational. No method returns an error to the
//! traced call path, and misuse (closing twice, closing an unknown
//! context) degrades to a logged counter bump.
//!
//! [`should_start`]: Instrumenter::should_start
//! [`start_if_sampled`]: Instrumenter::start_if_sampled
//! [`start`]: Instrumenter::start
//! [`end`]: Instrumenter::end

mod builder;

pub use builder::{HasSink, InstrumenterBuilder, NoSink};

use std::fmt;
use std::sync::Arc;

use crate::bridge::{CompletionGuard, TracedFuture, attach};
use crate::config::SweepConfig;
use crate::context::SpanContext;
use crate::registry::{SpanRegistry, Sweeper, SweeperHandle};
use crate::resolve::resolve;
use crate::sampler::SpanSampler;
use crate::stats::{PipelineCounters, PipelineStats};
use crate::types::{CallDescriptor, Outcome};

/// Traces asynchronous operations from start to terminal outcome.
///
/// Cheap to clone; clones share the sampler, the registry and the
/// counters, so one `Instrumenter` can be handed to every connection or
/// task in a process.
///
/// ## Example
///
/// ```rust
/// use spanpipe::{CallDescriptor, CallKind, Instrumenter, Outcome};
/// use spanpipe::testing::RecordingSink;
///
/// let sink = RecordingSink::new();
/// let tracer = Instrumenter::builder()
///     .sink(sink.clone())
///     .ignore_pattern("GET /health")
///     .build()?;
///
/// // Sampled out: no context, no record
/// let health = CallDescriptor::new("health check")
///     .with_kind(CallKind::Server)
///     .with_method("GET")
///     .with_target("/health");
/// assert!(tracer.start_if_sampled(None, health).is_none());
///
/// // Traced: one record once the span ends
/// let query = CallDescriptor::new("db.query").with_kind(CallKind::Client);
/// if let Some(context) = tracer.start_if_sampled(None, query) {
///     tracer.end(Some(&context), Outcome::Success);
/// }
///
/// assert_eq!(sink.len(), 1);
/// assert_eq!(sink.records()[0].name, "db.query");
/// # Ok::<(), spanpipe::Error>(())
/// ```
#[derive(Clone)]
pub struct Instrumenter {
    inner: Arc<InstrumenterInner>,
}

struct InstrumenterInner {
    sampler: SpanSampler,
    registry: Arc<SpanRegistry>,
    counters: Arc<PipelineCounters>,
    sweep: SweepConfig,
}

impl Instrumenter {
    /// Starts building an instrumenter.
    pub fn builder() -> InstrumenterBuilder<NoSink> {
        InstrumenterBuilder::new()
    }

    pub(crate) fn from_parts(
        sampler: SpanSampler,
        registry: Arc<SpanRegistry>,
        sweep: SweepConfig,
    ) -> Self {
        let counters = registry.counters();
        Self {
            inner: Arc::new(InstrumenterInner {
                sampler,
                registry,
                counters,
                sweep,
            }),
        }
    }

    /// Decides whether a call described by `descriptor` should be traced.
    ///
    /// Resolves the descriptor to its span name and checks it against the
    /// ignore patterns. Pure decision: no context is allocated and the
    /// common path does not allocate at all. A `false` counts toward
    /// [`PipelineStats::sampled_out`].
    pub fn should_start(&self, descriptor: &CallDescriptor) -> bool {
        let name = resolve(descriptor);
        if self.inner.sampler.decide(&name).is_drop() {
            self.inner.counters.record_sampled_out();
            tracing::trace!(name = %name, "call sampled out");
            return false;
        }
        true
    }

    /// Registers a span for `descriptor` and returns its context.
    ///
    /// Meant to follow a `true` from [`should_start`]; calling it without
    /// the check traces the call unconditionally. With a `parent` the
    /// span joins that trace as a child, otherwise it roots a new one.
    ///
    /// [`should_start`]: Instrumenter::should_start
    pub fn start(
        &self,
        parent: Option<&SpanContext>,
        descriptor: CallDescriptor,
    ) -> SpanContext {
        let name = resolve(&descriptor).into_owned();
        let kind = descriptor.kind();
        let attributes = descriptor.into_attributes();
        self.inner.registry.create(parent, name, kind, attributes)
    }

    /// Fuses [`should_start`] and [`start`]: `None` means the call was
    /// sampled out and nothing was registered.
    ///
    /// [`should_start`]: Instrumenter::should_start
    /// [`start`]: Instrumenter::start
    pub fn start_if_sampled(
        &self,
        parent: Option<&SpanContext>,
        descriptor: CallDescriptor,
    ) -> Option<SpanContext> {
        if !self.should_start(&descriptor) {
            return None;
        }
        Some(self.start(parent, descriptor))
    }

    /// Closes a span with a terminal outcome.
    ///
    /// `None` is the sampled-out case and is a quiet no-op, so call sites
    /// can thread an `Option<SpanContext>` straight through. Closing an
    /// already-closed or unknown context is recovered by the registry.
    pub fn end(&self, context: Option<&SpanContext>, outcome: Outcome) {
        match context {
            Some(context) => self.inner.registry.close(context, outcome),
            None => tracing::trace!("end of sampled-out call ignored"),
        }
    }

    /// Creates a one-shot completion guard for a started span.
    pub fn completion(&self, context: &SpanContext) -> CompletionGuard {
        CompletionGuard::new(Arc::clone(&self.inner.registry), context.clone())
    }

    /// Traces one call end to end.
    ///
    /// Runs `f`, which either fails synchronously or hands back the
    /// future that will deliver the result:
    ///
    /// - Sampled out: `f`'s future (or error) passes through untraced.
    /// - `f` returns `Err(e)`: the span closes as failed and the error is
    ///   returned unchanged, before any future exists.
    /// - `f` returns `Ok(future)`: the future is returned wrapped in a
    ///   [`TracedFuture`] that closes the span when it resolves.
    ///
    /// ## Example
    ///
    /// ```rust,ignore
    /// let reply = tracer
    ///     .trace_call(None, CallDescriptor::new("driver.find"), || {
    ///         driver.send(command) // Result<impl Future, DriverError>
    ///     })?
    ///     .await?;
    /// ```
    pub fn trace_call<F, Fut, E>(
        &self,
        parent: Option<&SpanContext>,
        descriptor: CallDescriptor,
        f: F,
    ) -> Result<TracedFuture<Fut>, E>
    where
        F: FnOnce() -> Result<Fut, E>,
        E: fmt::Display,
    {
        if !self.should_start(&descriptor) {
            return Ok(TracedFuture::new(f()?, None));
        }

        let context = self.start(parent, descriptor);
        match f() {
            Ok(future) => Ok(attach(future, self.completion(&context))),
            Err(error) => {
                self.end(Some(&context), Outcome::failed(&error));
                Err(error)
            }
        }
    }

    /// Returns a snapshot of the pipeline counters.
    pub fn stats(&self) -> PipelineStats {
        self.inner.counters.snapshot()
    }

    /// Returns the number of spans currently pending.
    pub fn open_spans(&self) -> usize {
        self.inner.registry.open_spans()
    }

    /// Sweeps abandoned spans immediately, using the configured expiry.
    ///
    /// Returns the number reclaimed. Works whether or not the background
    /// sweeper is running.
    pub fn sweep_now(&self) -> usize {
        self.inner.registry.sweep_expired(self.inner.sweep.span_expiry)
    }

    /// Spawns the background sweeper for this pipeline.
    ///
    /// Must be called within a tokio runtime. Respects the configured
    /// [`SweepConfig`]; a disabled config yields an inert handle.
    pub fn spawn_sweeper(&self) -> SweeperHandle {
        Sweeper::spawn(Arc::clone(&self.inner.registry), self.inner.sweep.clone())
    }
}

impl fmt::Debug for Instrumenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instrumenter")
            .field("ignore_patterns", &self.inner.sampler.len())
            .field("open_spans", &self.open_spans())
            .finish_non_exhaustive()
    }
}
