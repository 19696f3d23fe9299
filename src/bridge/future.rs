//! Future wrapper that closes a span when the result arrives.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context as TaskContext, Poll};

use pin_project_lite::pin_project;

use super::{CompletionGuard, EmbeddedError};
use crate::context::SpanContext;

pin_project! {
    /// A future that completes its span as a side effect of resolving.
    ///
    /// The wrapped future's output passes through untouched. What the
    /// output decides is only the span's outcome:
    ///
    /// | Output | Outcome |
    /// |--------|---------|
    /// | `Ok(v)`, `v.embedded_error()` is `None` | `Success` |
    /// | `Ok(v)`, `v.embedded_error()` is `Some(msg)` | `Failed(msg)` |
    /// | `Err(e)` | `Failed(e.to_string())` |
    ///
    /// Dropping the future before it resolves leaves the span pending;
    /// the registry sweep reclaims it later.
    #[derive(Debug)]
    pub struct TracedFuture<F> {
        #[pin]
        inner: F,
        guard: Option<CompletionGuard>,
    }
}

impl<F> TracedFuture<F> {
    /// `None` means the call was sampled out; the wrapper then passes the
    /// future through without touching any span.
    pub(crate) fn new(inner: F, guard: Option<CompletionGuard>) -> Self {
        Self { inner, guard }
    }

    /// Returns the span context this future will complete, if any.
    pub fn context(&self) -> Option<&SpanContext> {
        self.guard.as_ref().map(CompletionGuard::context)
    }
}

impl<F, T, E> Future for TracedFuture<F>
where
    F: Future<Output = Result<T, E>>,
    T: EmbeddedError,
    E: fmt::Display,
{
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let result = match this.inner.poll(cx) {
            Poll::Ready(result) => result,
            Poll::Pending => return Poll::Pending,
        };

        if let Some(guard) = this.guard.take() {
            match &result {
                Ok(value) => match value.embedded_error() {
                    None => {
                        guard.success();
                    }
                    Some(message) => {
                        guard.failure(message);
                    }
                },
                Err(error) => {
                    guard.failure(error);
                }
            }
        }
        Poll::Ready(result)
    }
}

/// Wraps `future` so that `guard`'s span closes when the result arrives.
///
/// Registration is immediate; the wait belongs to whoever polls the
/// returned future.
pub fn attach<F>(future: F, guard: CompletionGuard) -> TracedFuture<F> {
    TracedFuture::new(future, Some(guard))
}

/// Fluent form of [`attach`] for call chains.
///
/// ## Example
///
/// ```rust,ignore
/// let reply = driver
///     .send(command)
///     .complete_span(instrumenter.completion(&context))
///     .await?;
/// ```
pub trait CompleteSpanExt: Sized {
    /// Attaches a completion guard, closing its span when this future
    /// resolves.
    fn complete_span(self, guard: CompletionGuard) -> TracedFuture<Self> {
        TracedFuture::new(self, Some(guard))
    }
}

impl<F: Future> CompleteSpanExt for F {}
