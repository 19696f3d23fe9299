//! # spanpipe
//!
//! Asynchronous operation tracing pipeline with name-based sampling.
//!
//! spanpipe turns driver-level operations into span records: each traced call
//! gets a [`SpanContext`] with fresh trace/span identifiers, runs to completion
//! (or is abandoned and later swept), and ends up as a [`SpanRecord`] delivered
//! to a [`SpanSink`]. Operations whose resolved name matches an ignore pattern
//! are dropped before any span state is allocated.
//!
//! ## Quick Start
//!
//! ```rust
//! use spanpipe::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let sink = RecordingSink::new();
//!     let tracer = Instrumenter::builder()
//!         .sink(sink.clone())
//!         .ignore_pattern("GET /health")
//!         .build()?;
//!
//!     let descriptor = CallDescriptor::new("find")
//!         .with_target("users")
//!         .with_attribute("db.collection", "users");
//!
//!     if let Some(context) = tracer.start_if_sampled(None, descriptor) {
//!         let guard = tracer.completion(&context);
//!         // ... run the operation ...
//!         guard.success();
//!     }
//!
//!     assert_eq!(sink.len(), 1);
//!     Ok(())
//! }
//! ```
//!
//! ## Key Concepts
//!
//! - **Sampling is by name**: `CallDescriptor` → resolved name → ignore
//!   patterns. A dropped operation never allocates span state.
//! - **One shot per span**: a [`CompletionGuard`] closes its span at most once;
//!   later calls on the same guard (or its clones) are no-ops.
//! - **Abandonment is not failure**: a span whose future is dropped stays
//!   pending until the sweeper expires it with [`Outcome::Dropped`].
//! - **Errors pass through**: [`TracedFuture`] records the outcome and
//!   re-delivers the inner result unchanged, embedded errors included.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

// Core modules
pub mod config;
pub mod context;
pub mod error;
pub mod types;

// Pipeline
pub mod bridge;
pub mod pipeline;
pub mod registry;
pub mod resolve;
pub mod sampler;
pub mod scope;
pub mod sink;
pub mod stats;

// Testing utilities
pub mod testing;

// Prelude for convenient imports
pub mod prelude;

// Re-export main types at crate root for convenience
pub use context::{SpanContext, SpanId, TraceId};
pub use error::{Error, ErrorKind};
pub use pipeline::{Instrumenter, InstrumenterBuilder};
pub use types::{AttrValue, CallDescriptor, CallKind, Outcome, SpanRecord};

// Re-export bridge types
pub use bridge::{CompleteSpanExt, CompletionGuard, EmbeddedError, TracedFuture};

// Re-export config types
pub use config::{SamplingConfig, SweepConfig};

// Sink, sweeper and stats types
pub use registry::SweeperHandle;
pub use sink::{NoopSink, SinkFn, SpanSink};
pub use stats::PipelineStats;

// Testing support
pub use testing::RecordingSink;
