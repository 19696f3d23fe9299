//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types for easy importing:
//!
//! ```rust
//! use spanpipe::prelude::*;
//! ```
//!
//! This provides access to:
//! - The pipeline facade and its builder
//! - Span identity and record types
//! - Error types
//! - Sink and testing types

pub use crate::{
    bridge::{CompleteSpanExt, CompletionGuard, EmbeddedError, TracedFuture},
    config::{SamplingConfig, SweepConfig},
    context::{SpanContext, SpanId, TraceId},
    error::{Error, ErrorKind, Result},
    pipeline::{Instrumenter, InstrumenterBuilder},
    registry::SweeperHandle,
    sink::{NoopSink, SinkFn, SpanSink},
    stats::PipelineStats,
    testing::RecordingSink,
    types::{AttrValue, CallDescriptor, CallKind, Outcome, SpanRecord},
};
