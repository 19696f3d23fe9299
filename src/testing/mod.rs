//! Testing utilities for the span pipeline.
//!
//! This module provides tools for testing instrumented applications:
//!
//! - [`RecordingSink`]: An in-memory sink that captures every emitted
//!   record for assertions
//!
//! ## Quick Start
//!
//! ```rust
//! use spanpipe::{CallDescriptor, Instrumenter, Outcome};
//! use spanpipe::testing::RecordingSink;
//!
//! let sink = RecordingSink::new();
//! let tracer = Instrumenter::builder().sink(sink.clone()).build()?;
//!
//! let context = tracer.start(None, CallDescriptor::new("db.query"));
//! tracer.end(Some(&context), Outcome::Success);
//!
//! let records = sink.records();
//! assert_eq!(records.len(), 1);
//! assert!(records[0].is_success());
//! # Ok::<(), spanpipe::Error>(())
//! ```

mod recording;

pub use recording::RecordingSink;
