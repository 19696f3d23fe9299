//! Error types for the span pipeline.
//!
//! The pipeline distinguishes two classes of failure:
//! - **Fatal** ([`ErrorKind::Configuration`], [`ErrorKind::InvalidPattern`]):
//!   raised as `Err` at construction time; no partially-configured pipeline
//!   ever exists.
//! - **Logic** ([`ErrorKind::DoubleClose`], [`ErrorKind::UnknownContext`]):
//!   misuse of a running pipeline; logged and counted, never propagated onto
//!   the traced call's result path.
//!
//! ## Key Invariant
//!
//! A traced operation's own outcome is never converted into a pipeline
//! `Err`. An operation that fails produces a span record with a failed
//! outcome, and the caller still receives the operation's value or error
//! unchanged.
//!
//! ```rust,ignore
//! // Build-time errors are real errors
//! let pipeline = Instrumenter::builder()
//!     .sink(sink)
//!     .sampling(config)
//!     .build()?; // Err(ErrorKind::InvalidPattern) on a bad pattern
//!
//! // Runtime misuse is not
//! pipeline.end(Some(&ctx), Outcome::Success);
//! pipeline.end(Some(&ctx), Outcome::Success); // logged no-op, no Err
//! ```

mod error;
mod kind;

pub use error::Error;
pub use kind::ErrorKind;

/// A specialized `Result` type for span pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
