//! Core types for the span pipeline.
//!
//! This module provides the fundamental types used throughout the pipeline:
//!
//! - [`CallDescriptor`]: Describes a call before it runs (label, method, target, kind)
//! - [`Outcome`]: The lifecycle state of a traced operation
//! - [`SpanRecord`]: A finished span as handed to the sink
//! - [`AttrValue`]: Attribute values attached to spans

mod descriptor;
mod outcome;
mod record;
mod value;

pub use descriptor::{CallDescriptor, CallKind};
pub use outcome::Outcome;
pub use record::SpanRecord;
pub use value::AttrValue;
