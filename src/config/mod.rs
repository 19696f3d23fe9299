//! Configuration types for the span pipeline.
//!
//! This module provides configuration options for:
//! - [`SamplingConfig`]: Name-based keep/drop decisions
//! - [`SweepConfig`]: Reclamation of abandoned pending spans

mod sampling;
mod sweep;

pub use sampling::SamplingConfig;
pub use sweep::SweepConfig;
