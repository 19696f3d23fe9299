//! Integration tests for the spanpipe tracing pipeline.
//!
//! These tests drive the public facade end to end: descriptor resolution,
//! sampling, span registration, completion bridging and sweeping, with all
//! records captured by the in-process `RecordingSink`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test integration
//!
//! # Run with verbose output
//! cargo test --test integration -- --nocapture
//!
//! # Run a specific test
//! cargo test --test integration test_ignored_call_emits_nothing -- --nocapture
//! ```
//!
//! The sweeper tests use real timers with short intervals; they are written
//! to tolerate scheduler jitter but may need `--test-threads=1` on a heavily
//! loaded machine.

mod bridge_tests;
mod common;
mod registry_tests;
mod sampler_tests;
