//! Sampling and name-resolution tests.
//!
//! Sampling correctness is what keeps health checks and other noise out of
//! the sink, so these tests pin down the whole-name match semantics and how
//! descriptor resolution feeds into the decision.

use proptest::prelude::*;
use spanpipe::resolve::resolve;
use spanpipe::sampler::SpanSampler;
use spanpipe::{CallDescriptor, CallKind};

use crate::common::recording_pipeline;

/// Test whitespace-padded server fields resolving to the ignored route
#[test]
fn test_padded_server_fields_still_match_route_pattern() {
    let (tracer, _sink) = recording_pipeline(&["GET /health"]);

    let padded = CallDescriptor::new("http.request")
        .with_kind(CallKind::Server)
        .with_method("  GET  ")
        .with_target("  /health  ");

    assert!(!tracer.should_start(&padded));
    assert_eq!(tracer.stats().sampled_out, 1);
}

/// Test that non-server calls sample against the raw operation label
#[test]
fn test_client_calls_sample_against_operation() {
    let (tracer, _sink) = recording_pipeline(&["GET /health"]);

    // Method and target are irrelevant outside server calls
    let client = CallDescriptor::new("http.request")
        .with_kind(CallKind::Client)
        .with_method("GET")
        .with_target("/health");
    assert!(tracer.should_start(&client));

    let (tracer, _sink) = recording_pipeline(&["http.request"]);
    let client = CallDescriptor::new("http.request").with_kind(CallKind::Client);
    assert!(!tracer.should_start(&client));
}

/// Test the fallback name of a bare server call feeding the sampler
#[test]
fn test_server_fallback_name_feeds_sampler() {
    let (tracer, _sink) = recording_pipeline(&["http.request"]);

    let bare = CallDescriptor::new("http.request").with_kind(CallKind::Server);
    assert!(!tracer.should_start(&bare));
}

proptest! {
    /// An empty sampler never drops any name
    #[test]
    fn test_empty_sampler_never_drops(name in ".*") {
        let sampler = SpanSampler::new(Vec::<String>::new()).expect("empty set compiles");
        prop_assert!(sampler.decide(&name).is_sample());
    }

    /// Decisions are deterministic for any name
    #[test]
    fn test_decisions_are_deterministic(name in ".*") {
        let sampler =
            SpanSampler::new(["GET /health", r"admin\..*"]).expect("patterns compile");
        prop_assert_eq!(sampler.decide(&name), sampler.decide(&name));
    }

    /// A literal pattern drops exactly its own name, never an extension
    #[test]
    fn test_literal_pattern_drops_exactly_itself(name in "[a-z]{1,12}") {
        let sampler = SpanSampler::new([name.as_str()]).expect("literal compiles");
        let suffixed = format!("{name}x");
        let prefixed = format!("x{name}");
        prop_assert!(sampler.decide(&name).is_drop());
        prop_assert!(sampler.decide(&suffixed).is_sample());
        prop_assert!(sampler.decide(&prefixed).is_sample());
    }

    /// Non-server resolution returns the operation label unchanged
    #[test]
    fn test_non_server_resolution_is_identity(name in ".*") {
        let descriptor = CallDescriptor::new(name.clone());
        let resolved = resolve(&descriptor);
        prop_assert_eq!(resolved.as_ref(), name.as_str());
    }

    /// Server resolution never yields surrounding whitespace
    #[test]
    fn test_server_resolution_has_no_surrounding_whitespace(
        method in "[ /a-zA-Z0-9]{0,10}",
        target in "[ /a-zA-Z0-9]{0,10}",
    ) {
        let descriptor = CallDescriptor::new("fallback")
            .with_kind(CallKind::Server)
            .with_method(method)
            .with_target(target);

        let name = resolve(&descriptor);
        prop_assert_eq!(name.as_ref(), name.trim());
        prop_assert!(!name.is_empty());
    }
}
