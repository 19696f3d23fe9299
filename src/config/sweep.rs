//! Sweep configuration for abandoned span reclamation.

use std::time::Duration;

/// Configuration for reclaiming abandoned pending spans.
///
/// An asynchronous call can vanish without ever delivering a result; its
/// span context then sits in the registry forever unless something removes
/// it. The sweeper closes contexts that have been pending longer than
/// `span_expiry`, emitting one record with a dropped outcome for each.
///
/// The expiry is a resource bound, not a timing guarantee: a slow call that
/// outlives it gets swept even though its result may still arrive later
/// (the late close is then a logged no-op).
///
/// ## Default Values
///
/// - `span_expiry`: 300s
/// - `sweep_interval`: 60s
/// - `enabled`: true
///
/// ## Example
///
/// ```rust
/// use spanpipe::SweepConfig;
/// use std::time::Duration;
///
/// // Aggressive reclamation for a high-churn workload
/// let config = SweepConfig::builder()
///     .span_expiry(Duration::from_secs(30))
///     .sweep_interval(Duration::from_secs(5))
///     .build();
/// assert!(config.enabled);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct SweepConfig {
    /// How long a span may stay pending before it is considered abandoned.
    #[builder(default = Duration::from_secs(300))]
    pub span_expiry: Duration,

    /// How often the background sweeper scans the registry.
    #[builder(default = Duration::from_secs(60))]
    pub sweep_interval: Duration,

    /// Whether the background sweeper runs at all.
    ///
    /// Manual sweeps stay available either way.
    #[builder(default = true)]
    pub enabled: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl SweepConfig {
    /// Creates a configuration with the background sweeper disabled.
    pub fn disabled() -> Self {
        Self::builder().enabled(false).build()
    }
}
