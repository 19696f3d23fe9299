//! Instrumenter builder with typestate pattern.

use std::marker::PhantomData;
use std::sync::Arc;

use super::Instrumenter;
use crate::config::{SamplingConfig, SweepConfig};
use crate::error::{Error, Result};
use crate::registry::SpanRegistry;
use crate::sampler::SpanSampler;
use crate::sink::SpanSink;

/// Marker type: sink not yet provided.
pub struct NoSink;

/// Marker type: sink has been provided.
pub struct HasSink;

/// Builder for creating [`Instrumenter`] instances.
///
/// Uses the typestate pattern to ensure the one required piece, the span
/// sink, is provided at compile time.
///
/// ## Required Configuration
///
/// - `sink()`: Where finalized span records go
///
/// ## Optional Configuration
///
/// - `sampling()`: Ignore patterns over resolved span names
/// - `ignore_pattern()`: Shorthand for appending one ignore pattern
/// - `sweep()`: Abandoned-span reclamation policy
///
/// ## Example
///
/// ```rust
/// use spanpipe::{Instrumenter, SweepConfig};
/// use spanpipe::sink::NoopSink;
/// use std::time::Duration;
///
/// let tracer = Instrumenter::builder()
///     .sink(NoopSink)
///     .ignore_pattern("GET /health")
///     .sweep(SweepConfig::builder().span_expiry(Duration::from_secs(60)).build())
///     .build()?;
/// # Ok::<(), spanpipe::Error>(())
/// ```
pub struct InstrumenterBuilder<SinkState> {
    sink: Option<Arc<dyn SpanSink>>,
    sampling: SamplingConfig,
    sweep: SweepConfig,
    _sink_state: PhantomData<SinkState>,
}

impl InstrumenterBuilder<NoSink> {
    /// Creates a new instrumenter builder.
    pub fn new() -> Self {
        Self {
            sink: None,
            sampling: SamplingConfig::default(),
            sweep: SweepConfig::default(),
            _sink_state: PhantomData,
        }
    }

    /// Sets the sink that receives finalized span records.
    pub fn sink(self, sink: impl SpanSink + 'static) -> InstrumenterBuilder<HasSink> {
        InstrumenterBuilder {
            sink: Some(Arc::new(sink)),
            sampling: self.sampling,
            sweep: self.sweep,
            _sink_state: PhantomData,
        }
    }
}

impl Default for InstrumenterBuilder<NoSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> InstrumenterBuilder<S> {
    /// Sets the sampling configuration.
    #[must_use]
    pub fn sampling(mut self, config: SamplingConfig) -> Self {
        self.sampling = config;
        self
    }

    /// Appends one ignore pattern to the sampling configuration.
    #[must_use]
    pub fn ignore_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.sampling.ignore_name_patterns.push(pattern.into());
        self
    }

    /// Sets the sweep configuration.
    #[must_use]
    pub fn sweep(mut self, config: SweepConfig) -> Self {
        self.sweep = config;
        self
    }
}

impl InstrumenterBuilder<HasSink> {
    /// Builds the instrumenter.
    ///
    /// Compiles every ignore pattern up front; nothing is constructed if
    /// any of them is invalid.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Any ignore pattern fails to compile (`ErrorKind::InvalidPattern`,
    ///   carrying the offending pattern)
    /// - The sweep configuration is degenerate (`ErrorKind::Configuration`)
    pub fn build(self) -> Result<Instrumenter> {
        if self.sweep.span_expiry.is_zero() {
            return Err(Error::configuration("span expiry cannot be zero"));
        }
        if self.sweep.enabled && self.sweep.sweep_interval.is_zero() {
            return Err(Error::configuration("sweep interval cannot be zero"));
        }

        let sampler = SpanSampler::new(&self.sampling.ignore_name_patterns)?;
        let sink = self
            .sink
            .ok_or_else(|| Error::configuration("sink is required"))?;
        let registry = Arc::new(SpanRegistry::new(sink));

        Ok(Instrumenter::from_parts(sampler, registry, self.sweep))
    }
}
