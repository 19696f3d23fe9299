//! Sampling configuration for span name filtering.

/// Configuration for name-based span sampling.
///
/// Each pattern is a regular expression matched against the **whole**
/// resolved span name. A span whose resolved name matches any pattern is
/// dropped before a context is ever allocated; everything else is sampled.
/// Substring hits do not count: `health` drops the span named `health` and
/// nothing else, while `.*health.*` drops every name containing it.
///
/// ## Default Values
///
/// - `ignore_name_patterns`: empty (every span is sampled)
///
/// ## Example
///
/// ```rust
/// use spanpipe::SamplingConfig;
///
/// // Drop health checks and any admin command
/// let config = SamplingConfig::builder()
///     .ignore_name_patterns(vec![
///         "GET /health".to_string(),
///         "admin\\..*".to_string(),
///     ])
///     .build();
/// assert_eq!(config.ignore_name_patterns.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct SamplingConfig {
    /// Regular expressions that drop a span when one matches its whole
    /// resolved name.
    #[builder(default)]
    pub ignore_name_patterns: Vec<String>,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl SamplingConfig {
    /// Creates a configuration that samples everything.
    pub fn sample_all() -> Self {
        Self::default()
    }

    /// Adds one ignore pattern.
    #[must_use]
    pub fn with_ignore(mut self, pattern: impl Into<String>) -> Self {
        self.ignore_name_patterns.push(pattern.into());
        self
    }

    /// Returns `true` if no ignore patterns are configured.
    pub fn is_empty(&self) -> bool {
        self.ignore_name_patterns.is_empty()
    }
}
