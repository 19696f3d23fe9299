//! Name-based span sampling.
//!
//! The sampler turns a set of ignore patterns into a keep/drop decision
//! over resolved operation names. Patterns are regular expressions matched
//! against the whole name: `GET /health` drops that route and nothing
//! else, while `admin\..*` drops every name under the `admin.` prefix.
//! Compilation happens once, up front, and a single bad pattern fails the
//! whole construction rather than being silently skipped.

use regex::{Regex, RegexSet};

use crate::error::{Error, Result};

/// Keep/drop decision for one resolved operation name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingDecision {
    /// Record the span.
    Sample,
    /// Do not record the span.
    Drop,
}

impl SamplingDecision {
    /// Returns `true` if the span should be recorded.
    pub fn is_sample(&self) -> bool {
        matches!(self, SamplingDecision::Sample)
    }

    /// Returns `true` if the span should be dropped.
    pub fn is_drop(&self) -> bool {
        matches!(self, SamplingDecision::Drop)
    }
}

impl std::fmt::Display for SamplingDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SamplingDecision::Sample => write!(f, "sample"),
            SamplingDecision::Drop => write!(f, "drop"),
        }
    }
}

/// Compiled ignore-pattern set, immutable after construction.
///
/// The pattern set is compiled into one [`RegexSet`] with every pattern
/// anchored at both ends, reproducing whole-string match semantics:
/// substring hits never drop a span. Decisions are read-only and safe to
/// make from any number of threads concurrently.
///
/// ## Example
///
/// ```rust
/// use spanpipe::sampler::SpanSampler;
///
/// let sampler = SpanSampler::new(["GET /health", r"admin\..*"])?;
///
/// assert!(sampler.decide("GET /health").is_drop());
/// assert!(sampler.decide("GET /healthz").is_sample()); // no substring match
/// assert!(sampler.decide("admin.flush").is_drop());
/// # Ok::<(), spanpipe::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct SpanSampler {
    /// All patterns, anchored, as one set.
    set: RegexSet,
    /// The raw patterns as supplied, for diagnostics.
    patterns: Vec<String>,
}

impl Default for SpanSampler {
    fn default() -> Self {
        Self {
            set: RegexSet::empty(),
            patterns: Vec::new(),
        }
    }
}

impl SpanSampler {
    /// Compiles a sampler from raw ignore patterns.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidPattern`](crate::ErrorKind::InvalidPattern)
    /// carrying the first offending pattern if any pattern fails to
    /// compile. No sampler is constructed in that case.
    pub fn new<I>(patterns: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut raw = Vec::new();
        let mut anchored = Vec::new();

        for pattern in patterns {
            let pattern = pattern.as_ref();
            let anchored_pattern = Self::anchor(pattern);
            // Compile individually first so the error names the pattern
            Regex::new(&anchored_pattern)
                .map_err(|err| Error::invalid_pattern(pattern).with_source(err))?;
            raw.push(pattern.to_string());
            anchored.push(anchored_pattern);
        }

        let set = RegexSet::new(&anchored)?;
        Ok(Self { set, patterns: raw })
    }

    /// Decides whether a resolved operation name should be recorded.
    ///
    /// Returns [`SamplingDecision::Drop`] if any pattern matches the whole
    /// name, [`SamplingDecision::Sample`] otherwise. An empty sampler
    /// samples everything.
    pub fn decide(&self, resolved_name: &str) -> SamplingDecision {
        if self.set.is_match(resolved_name) {
            SamplingDecision::Drop
        } else {
            SamplingDecision::Sample
        }
    }

    /// Returns the raw patterns this sampler was built from.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Returns the number of patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns `true` if no patterns are configured.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Anchors a pattern so it must match the entire name.
    fn anchor(pattern: &str) -> String {
        format!("^(?:{})$", pattern)
    }
}
