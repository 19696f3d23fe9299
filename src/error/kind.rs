//! Error kind enumeration for categorizing pipeline errors.

/// Categorization of pipeline errors.
///
/// This enum provides a stable interface for matching on error types, enabling
/// different handling strategies for different failure modes.
///
/// ## Fatal vs Logic
///
/// | ErrorKind        | Class | Action                              |
/// |------------------|-------|-------------------------------------|
/// | `Configuration`  | Fatal | Fix the pipeline configuration      |
/// | `InvalidPattern` | Fatal | Fix the offending ignore pattern    |
/// | `DoubleClose`    | Logic | Recovered internally, logged        |
/// | `UnknownContext` | Logic | Recovered internally, logged        |
///
/// Fatal errors surface as `Err` at construction time and prevent a pipeline
/// from existing at all. Logic errors describe misuse of an already-running
/// pipeline; they are logged and counted but never returned on the traced
/// call's result path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Invalid pipeline configuration (other than ignore patterns).
    ///
    /// **Fatal.** Raised at build time; fix the configuration.
    #[error("configuration error")]
    Configuration,

    /// An ignore pattern failed to compile as a regular expression.
    ///
    /// **Fatal.** Raised at build time with the offending pattern attached;
    /// no partially-working sampler is ever constructed.
    #[error("invalid ignore pattern")]
    InvalidPattern,

    /// A span context was closed more than once.
    ///
    /// **Logic.** The first close wins; later closes are no-ops. This kind
    /// exists for diagnostics and counters, not for propagation.
    #[error("span already closed")]
    DoubleClose,

    /// A span context is not present in the registry.
    ///
    /// Either the context was never created by this registry or it has
    /// already been finalized and discarded.
    ///
    /// **Logic.** Recovered internally, never propagated.
    #[error("unknown span context")]
    UnknownContext,
}

impl ErrorKind {
    /// Returns `true` if this error kind describes pipeline misuse that is
    /// recovered internally rather than surfaced to the caller.
    ///
    /// Logic errors are:
    /// - `DoubleClose` - a context was closed twice
    /// - `UnknownContext` - a context is not (or no longer) registered
    ///
    /// # Example
    ///
    /// ```rust
    /// use spanpipe::ErrorKind;
    ///
    /// assert!(ErrorKind::DoubleClose.is_logic());
    /// assert!(!ErrorKind::InvalidPattern.is_logic());
    /// ```
    #[inline]
    pub fn is_logic(&self) -> bool {
        matches!(self, ErrorKind::DoubleClose | ErrorKind::UnknownContext)
    }

    /// Returns `true` if this error kind is fatal at construction time.
    ///
    /// Fatal kinds are the complement of [`is_logic`](ErrorKind::is_logic):
    /// they abort pipeline construction and must be fixed before anything
    /// runs.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        !self.is_logic()
    }
}
