//! Main error type for the span pipeline.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

use super::ErrorKind;

/// The primary error type for span pipeline operations.
///
/// `Error` provides the context needed to act on a failure:
/// - [`kind()`](Error::kind): Categorization for `match` statements
/// - [`pattern()`](Error::pattern): The offending ignore pattern, if any
/// - [`is_logic()`](Error::is_logic): Whether this describes recovered misuse
///
/// ## Error Hierarchy
///
/// ```text
/// Error
/// ├── kind: ErrorKind          (category for matching)
/// ├── message: String          (human-readable description)
/// ├── pattern: Option          (the ignore pattern that failed to compile)
/// └── source: Option           (underlying cause, e.g. the regex error)
/// ```
///
/// ## Example
///
/// ```rust
/// use spanpipe::{Error, ErrorKind};
///
/// fn report(err: Error) {
///     match err.kind() {
///         ErrorKind::InvalidPattern => {
///             if let Some(pattern) = err.pattern() {
///                 eprintln!("bad ignore pattern: {}", pattern);
///             }
///         }
///         _ => eprintln!("pipeline error: {}", err),
///     }
/// }
/// ```
#[derive(Debug)]
pub struct Error {
    /// The error category.
    kind: ErrorKind,

    /// Human-readable error message.
    message: Cow<'static, str>,

    /// The raw ignore pattern this error is about.
    pattern: Option<String>,

    /// The underlying error, if any.
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl Error {
    /// Creates a new error with the given kind and message.
    ///
    /// # Example
    ///
    /// ```rust
    /// use spanpipe::{Error, ErrorKind};
    ///
    /// let err = Error::new(ErrorKind::Configuration, "sweep interval cannot be zero");
    /// assert_eq!(err.kind(), ErrorKind::Configuration);
    /// ```
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            pattern: None,
            source: None,
        }
    }

    /// Creates an error from a kind with a default message.
    pub fn from_kind(kind: ErrorKind) -> Self {
        let message = match kind {
            ErrorKind::Configuration => "invalid pipeline configuration",
            ErrorKind::InvalidPattern => "ignore pattern failed to compile",
            ErrorKind::DoubleClose => "span context already closed",
            ErrorKind::UnknownContext => "span context not registered",
        };
        Self::new(kind, message)
    }

    /// Returns the error kind for categorization.
    ///
    /// Use this for `match` expressions to handle different error types:
    ///
    /// ```rust
    /// use spanpipe::{Error, ErrorKind};
    ///
    /// fn is_pattern_problem(err: &Error) -> bool {
    ///     err.kind() == ErrorKind::InvalidPattern
    /// }
    /// ```
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the ignore pattern this error is about, if any.
    ///
    /// Populated for `InvalidPattern` errors so callers can report exactly
    /// which configured pattern must be fixed.
    #[inline]
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// Returns `true` if this error describes recovered pipeline misuse.
    ///
    /// This is a convenience method equivalent to `self.kind().is_logic()`.
    /// Logic errors never surface on the traced call's result path; an
    /// `Error` value with a logic kind only exists in diagnostics.
    #[inline]
    pub fn is_logic(&self) -> bool {
        self.kind.is_logic()
    }

    /// Sets the offending pattern for this error.
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Sets the source error for this error.
    #[must_use]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    // Convenience constructors for common error types

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Creates an invalid pattern error carrying the offending pattern.
    pub fn invalid_pattern(pattern: impl Into<String>) -> Self {
        Self::from_kind(ErrorKind::InvalidPattern).with_pattern(pattern)
    }

    /// Creates a double close error.
    pub fn double_close(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::DoubleClose, message)
    }

    /// Creates an unknown context error.
    pub fn unknown_context(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::UnknownContext, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;

        if let Some(ref pattern) = self.pattern {
            write!(f, " (pattern: {})", pattern)?;
        }

        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// Implement From for common error types

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::from_kind(kind)
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::from_kind(ErrorKind::InvalidPattern).with_source(err)
    }
}
