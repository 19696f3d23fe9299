//! Span context and identifiers for in-flight operations.

use std::fmt;

use serde::{Serialize, Serializer};

/// A 128-bit trace identifier.
///
/// Never all-zero; lowercase hex in `Display`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TraceId([u8; 16]);

impl TraceId {
    /// Creates a new random trace ID.
    pub fn random() -> Self {
        let mut bytes = [0u8; 16];
        // All-zero is reserved as invalid; regenerate on the off chance.
        while bytes == [0u8; 16] {
            getrandom::getrandom(&mut bytes).expect("Failed to generate random bytes");
        }
        Self(bytes)
    }

    /// Creates a trace ID from bytes.
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Creates a trace ID from a hex string.
    pub fn from_hex(hex: &str) -> Result<Self, IdParseError> {
        if hex.len() != 32 {
            return Err(IdParseError::InvalidTraceId);
        }
        let mut bytes = [0u8; 16];
        hex::decode_to_slice(hex, &mut bytes).map_err(|_| IdParseError::InvalidTraceId)?;

        // Check for invalid all-zero trace ID
        if bytes == [0u8; 16] {
            return Err(IdParseError::InvalidTraceId);
        }

        Ok(Self(bytes))
    }

    /// Returns the trace ID as bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Debug for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TraceId({})", self)
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl Serialize for TraceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A 64-bit span identifier.
///
/// Never all-zero; lowercase hex in `Display`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SpanId([u8; 8]);

impl SpanId {
    /// Creates a new random span ID.
    pub fn random() -> Self {
        let mut bytes = [0u8; 8];
        while bytes == [0u8; 8] {
            getrandom::getrandom(&mut bytes).expect("Failed to generate random bytes");
        }
        Self(bytes)
    }

    /// Creates a span ID from bytes.
    pub fn from_bytes(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }

    /// Creates a span ID from a hex string.
    pub fn from_hex(hex: &str) -> Result<Self, IdParseError> {
        if hex.len() != 16 {
            return Err(IdParseError::InvalidSpanId);
        }
        let mut bytes = [0u8; 8];
        hex::decode_to_slice(hex, &mut bytes).map_err(|_| IdParseError::InvalidSpanId)?;

        // Check for invalid all-zero span ID
        if bytes == [0u8; 8] {
            return Err(IdParseError::InvalidSpanId);
        }

        Ok(Self(bytes))
    }

    /// Returns the span ID as bytes.
    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }
}

impl fmt::Debug for SpanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SpanId({})", self)
    }
}

impl fmt::Display for SpanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl Serialize for SpanId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The in-flight handle for one traced operation.
///
/// A `SpanContext` is what callers hold between starting a span and ending
/// it. It identifies the span within the registry and carries its position
/// in the trace tree. The parent reference is an identifier, not an owned
/// parent: ending or dropping a child has no effect on the parent span.
///
/// Contexts are cheap to clone and safe to send across threads; every copy
/// refers to the same registered span.
///
/// ## Example
///
/// ```rust
/// use spanpipe::SpanContext;
///
/// let root = SpanContext::new_root();
/// let child = root.child();
///
/// assert_eq!(child.trace_id(), root.trace_id());
/// assert_ne!(child.span_id(), root.span_id());
/// assert_eq!(child.parent_span_id(), Some(root.span_id()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpanContext {
    /// The trace ID (16 bytes).
    trace_id: TraceId,
    /// The span ID (8 bytes).
    span_id: SpanId,
    /// The parent span ID (if any).
    parent_span_id: Option<SpanId>,
}

impl SpanContext {
    /// Creates a new root context with random IDs.
    pub fn new_root() -> Self {
        Self {
            trace_id: TraceId::random(),
            span_id: SpanId::random(),
            parent_span_id: None,
        }
    }

    /// Creates a context with the given trace and span IDs.
    pub fn new(trace_id: TraceId, span_id: SpanId) -> Self {
        Self {
            trace_id,
            span_id,
            parent_span_id: None,
        }
    }

    /// Creates a child context from this context.
    ///
    /// The child inherits the trace ID and uses the current span ID as its
    /// parent.
    pub fn child(&self) -> Self {
        Self {
            trace_id: self.trace_id.clone(),
            span_id: SpanId::random(),
            parent_span_id: Some(self.span_id.clone()),
        }
    }

    /// Returns the trace ID.
    pub fn trace_id(&self) -> &TraceId {
        &self.trace_id
    }

    /// Returns the span ID.
    pub fn span_id(&self) -> &SpanId {
        &self.span_id
    }

    /// Returns the parent span ID, if any.
    pub fn parent_span_id(&self) -> Option<&SpanId> {
        self.parent_span_id.as_ref()
    }

    /// Returns `true` if this is a root context.
    pub fn is_root(&self) -> bool {
        self.parent_span_id.is_none()
    }
}

impl fmt::Display for SpanContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.trace_id, self.span_id)
    }
}

/// Error parsing a trace or span identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdParseError {
    /// Invalid trace ID (wrong length, non-hex, or all-zero).
    InvalidTraceId,
    /// Invalid span ID (wrong length, non-hex, or all-zero).
    InvalidSpanId,
}

impl fmt::Display for IdParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdParseError::InvalidTraceId => write!(f, "invalid trace ID"),
            IdParseError::InvalidSpanId => write!(f, "invalid span ID"),
        }
    }
}

impl std::error::Error for IdParseError {}
