//! Pending-call descriptors and call kinds.

use serde::Serialize;

use super::AttrValue;

/// Role of a traced call within its trace.
///
/// `Server` is the one kind that changes behavior: name resolution for
/// server calls prefers the `"<method> <target>"` form over the raw
/// operation label (see [`resolve`](crate::resolve::resolve)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CallKind {
    /// An outgoing request to another service.
    #[default]
    Client,
    /// An incoming request handled by this service.
    Server,
    /// An operation that stays inside the process.
    Internal,
    /// An asynchronous message send.
    Producer,
    /// An asynchronous message receive.
    Consumer,
}

impl CallKind {
    /// Returns `true` if this is a server-side call.
    pub fn is_server(&self) -> bool {
        matches!(self, CallKind::Server)
    }
}

impl std::fmt::Display for CallKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallKind::Client => write!(f, "client"),
            CallKind::Server => write!(f, "server"),
            CallKind::Internal => write!(f, "internal"),
            CallKind::Producer => write!(f, "producer"),
            CallKind::Consumer => write!(f, "consumer"),
        }
    }
}

/// Description of a call that is about to run.
///
/// A descriptor is the input to the sampling decision and to span creation:
/// it carries the raw operation label, the optional request method and
/// target that shape server-call names, the call kind, and any attributes
/// to copy onto the finished record.
///
/// ## Example
///
/// ```rust
/// use spanpipe::{CallDescriptor, CallKind};
///
/// // An outgoing driver call
/// let query = CallDescriptor::new("db.find")
///     .with_attribute("db.collection", "users");
/// assert_eq!(query.operation(), "db.find");
///
/// // An incoming HTTP request
/// let request = CallDescriptor::new("http.request")
///     .with_kind(CallKind::Server)
///     .with_method("GET")
///     .with_target("/health");
/// assert!(request.kind().is_server());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CallDescriptor {
    /// The raw operation label.
    operation: String,
    /// The request method, for calls that have one.
    method: Option<String>,
    /// The request target or route, for calls that have one.
    target: Option<String>,
    /// The call kind.
    kind: CallKind,
    /// Attributes copied onto the finished span record.
    attributes: Vec<(String, AttrValue)>,
}

impl CallDescriptor {
    /// Creates a descriptor for the given operation label.
    ///
    /// The kind defaults to [`CallKind::Client`].
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            method: None,
            target: None,
            kind: CallKind::Client,
            attributes: Vec::new(),
        }
    }

    /// Sets the call kind.
    #[must_use]
    pub fn with_kind(mut self, kind: CallKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the request method.
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Sets the request target.
    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Adds an attribute to copy onto the finished record.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Returns the raw operation label.
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Returns the request method, if set.
    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    /// Returns the request target, if set.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Returns the call kind.
    pub fn kind(&self) -> CallKind {
        self.kind
    }

    /// Returns the attributes.
    pub fn attributes(&self) -> &[(String, AttrValue)] {
        &self.attributes
    }

    /// Consumes the descriptor, returning its attributes.
    pub(crate) fn into_attributes(self) -> Vec<(String, AttrValue)> {
        self.attributes
    }
}
