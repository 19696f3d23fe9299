//! Operation-name resolution for pending calls.
//!
//! The resolved name is what sampling decisions and span records use. For
//! most calls it is the raw operation label; server calls that carry a
//! request method and target get the `"<method> <target>"` form instead,
//! so route-shaped ignore patterns like `GET /health` match them.

use std::borrow::Cow;

use crate::types::CallDescriptor;

/// Resolves the operation name for a pending call.
///
/// Resolution is pure and deterministic:
///
/// - For non-server kinds the raw operation label is returned unchanged
///   (borrowed, no allocation).
/// - For [`CallKind::Server`](crate::CallKind::Server), the method and
///   target are trimmed, empty or missing fields are skipped, and the rest
///   joined with a single space. An empty join falls back to the raw label.
///
/// # Example
///
/// ```rust
/// use spanpipe::{resolve::resolve, CallDescriptor, CallKind};
///
/// let client = CallDescriptor::new("db.find");
/// assert_eq!(resolve(&client), "db.find");
///
/// let server = CallDescriptor::new("http.request")
///     .with_kind(CallKind::Server)
///     .with_method("GET")
///     .with_target("/health");
/// assert_eq!(resolve(&server), "GET /health");
/// ```
pub fn resolve(descriptor: &CallDescriptor) -> Cow<'_, str> {
    if !descriptor.kind().is_server() {
        return Cow::Borrowed(descriptor.operation());
    }

    let joined = [descriptor.method(), descriptor.target()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if joined.is_empty() {
        Cow::Borrowed(descriptor.operation())
    } else {
        Cow::Owned(joined)
    }
}
