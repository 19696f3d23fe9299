//! Finalized span records handed to sinks.

use std::time::{Duration, SystemTime};

use serde::Serialize;

use super::{AttrValue, CallKind, Outcome};
use crate::context::{SpanId, TraceId};

/// A finished span, emitted to the configured sink exactly once.
///
/// A record is produced at the moment a span context makes its terminal
/// transition. It is inert data: changing it has no effect on the registry,
/// and the registry holds no reference to it after emission.
///
/// Wall-clock fields (`started_at`, `ended_at`) serialize as milliseconds
/// since the Unix epoch; `duration` is measured on the monotonic clock and
/// serializes as milliseconds.
#[derive(Debug, Clone, Serialize)]
pub struct SpanRecord {
    /// The trace this span belongs to.
    pub trace_id: TraceId,
    /// The span's own identifier.
    pub span_id: SpanId,
    /// The parent span, if this span is not a trace root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_span_id: Option<SpanId>,
    /// The resolved operation name.
    pub name: String,
    /// The call kind.
    pub kind: CallKind,
    /// Wall-clock time the span started.
    #[serde(with = "time_millis")]
    pub started_at: SystemTime,
    /// Wall-clock time the span ended.
    #[serde(with = "time_millis")]
    pub ended_at: SystemTime,
    /// Monotonic duration of the operation.
    #[serde(with = "duration_millis")]
    pub duration: Duration,
    /// The terminal outcome.
    pub outcome: Outcome,
    /// Attributes carried over from the call descriptor.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<(String, AttrValue)>,
}

impl SpanRecord {
    /// Returns `true` if the span completed successfully.
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }

    /// Returns `true` if the span completed with a failure.
    pub fn is_failed(&self) -> bool {
        self.outcome.is_failed()
    }

    /// Returns `true` if the span was discarded rather than completed.
    pub fn is_dropped(&self) -> bool {
        self.outcome.is_dropped()
    }

    /// Looks up an attribute by key.
    pub fn attribute(&self, key: &str) -> Option<&AttrValue> {
        self.attributes.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

impl std::fmt::Display for SpanRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {} ({:?}, {})",
            self.name, self.kind, self.span_id, self.duration, self.outcome
        )
    }
}

/// Serde helper for `SystemTime` as milliseconds since the Unix epoch.
mod time_millis {
    use std::time::{SystemTime, UNIX_EPOCH};

    use serde::{Serialize, Serializer};

    pub fn serialize<S>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = time
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        millis.serialize(serializer)
    }
}

/// Serde helper for `Duration` as milliseconds.
mod duration_millis {
    use std::time::Duration;

    use serde::{Serialize, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }
}
