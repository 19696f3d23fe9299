//! Span outcome states.

use serde::Serialize;

/// The lifecycle state of a traced operation.
///
/// Every span context starts as `Pending` and makes exactly one transition
/// into a terminal state. `Success`, `Failed`, and `Dropped` are terminal;
/// a second transition attempt is a logged no-op, never a second record.
///
/// ## States
///
/// | Outcome   | Terminal | Meaning                                        |
/// |-----------|----------|------------------------------------------------|
/// | `Pending` | No       | Operation in flight, no result yet             |
/// | `Success` | Yes      | Operation completed without error              |
/// | `Failed`  | Yes      | Operation raised or carried an error           |
/// | `Dropped` | Yes      | Span discarded (explicitly or by the sweeper)  |
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The operation is still in flight.
    #[default]
    Pending,
    /// The operation completed successfully.
    Success,
    /// The operation failed, with the error rendered as a message.
    Failed(String),
    /// The span was discarded without a real completion.
    Dropped,
}

impl Outcome {
    /// Creates a failed outcome from any displayable error.
    ///
    /// # Example
    ///
    /// ```rust
    /// use spanpipe::Outcome;
    ///
    /// let outcome = Outcome::failed("connection reset");
    /// assert!(outcome.is_failed());
    /// assert_eq!(outcome.failure_message(), Some("connection reset"));
    /// ```
    pub fn failed(error: impl std::fmt::Display) -> Self {
        Outcome::Failed(error.to_string())
    }

    /// Returns `true` if this outcome ends a span.
    ///
    /// Everything except `Pending` is terminal.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Pending)
    }

    /// Returns `true` if this is the `Success` outcome.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    /// Returns `true` if this is a `Failed` outcome.
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    /// Returns `true` if this is the `Dropped` outcome.
    pub fn is_dropped(&self) -> bool {
        matches!(self, Outcome::Dropped)
    }

    /// Returns the failure message if this is a `Failed` outcome.
    pub fn failure_message(&self) -> Option<&str> {
        match self {
            Outcome::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Pending => write!(f, "pending"),
            Outcome::Success => write!(f, "success"),
            Outcome::Failed(msg) => write!(f, "failed: {}", msg),
            Outcome::Dropped => write!(f, "dropped"),
        }
    }
}
