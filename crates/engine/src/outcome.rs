//! Per-attempt outcome of an external action or probe.

/// Result of one invocation of a caller-supplied action/probe closure.
///
/// The closure performs the actual external interaction (running a command,
/// querying an API) and reports back either the typed value it produced or a
/// description of what went wrong plus whatever raw output it captured.
#[derive(Debug, Clone)]
pub enum Outcome<T> {
    /// The attempt produced a usable value.
    Success(T),
    /// The attempt failed; carries the diagnostic detail.
    Failure(FailureDetail),
}

/// Diagnostic detail of a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureDetail {
    /// Short human-readable description of the failure.
    pub description: String,
    /// Raw captured output (stdout/stderr of a process, API error body, ...).
    /// This is the text the known-error patterns are matched against.
    pub output: String,
}

impl FailureDetail {
    pub fn new(description: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            output: output.into(),
        }
    }
}

impl<T> Outcome<T> {
    /// Shorthand for a successful attempt.
    pub fn success(value: T) -> Self {
        Outcome::Success(value)
    }

    /// Shorthand for a failed attempt.
    pub fn failure(description: impl Into<String>, output: impl Into<String>) -> Self {
        Outcome::Failure(FailureDetail::new(description, output))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }
}
