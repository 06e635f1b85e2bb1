//! Error types for the stackprobe engine

use thiserror::Error;

use crate::report::FailureReport;

/// Result type alias using the engine Error
pub type Result<T> = std::result::Result<T, Error>;

/// Terminal outcomes of an engine call. The engine never swallows an error;
/// the caller decides whether to fail the test or carry on.
#[derive(Error, Debug)]
pub enum Error {
    /// The failure matched no known transient pattern; the loop stopped
    /// immediately without consuming any retry budget.
    #[error("fatal (non-retryable) failure: {0}")]
    FatalAction(String),

    /// Every attempt failed with a known transient error until the budget
    /// ran out.
    #[error("retries exhausted after {attempts} attempts; last failure: {reason}")]
    ExhaustedRetries { attempts: u32, reason: String },

    /// Polling never reached the required consecutive-success count. The
    /// report lists every distinct failure reason observed, not just the
    /// last one — a flapping condition's history is the actionable part.
    #[error("condition never satisfied; failures seen:\n{0}")]
    ConditionNeverSatisfied(FailureReport),

    /// Impossible policy configuration, rejected before any attempt ran.
    #[error("invalid policy: {0}")]
    InvalidPolicy(String),

    /// External cancellation observed before an attempt or during the
    /// inter-attempt sleep.
    #[error("operation cancelled")]
    Cancelled,

    /// Wall-clock cap elapsed before the wrapped engine call finished.
    #[error("operation timed out after {seconds}s")]
    Timeout { seconds: u64 },
}
