//! Failure aggregation across polling attempts.

use std::fmt;

/// Call-scoped accumulator for distinct failure descriptions, in first-seen
/// order. Only the polling loop feeds this directly.
#[derive(Debug, Default)]
pub(crate) struct FailureLog {
    reasons: Vec<String>,
    last_output: String,
}

impl FailureLog {
    /// Record one failed probe. The description is deduplicated; the raw
    /// output always replaces the previous one so the report carries the
    /// final snapshot.
    pub(crate) fn record(&mut self, description: &str, output: &str) {
        if !self.reasons.iter().any(|r| r == description) {
            self.reasons.push(description.to_string());
        }
        self.last_output.clear();
        self.last_output.push_str(output);
    }

    pub(crate) fn distinct_count(&self) -> usize {
        self.reasons.len()
    }

    /// Freeze the log into the error payload at exhaustion time.
    pub(crate) fn into_report(self, total_attempts: u32) -> FailureReport {
        FailureReport {
            total_attempts,
            distinct_failures: self.reasons,
            last_output: self.last_output,
        }
    }
}

/// Aggregated diagnostics for a condition that never stabilized.
///
/// Payload of [`Error::ConditionNeverSatisfied`](crate::Error); its `Display`
/// form is multi-line and suitable verbatim as a test failure message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReport {
    /// Total probes made, successful and failed.
    pub total_attempts: u32,
    /// Every distinct failure description, in first-seen order.
    pub distinct_failures: Vec<String>,
    /// Raw output of the last failed probe.
    pub last_output: String,
}

impl fmt::Display for FailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.distinct_failures.is_empty() {
            writeln!(f, "  (no probe failures recorded)")?;
        }
        for reason in &self.distinct_failures {
            writeln!(f, "  - {}", reason)?;
        }
        write!(f, "  ({} attempts made)", self.total_attempts)
    }
}
