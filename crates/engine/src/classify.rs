//! Transient-vs-fatal classification of action failures.

use std::collections::BTreeMap;

use crate::outcome::FailureDetail;

/// Verdict on a single failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Whether the failure matched a known transient pattern.
    pub retryable: bool,
    /// The mapped description of the matched pattern, or the raw failure
    /// description when nothing matched.
    pub reason: String,
}

/// Decide whether a failure is a known transient flake.
///
/// Each pattern in `known_errors` is tested as a plain substring of the
/// failure's raw output — no regular expressions. The map iterates in
/// lexicographic pattern order, so when more than one pattern matches, the
/// lexicographically smallest pattern wins; the verdict is deterministic for
/// a given input. An empty table means every failure is fatal.
///
/// Pure function: same `(failure, known_errors)` pair, same verdict.
pub fn classify(failure: &FailureDetail, known_errors: &BTreeMap<String, String>) -> Classification {
    for (pattern, description) in known_errors {
        if failure.output.contains(pattern.as_str()) {
            return Classification {
                retryable: true,
                reason: description.clone(),
            };
        }
    }

    Classification {
        retryable: false,
        reason: failure.description.clone(),
    }
}
