//! Retry and polling policies.
//!
//! Policies are plain values: built by the caller, borrowed by the engine for
//! exactly one call, never mutated by the engine. There is no ambient default
//! table — callers that want the stock transient-error patterns opt in via
//! [`RetryPolicy::transient_defaults`].

use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::{Error, Result};

/// Policy for [`run_with_retries`](crate::run_with_retries).
///
/// `max_retries` counts *re*-attempts: `max_retries = 0` means exactly one
/// attempt. Negative values are unrepresentable by construction.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// How many times to re-attempt after the first failure.
    pub max_retries: u32,
    /// Sleep between attempts.
    pub delay: Duration,
    /// Known transient patterns: substring → human description.
    pub known_errors: BTreeMap<String, String>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay: Duration::from_secs(5),
            known_errors: BTreeMap::new(),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self {
            max_retries,
            delay,
            known_errors: BTreeMap::new(),
        }
    }

    /// Default policy pre-seeded with [`default_transient_errors`].
    pub fn transient_defaults() -> Self {
        Self {
            known_errors: default_transient_errors(),
            ..Self::default()
        }
    }

    /// Register one transient pattern.
    pub fn with_known_error(
        mut self,
        pattern: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.known_errors.insert(pattern.into(), description.into());
        self
    }

    /// Register several transient patterns at once.
    pub fn with_known_errors<I, P, D>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (P, D)>,
        P: Into<String>,
        D: Into<String>,
    {
        self.known_errors
            .extend(entries.into_iter().map(|(p, d)| (p.into(), d.into())));
        self
    }
}

/// Policy for [`poll_until_consistent`](crate::poll_until_consistent).
#[derive(Debug, Clone)]
pub struct PollPolicy {
    /// Total probe budget; every probe, successful or not, consumes one.
    pub max_attempts: u32,
    /// Sleep between probes.
    pub interval: Duration,
    /// How many probes in a row must succeed before the condition counts as
    /// stable. `1` degenerates to "succeed on the first true probe".
    pub required_consecutive_successes: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval: Duration::from_secs(1),
            required_consecutive_successes: 1,
        }
    }
}

impl PollPolicy {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
            required_consecutive_successes: 1,
        }
    }

    pub fn with_consecutive_successes(mut self, required: u32) -> Self {
        self.required_consecutive_successes = required;
        self
    }

    /// Reject impossible configurations before any probe I/O happens.
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::InvalidPolicy("max_attempts must be at least 1".into()));
        }
        if self.required_consecutive_successes == 0 {
            return Err(Error::InvalidPolicy(
                "required_consecutive_successes must be at least 1".into(),
            ));
        }
        if self.required_consecutive_successes > self.max_attempts {
            return Err(Error::InvalidPolicy(format!(
                "required_consecutive_successes ({}) exceeds max_attempts ({})",
                self.required_consecutive_successes, self.max_attempts
            )));
        }
        Ok(())
    }
}

/// The stock table of transient failure patterns seen across infrastructure
/// tooling (network flakes, throttling, registry hiccups).
///
/// Deliberately an explicit constructor rather than ambient state: a policy
/// only carries these patterns if its builder asked for them.
pub fn default_transient_errors() -> BTreeMap<String, String> {
    [
        ("connection refused", "endpoint not accepting connections yet"),
        ("connection reset by peer", "connection reset mid-request"),
        ("i/o timeout", "network I/O timed out"),
        ("TLS handshake timeout", "TLS handshake timed out"),
        ("no such host", "DNS lookup failed"),
        (
            "temporary failure in name resolution",
            "DNS resolver temporarily unavailable",
        ),
        ("429 Too Many Requests", "rate limited by remote API"),
        ("503 Service Unavailable", "remote service temporarily unavailable"),
        ("could not download module", "module registry temporarily unreachable"),
    ]
    .into_iter()
    .map(|(p, d)| (p.to_string(), d.to_string()))
    .collect()
}
