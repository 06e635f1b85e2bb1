//! Condition polling with a consecutive-success consistency requirement.

use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::outcome::Outcome;
use crate::policy::PollPolicy;
use crate::report::FailureLog;
use crate::retry::sleep_or_cancel;

/// Probe an eventually-consistent condition until it holds for
/// `policy.required_consecutive_successes` probes in a row.
///
/// Externally observed readiness can flap: a container may report healthy
/// once and crash a second later. Requiring a contiguous run of successful
/// probes guards against declaring stability from a single racy observation;
/// any failure resets the run, so alternating true/false never passes.
///
/// Every probe, successful or not, consumes one attempt. When the budget
/// runs out the error carries a [`FailureReport`](crate::FailureReport) of
/// every distinct failure reason seen across the whole poll, not just the
/// final one.
///
/// Equivalent to [`poll_until_consistent_cancellable`] with a token that
/// never fires.
pub async fn poll_until_consistent<T, F, Fut>(policy: &PollPolicy, probe: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Outcome<T>>,
{
    poll_until_consistent_cancellable(policy, &CancellationToken::new(), probe).await
}

/// Cancellable variant of [`poll_until_consistent`].
///
/// The policy is validated before the first probe, so an impossible
/// configuration fails fast without any external I/O. The token is checked
/// before every probe and interrupts the inter-probe sleep.
pub async fn poll_until_consistent_cancellable<T, F, Fut>(
    policy: &PollPolicy,
    cancel: &CancellationToken,
    mut probe: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Outcome<T>>,
{
    policy.validate()?;

    let mut attempts = 0u32;
    let mut streak = 0u32;
    let mut failures = FailureLog::default();

    loop {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        attempts += 1;

        match probe().await {
            Outcome::Success(value) => {
                streak += 1;
                debug!(
                    "probe {}/{} succeeded ({}/{} consecutive)",
                    attempts, policy.max_attempts, streak, policy.required_consecutive_successes
                );
                if streak == policy.required_consecutive_successes {
                    return Ok(value);
                }
            }
            Outcome::Failure(failure) => {
                if streak > 0 {
                    debug!("probe failure broke a streak of {}", streak);
                }
                streak = 0;
                warn!(
                    "probe {}/{} failed: {}",
                    attempts, policy.max_attempts, failure.description
                );
                failures.record(&failure.description, &failure.output);
            }
        }

        if attempts == policy.max_attempts {
            warn!(
                "condition not satisfied after {} attempts ({} distinct failures)",
                attempts,
                failures.distinct_count()
            );
            return Err(Error::ConditionNeverSatisfied(failures.into_report(attempts)));
        }
        sleep_or_cancel(policy.interval, cancel).await?;
    }
}
