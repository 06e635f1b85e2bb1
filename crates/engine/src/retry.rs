//! Retryable execution of fallible external actions.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::classify::classify;
use crate::error::{Error, Result};
use crate::outcome::Outcome;
use crate::policy::RetryPolicy;

/// Run `action` until it succeeds, fails fatally, or the retry budget runs
/// out. A single success ends the loop immediately — confirming stability
/// over several attempts is [`poll_until_consistent`]'s contract, not this
/// one's.
///
/// Equivalent to [`run_with_retries_cancellable`] with a token that never
/// fires.
///
/// [`poll_until_consistent`]: crate::poll_until_consistent
pub async fn run_with_retries<T, F, Fut>(policy: &RetryPolicy, action: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Outcome<T>>,
{
    run_with_retries_cancellable(policy, &CancellationToken::new(), action).await
}

/// Cancellable variant of [`run_with_retries`].
///
/// Each failure's output is matched against `policy.known_errors`: a match
/// means transient, sleep `policy.delay` and try again; no match means fatal,
/// stop at once regardless of remaining budget. The token is checked before
/// every attempt and interrupts the inter-attempt sleep.
pub async fn run_with_retries_cancellable<T, F, Fut>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    mut action: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Outcome<T>>,
{
    // max_retries counts re-attempts; the first attempt is always made.
    let budget = policy.max_retries.saturating_add(1);
    let mut attempt = 0u32;

    loop {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        attempt += 1;

        match action().await {
            Outcome::Success(value) => {
                debug!("action succeeded on attempt {}/{}", attempt, budget);
                return Ok(value);
            }
            Outcome::Failure(failure) => {
                let verdict = classify(&failure, &policy.known_errors);
                if !verdict.retryable {
                    debug!("attempt {} failed fatally: {}", attempt, verdict.reason);
                    return Err(Error::FatalAction(verdict.reason));
                }
                if attempt == budget {
                    warn!(
                        "retry budget exhausted after {} attempts; last failure: {}",
                        attempt, verdict.reason
                    );
                    return Err(Error::ExhaustedRetries {
                        attempts: attempt,
                        reason: verdict.reason,
                    });
                }
                warn!(
                    "attempt {}/{} hit a retryable error: {}; retrying in {:?}",
                    attempt, budget, verdict.reason, policy.delay
                );
                sleep_or_cancel(policy.delay, cancel).await?;
            }
        }
    }
}

/// Wall-clock cap around an engine call.
///
/// The attempt-count bounds in the policies are not time bounds; compose this
/// around [`run_with_retries`] or
/// [`poll_until_consistent`](crate::poll_until_consistent) when a test must
/// give up after a fixed duration no matter how many attempts fit in it.
pub async fn run_with_timeout<T, Fut>(limit: Duration, fut: Fut) -> Result<T>
where
    Fut: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout {
            seconds: limit.as_secs(),
        }),
    }
}

/// Sleep the full delay, or return `Cancelled` as soon as the token fires.
pub(crate) async fn sleep_or_cancel(delay: Duration, cancel: &CancellationToken) -> Result<()> {
    tokio::select! {
        _ = cancel.cancelled() => Err(Error::Cancelled),
        _ = tokio::time::sleep(delay) => Ok(()),
    }
}
