//! Behavior of the retry loop: attempt accounting, fatal short-circuiting,
//! cancellation, and wall-clock caps.
//!
//! All timing runs under tokio's paused clock, so multi-second policies
//! execute instantly and deterministically.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use stackprobe_engine::{
    run_with_retries, run_with_retries_cancellable, run_with_timeout, Error, Outcome, RetryPolicy,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn flaky_policy(max_retries: u32) -> RetryPolicy {
    RetryPolicy::new(max_retries, Duration::from_secs(5))
        .with_known_error("connection refused", "endpoint not accepting connections yet")
}

#[tokio::test(start_paused = true)]
async fn fatal_failure_stops_after_one_attempt() {
    init_tracing();
    let calls = Arc::new(AtomicU32::new(0));
    let action = {
        let calls = Arc::clone(&calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            std::future::ready(Outcome::<()>::failure(
                "terraform apply exited with status 1",
                "Error: permission denied on bucket",
            ))
        }
    };

    // A generous retry budget must not matter for an unclassified failure.
    let err = run_with_retries(&flaky_policy(10), action).await.unwrap_err();

    match err {
        Error::FatalAction(reason) => {
            assert_eq!(reason, "terraform apply exited with status 1");
        }
        other => panic!("expected FatalAction, got {other}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn retryable_failures_consume_the_full_budget() {
    init_tracing();
    let calls = Arc::new(AtomicU32::new(0));
    let action = {
        let calls = Arc::clone(&calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            std::future::ready(Outcome::<()>::failure(
                "apply failed",
                "dial tcp 10.0.0.1:443: connection refused",
            ))
        }
    };

    let err = run_with_retries(&flaky_policy(3), action).await.unwrap_err();

    match err {
        Error::ExhaustedRetries { attempts, reason } => {
            assert_eq!(attempts, 4);
            assert_eq!(reason, "endpoint not accepting connections yet");
        }
        other => panic!("expected ExhaustedRetries, got {other}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[tokio::test(start_paused = true)]
async fn eventual_success_stops_retrying() {
    let calls = Arc::new(AtomicU32::new(0));
    let action = {
        let calls = Arc::clone(&calls);
        move || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            std::future::ready(if n <= 2 {
                Outcome::failure("apply failed", "connection refused")
            } else {
                Outcome::success(n)
            })
        }
    };

    let value = run_with_retries(&flaky_policy(5), action).await.unwrap();

    assert_eq!(value, 3);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn zero_retries_means_exactly_one_attempt() {
    let calls = Arc::new(AtomicU32::new(0));
    let action = {
        let calls = Arc::clone(&calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            std::future::ready(Outcome::<()>::failure("apply failed", "connection refused"))
        }
    };

    let err = run_with_retries(&flaky_policy(0), action).await.unwrap_err();

    assert!(matches!(err, Error::ExhaustedRetries { attempts: 1, .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn success_on_first_attempt_returns_immediately() {
    let value = run_with_retries(&flaky_policy(5), || {
        std::future::ready(Outcome::success("apply complete"))
    })
    .await
    .unwrap();

    assert_eq!(value, "apply complete");
}

#[tokio::test(start_paused = true)]
async fn cancellation_interrupts_the_inter_attempt_sleep() {
    init_tracing();
    let calls = Arc::new(AtomicU32::new(0));
    let cancel = CancellationToken::new();

    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        canceller.cancel();
    });

    // Delay far longer than the cancellation point; the sleep must not be
    // waited out.
    let policy = RetryPolicy::new(5, Duration::from_secs(300))
        .with_known_error("connection refused", "endpoint down");
    let action = {
        let calls = Arc::clone(&calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            std::future::ready(Outcome::<()>::failure("apply failed", "connection refused"))
        }
    };

    let err = run_with_retries_cancellable(&policy, &cancel, action)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Cancelled));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn pre_cancelled_token_skips_the_first_attempt() {
    let cancel = CancellationToken::new();
    cancel.cancel();

    let calls = Arc::new(AtomicU32::new(0));
    let action = {
        let calls = Arc::clone(&calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            std::future::ready(Outcome::success(()))
        }
    };

    let err = run_with_retries_cancellable(&flaky_policy(3), &cancel, action)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Cancelled));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn timeout_caps_a_long_retry_loop() {
    // Attempt-count bounds are not time bounds; the wall-clock cap wins here.
    let policy = RetryPolicy::new(1000, Duration::from_secs(7))
        .with_known_error("connection refused", "endpoint down");
    let action = || std::future::ready(Outcome::<()>::failure("apply failed", "connection refused"));

    let err = run_with_timeout(Duration::from_secs(30), run_with_retries(&policy, action))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Timeout { seconds: 30 }));
}
