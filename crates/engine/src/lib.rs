//! Stackprobe Engine
//!
//! Shared resilience machinery for infrastructure test suites that drive
//! external tools (terraform, kubectl, packer, cloud APIs) and assert on
//! eventually-consistent state:
//!
//! - [`run_with_retries`] runs an external action and decides, from its
//!   failure output, whether the failure is a known transient flake worth
//!   retrying or a fatal error worth reporting immediately.
//! - [`poll_until_consistent`] probes a condition (pod readiness, secret
//!   existence, resource counts) on a fixed interval until it holds for a
//!   required number of *consecutive* attempts, accumulating every distinct
//!   failure reason seen into one readable report.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │           caller (tool wrapper / test case)                 │
//! │   builds RetryPolicy / PollPolicy, supplies a closure       │
//! │   that performs the actual external interaction             │
//! └──────────────┬───────────────────────────┬──────────────────┘
//!                │                           │
//!       run_with_retries           poll_until_consistent
//!                │                           │
//!         classify() ◄── known_errors   FailureLog
//!                │                           │
//!     FatalAction / ExhaustedRetries   ConditionNeverSatisfied
//!                                      (FailureReport)
//! ```
//!
//! Every invocation is call-scoped: policies are borrowed for one call, poll
//! state lives only inside that call, and nothing is shared across concurrent
//! invocations. Both loops honor an optional
//! [`CancellationToken`](tokio_util::sync::CancellationToken), checked before
//! each attempt and during the inter-attempt sleep.

pub mod background;
pub mod classify;
pub mod error;
pub mod outcome;
pub mod policy;
pub mod poll;
pub mod report;
pub mod retry;

// Re-export the engine surface
pub use background::{spawn_background, BackgroundHandle};
pub use classify::{classify, Classification};
pub use error::{Error, Result};
pub use outcome::{FailureDetail, Outcome};
pub use policy::{default_transient_errors, PollPolicy, RetryPolicy};
pub use poll::{poll_until_consistent, poll_until_consistent_cancellable};
pub use report::FailureReport;
pub use retry::{run_with_retries, run_with_retries_cancellable, run_with_timeout};

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
