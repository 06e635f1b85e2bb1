//! Background repetition of a side-effecting action until stopped.
//!
//! Some tests need a sustained effect — steady request load against a
//! service, a heartbeat keeping a session alive — while the foreground polls
//! and asserts. `spawn_background` runs such an action on its own task;
//! outcomes are the action's own business (log inside it if needed), nothing
//! is propagated.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Handle to a repeating background action.
///
/// Dropping the handle cancels the action; [`stop`](Self::stop) additionally
/// waits for the in-flight run to finish.
pub struct BackgroundHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl BackgroundHandle {
    /// Cancel the action and wait for its task to wind down.
    pub async fn stop(mut self) {
        self.token.cancel();
        let _ = (&mut self.task).await;
    }
}

impl Drop for BackgroundHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Run `action` repeatedly on a background task, sleeping `interval` between
/// runs, until the returned handle is stopped or dropped.
pub fn spawn_background<F, Fut>(interval: Duration, mut action: F) -> BackgroundHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    let token = CancellationToken::new();
    let loop_token = token.clone();

    let task = tokio::spawn(async move {
        loop {
            if loop_token.is_cancelled() {
                break;
            }
            action().await;
            tokio::select! {
                _ = loop_token.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }
        }
        debug!("background action stopped");
    });

    BackgroundHandle { token, task }
}
