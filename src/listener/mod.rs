//! Cancellable background listener.
//!
//! A single task pulls messages from a [`NotificationSource`] and invokes the
//! registered callback for each one, serially. [`ListenerHandle::stop`]
//! cancels the task and waits until it has fully exited.


use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::error;
use tracing::trace;
use tracing::warn;

use crate::ConnectionError;
use crate::Error;
use crate::NotificationMessage;
use crate::NotificationSource;
use crate::Result;

/// Starts the listener task on the current tokio runtime.
pub fn spawn_listener<S, F>(
    source: S,
    poll_interval: Duration,
    callback: F,
) -> ListenerHandle
where
    S: NotificationSource,
    F: FnMut(NotificationMessage) -> Result<()> + Send + 'static,
{
    let cancel = CancellationToken::new();
    let task = tokio::spawn(listen(source, poll_interval, callback, cancel.clone()));
    ListenerHandle {
        cancel,
        task: Some(task),
    }
}

async fn listen<S, F>(
    mut source: S,
    poll_interval: Duration,
    mut callback: F,
    cancel: CancellationToken,
) -> Result<()>
where
    S: NotificationSource,
    F: FnMut(NotificationMessage) -> Result<()> + Send + 'static,
{
    let origin = source.origin();
    debug!(%origin, ?poll_interval, "listener started");

    loop {
        let polled = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(%origin, "listener stop requested");
                return Ok(());
            }
            polled = timeout(poll_interval, source.next_message()) => polled,
        };

        match polled {
            // Idle interval, go back and check for cancellation
            Err(_) => trace!(%origin, "no message within poll interval"),
            Ok(Ok(Some(message))) => {
                if let Err(e) = callback(message) {
                    if !e.is_broken_pipe() {
                        error!(%origin, "listener callback failed: {}", e);
                    }
                    return Err(e);
                }
            }
            Ok(Ok(None)) => {
                warn!(%origin, "notification stream closed");
                return Err(ConnectionError::Lost { address: origin }.into());
            }
            Ok(Err(e)) => {
                error!(%origin, "failed to receive notification: {}", e);
                return Err(e);
            }
        }
    }
}

/// Handle to a running listener.
pub struct ListenerHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<Result<()>>>,
}

impl ListenerHandle {
    /// Requests cancellation and waits for the listener task to exit.
    ///
    /// An in-flight callback runs to completion first. Returns the error the
    /// listener ended with if it stopped on its own and nobody waited on it;
    /// calling `stop` again returns `Ok(())` immediately.
    pub async fn stop(&mut self) -> Result<()> {
        self.cancel.cancel();
        self.wait().await
    }

    /// Waits until the listener exits, returning its outcome.
    ///
    /// Cancel-safe: dropping the future keeps the listener running and the
    /// handle usable. The outcome is reported once; later calls return `Ok(())`.
    pub async fn wait(&mut self) -> Result<()> {
        let Some(task) = self.task.as_mut() else {
            return Ok(());
        };

        let outcome = task.await;
        self.task = None;
        match outcome {
            Ok(result) => result,
            Err(join_error) => Err(Error::Fatal(format!("listener task failed: {}", join_error))),
        }
    }

    #[cfg(test)]
    pub(crate) fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |task| task.is_finished())
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
