//! Shutdown coordination.
//!
//! Termination signals are folded into one process-wide transition from
//! running to shutting down. The main task waits on that transition instead
//! of spinning.

mod signals;
pub use signals::*;

#[cfg(test)]
mod shutdown_test;

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

/// Process-wide running/stopped flag.
///
/// Cloning yields another handle to the same flag. The flag starts out
/// running and flips to shutting down at most once.
#[derive(Debug, Clone)]
pub struct ShutdownCoordinator {
    flag: Arc<watch::Sender<bool>>,
    debug: bool,
}

impl ShutdownCoordinator {
    /// `debug` enables the `SHUTDOWN: <signal> <flag>` line on stderr.
    pub fn new(debug: bool) -> Self {
        let (flag, _) = watch::channel(false);
        Self {
            flag: Arc::new(flag),
            debug,
        }
    }

    /// Moves to shutting down. Returns `true` only for the call that made the
    /// transition; later requests are absorbed.
    pub fn request_shutdown(
        &self,
        signal: ShutdownSignal,
    ) -> bool {
        let transitioned = self.flag.send_if_modified(|stopped| {
            if *stopped {
                false
            } else {
                *stopped = true;
                true
            }
        });

        if transitioned {
            info!("{} received, shutting down", signal.name());
            if self.debug {
                eprintln!("SHUTDOWN: {} {}", signal.name(), u8::from(self.is_shutting_down()));
            }
        }
        transitioned
    }

    pub fn is_shutting_down(&self) -> bool {
        *self.flag.borrow()
    }

    /// Resolves once shutdown has been requested (immediately if it already
    /// was).
    pub async fn wait(&self) {
        let mut rx = self.flag.subscribe();
        // The sender lives in self, so the channel cannot close while waiting
        let _ = rx.wait_for(|stopped| *stopped).await;
    }
}
