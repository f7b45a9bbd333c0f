use async_trait::async_trait;
use tokio::signal::unix::signal;
use tokio::signal::unix::Signal;
use tokio::signal::unix::SignalKind;
use tokio::task::JoinHandle;
use tracing::debug;

use super::ShutdownCoordinator;
use crate::Error;
use crate::Result;

/// Termination signals that request shutdown. Every variant has the same
/// effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    Interrupt,
    Terminate,
    Quit,
    HangUp,
    BrokenPipe,
}

impl ShutdownSignal {
    pub const ALL: [ShutdownSignal; 5] = [
        ShutdownSignal::Interrupt,
        ShutdownSignal::Terminate,
        ShutdownSignal::Quit,
        ShutdownSignal::HangUp,
        ShutdownSignal::BrokenPipe,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ShutdownSignal::Interrupt => "SIGINT",
            ShutdownSignal::Terminate => "SIGTERM",
            ShutdownSignal::Quit => "SIGQUIT",
            ShutdownSignal::HangUp => "SIGHUP",
            ShutdownSignal::BrokenPipe => "SIGPIPE",
        }
    }

    pub fn kind(&self) -> SignalKind {
        match self {
            ShutdownSignal::Interrupt => SignalKind::interrupt(),
            ShutdownSignal::Terminate => SignalKind::terminate(),
            ShutdownSignal::Quit => SignalKind::quit(),
            ShutdownSignal::HangUp => SignalKind::hangup(),
            ShutdownSignal::BrokenPipe => SignalKind::pipe(),
        }
    }
}

impl ShutdownCoordinator {
    /// Registers handlers for every [`ShutdownSignal`] and spawns a task that
    /// forwards each delivery to [`ShutdownCoordinator::request_shutdown`].
    ///
    /// Registration replaces the default disposition for the process lifetime,
    /// so repeated signals are absorbed rather than killing the process. Abort
    /// the returned task once it is no longer needed.
    pub fn install_signal_handlers(&self) -> Result<JoinHandle<()>> {
        let mut streams: Vec<(ShutdownSignal, Signal)> = Vec::with_capacity(ShutdownSignal::ALL.len());
        for sig in ShutdownSignal::ALL {
            let stream =
                signal(sig.kind()).map_err(|e| Error::Signal(format!("failed to register {}: {}", sig.name(), e)))?;
            streams.push((sig, stream));
        }

        let coordinator = self.clone();
        Ok(tokio::spawn(async move {
            loop {
                let Some(received) = next_signal(&mut streams).await else {
                    debug!("signal streams closed");
                    return;
                };
                if !coordinator.request_shutdown(received) {
                    debug!("{} ignored, already shutting down", received.name());
                }
            }
        }))
    }
}

/// Delivery side of one registered signal.
#[async_trait]
pub(crate) trait SignalReceiver: Send {
    /// `None` once no more signals can be received.
    async fn recv(&mut self) -> Option<()>;
}

#[async_trait]
impl SignalReceiver for Signal {
    async fn recv(&mut self) -> Option<()> {
        Signal::recv(self).await
    }
}

/// Waits for the next delivery on any stream. Closed streams are dropped so
/// the remaining ones keep being watched; `None` only once all are closed.
pub(crate) async fn next_signal<R: SignalReceiver>(
    streams: &mut Vec<(ShutdownSignal, R)>
) -> Option<ShutdownSignal> {
    while !streams.is_empty() {
        let waits = streams.iter_mut().map(|(sig, stream)| {
            let sig = *sig;
            Box::pin(async move { stream.recv().await.map(|_| sig) })
        });
        let (received, index, pending) = futures::future::select_all(waits).await;
        drop(pending);

        match received {
            Some(sig) => return Some(sig),
            None => {
                let (closed, _) = streams.remove(index);
                debug!("{} stream closed", closed.name());
            }
        }
    }
    None
}
