//! Run loop tying the connector, pairer and shutdown coordinator together.


use tracing::debug;
use tracing::info;

use crate::constants::SUBSCRIBE_ALL_PATTERN;
use crate::stdout_sink;
use crate::EventPairer;
use crate::RedisConnector;
use crate::Result;
use crate::ShutdownCoordinator;
use crate::WatchConfig;

/// How a watch session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A termination signal was received
    Signalled,
    /// Standard output was closed by its reader
    OutputClosed,
}

/// Connects, subscribes to every channel and prints keyspace events until a
/// termination signal arrives.
///
/// Connection failures are returned before any signal handler is installed.
/// A listener failure (lost connection) ends the session with that error.
pub async fn run(settings: WatchConfig) -> Result<Outcome> {
    let connection = RedisConnector::connect(&settings.connection).await?;

    let coordinator = ShutdownCoordinator::new(settings.debug);
    let signal_task = coordinator.install_signal_handlers()?;

    let mut pairer = EventPairer::new(stdout_sink());
    let mut listener = connection
        .subscribe_pattern(
            SUBSCRIBE_ALL_PATTERN,
            settings.listener.poll_interval(),
            move |message| pairer.handle(&message),
        )
        .await?;
    info!(address = connection.address(), "watching keyspace notifications");

    let ended = tokio::select! {
        _ = coordinator.wait() => None,
        result = listener.wait() => Some(result),
    };

    let outcome = match ended {
        None => {
            debug!("stopping listener");
            outcome_of(listener.stop().await)
        }
        Some(result) => outcome_of(result),
    };

    signal_task.abort();
    outcome
}

/// Maps how the listener ended to the session outcome.
///
/// A closed stdout is a clean end whether the failed write or SIGPIPE was
/// observed first; in the latter case `stop()` still reports the write error.
pub(crate) fn outcome_of(listener_result: Result<()>) -> Result<Outcome> {
    match listener_result {
        Ok(()) => Ok(Outcome::Signalled),
        Err(e) if e.is_broken_pipe() => {
            debug!("standard output closed");
            Ok(Outcome::OutputClosed)
        }
        Err(e) => Err(e),
    }
}
