use std::mem;

use tracing::debug;
use tracing::trace;
use tracing::warn;

use super::EventSink;
use super::KeyspaceEvent;
use super::PairingState;
use crate::DecodeError;
use crate::MessageKind;
use crate::NotificationMessage;
use crate::PairPhase;
use crate::Result;

/// Reduces the raw notification stream into (command, key) events.
///
/// Owned by the listener task, so state transitions need no locking.
pub struct EventPairer<S: EventSink> {
    state: PairingState,
    sink: S,
    emitted: u64,
    dropped: u64,
}

impl<S: EventSink> EventPairer<S> {
    pub fn new(sink: S) -> Self {
        Self {
            state: PairingState::AwaitingCommand,
            sink,
            emitted: 0,
            dropped: 0,
        }
    }

    /// Applies one message to the state machine and returns the event it
    /// completes, if any.
    ///
    /// Subscription confirmations never advance the state. A payload that is
    /// not valid UTF-8 resets to `AwaitingCommand` and is reported as
    /// [`DecodeError`]; any pending command is discarded with it.
    pub fn accept(
        &mut self,
        message: &NotificationMessage,
    ) -> std::result::Result<Option<KeyspaceEvent>, DecodeError> {
        if message.kind != MessageKind::Data {
            trace!(channel = %message.channel, "ignoring non-data message");
            return Ok(None);
        }

        match mem::take(&mut self.state) {
            PairingState::AwaitingCommand => {
                let command = decode(&message.payload, PairPhase::Command)?;
                self.state = PairingState::AwaitingKey(command.to_string());
                Ok(None)
            }
            PairingState::AwaitingKey(command) => {
                let key = decode(&message.payload, PairPhase::Key)?;
                Ok(Some(KeyspaceEvent::new(command, key)))
            }
        }
    }

    /// Applies one message and writes any completed event to the sink.
    ///
    /// Decode failures are recovered here; only sink failures propagate.
    pub fn handle(
        &mut self,
        message: &NotificationMessage,
    ) -> Result<()> {
        match self.accept(message) {
            Ok(Some(event)) => {
                self.sink.emit(&event)?;
                self.emitted += 1;
            }
            Ok(None) => {}
            Err(e) => {
                self.dropped += 1;
                warn!(channel = %message.channel, "dropping notification: {}", e);
            }
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> &PairingState {
        &self.state
    }

    /// Number of events written to the sink
    #[cfg(test)]
    pub(crate) fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Number of pairs dropped on decode failure
    #[cfg(test)]
    pub(crate) fn dropped(&self) -> u64 {
        self.dropped
    }

    #[cfg(test)]
    pub(crate) fn sink(&self) -> &S {
        &self.sink
    }
}

impl<S: EventSink> Drop for EventPairer<S> {
    fn drop(&mut self) {
        if let PairingState::AwaitingKey(command) = &self.state {
            debug!("discarding unpaired command {:?}", command);
        }
        debug!(emitted = self.emitted, dropped = self.dropped, "event pairer finished");
    }
}

fn decode(
    payload: &[u8],
    phase: PairPhase,
) -> std::result::Result<&str, DecodeError> {
    std::str::from_utf8(payload).map_err(|source| DecodeError::InvalidUtf8 { phase, source })
}
