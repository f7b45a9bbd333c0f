//! Notification pairing.
//!
//! With keyspace and keyevent notifications enabled, every write observed
//! through the `*` pattern arrives as two consecutive data messages: the
//! command name, then the affected key. [`EventPairer`] reduces that stream
//! into [`KeyspaceEvent`]s, holding at most one pending command.

mod event_pairer;
mod sink;
pub use event_pairer::*;
pub use sink::*;


use std::fmt;

/// One completed keyspace operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyspaceEvent {
    pub command: String,
    pub key: String,
}

impl KeyspaceEvent {
    pub fn new(
        command: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            command: command.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for KeyspaceEvent {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{} {}", self.command, self.key)
    }
}

/// Position in the two-message protocol.
///
/// The pending command only exists while a key is awaited.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PairingState {
    #[default]
    AwaitingCommand,
    AwaitingKey(String),
}
