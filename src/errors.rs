//! Keyspace Watcher Error Hierarchy
//!
//! Defines the error types for the watcher, categorized by the layer that
//! raises them: transport, configuration, notification decoding and output.

use std::str::Utf8Error;
use std::time::Duration;

use config::ConfigError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Store connection and pub/sub transport failures
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Configuration source loading or deserialization failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Configuration values rejected by validation
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Malformed notification payload
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Event sink write failures
    #[error("Failed to write event: {0}")]
    Output(#[from] std::io::Error),

    /// Signal handler registration failures
    #[error("Signal setup failed: {0}")]
    Signal(String),

    /// Unrecoverable failures requiring process termination
    #[error("Fatal error: {0}")]
    Fatal(String),
}

impl Error {
    /// Output failures caused by the reading side of stdout going away.
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, Error::Output(e) if e.kind() == std::io::ErrorKind::BrokenPipe)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// Refused connection, unknown host, auth or handshake failure
    #[error("Failed to connect to {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: redis::RedisError,
    },

    /// Connection establishment exceeded the configured timeout
    #[error("Connection to {address} timed out after {duration:?}")]
    Timeout { address: String, duration: Duration },

    /// Liveness probe failed on an established connection
    #[error("PING to {address} failed: {source}")]
    Ping {
        address: String,
        #[source]
        source: redis::RedisError,
    },

    /// Liveness probe answered with something other than PONG
    #[error("Unexpected PING reply from {address}: {reply}")]
    UnexpectedPingReply { address: String, reply: String },

    /// Pattern subscription rejected or the pub/sub connection failed
    #[error("Failed to subscribe to pattern {pattern:?}: {source}")]
    Subscribe {
        pattern: String,
        #[source]
        source: redis::RedisError,
    },

    /// Notification stream closed while listening
    #[error("Connection to {address} lost")]
    Lost { address: String },
}

/// Which half of a notification pair failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairPhase {
    Command,
    Key,
}

impl std::fmt::Display for PairPhase {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            PairPhase::Command => write!(f, "command"),
            PairPhase::Key => write!(f, "key"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Invalid UTF-8 in {phase} payload: {source}")]
    InvalidUtf8 {
        phase: PairPhase,
        #[source]
        source: Utf8Error,
    },
}
