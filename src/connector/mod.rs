//! Store connection layer.
//!
//! [`RedisConnector`] opens and liveness-checks a connection; the returned
//! [`ConnectionHandle`] subscribes a channel pattern and hands every inbound
//! pub/sub message to a callback on a background listener.

mod message;
mod redis_connector;
mod redis_source;
pub use message::*;
pub use redis_connector::*;
pub use redis_source::*;


// Trait definition of the current module
// -----------------------------------------------------------------------------
// Transport seam between the store and the listener
//

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::Result;

/// Source of inbound pub/sub messages for one pattern subscription.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait NotificationSource: Send + 'static {
    /// Waits for the next inbound message.
    ///
    /// Returns `Ok(None)` once the transport has closed. Dropping the returned
    /// future before it resolves must not lose a message.
    async fn next_message(&mut self) -> Result<Option<NotificationMessage>>;

    /// Human-readable origin of the messages, used in diagnostics.
    fn origin(&self) -> String;
}
