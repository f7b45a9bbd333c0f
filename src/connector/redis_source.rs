use std::time::Duration;

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use redis::Client;
use redis::Msg;
use tokio::time::timeout;
use tracing::debug;

use super::NotificationMessage;
use super::NotificationSource;
use crate::ConnectionError;
use crate::Result;

/// Pattern subscription on a dedicated pub/sub connection.
///
/// The client library consumes the PSUBSCRIBE acknowledgement while
/// subscribing, so the source replays it as the first message.
pub struct RedisNotificationSource {
    address: String,
    pending_confirmation: Option<String>,
    messages: BoxStream<'static, Msg>,
}

impl RedisNotificationSource {
    pub(crate) async fn subscribe(
        client: &Client,
        address: &str,
        pattern: &str,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let subscribe_error = |source| ConnectionError::Subscribe {
            pattern: pattern.to_string(),
            source,
        };

        let mut pubsub = timeout(connect_timeout, client.get_async_pubsub())
            .await
            .map_err(|_| ConnectionError::Timeout {
                address: address.to_string(),
                duration: connect_timeout,
            })?
            .map_err(subscribe_error)?;
        pubsub.psubscribe(pattern).await.map_err(subscribe_error)?;

        debug!(%address, %pattern, "pattern subscription confirmed");
        Ok(Self {
            address: address.to_string(),
            pending_confirmation: Some(pattern.to_string()),
            messages: pubsub.into_on_message().boxed(),
        })
    }
}

#[async_trait]
impl NotificationSource for RedisNotificationSource {
    async fn next_message(&mut self) -> Result<Option<NotificationMessage>> {
        if let Some(pattern) = self.pending_confirmation.take() {
            return Ok(Some(NotificationMessage::subscription(pattern)));
        }

        Ok(self
            .messages
            .next()
            .await
            .map(|msg| NotificationMessage::data(msg.get_channel_name(), msg.get_payload_bytes())))
    }

    fn origin(&self) -> String {
        self.address.clone()
    }
}
