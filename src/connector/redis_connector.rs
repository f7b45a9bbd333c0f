use std::time::Duration;

use redis::aio::MultiplexedConnection;
use redis::Client;
use redis::ConnectionAddr;
use redis::ConnectionInfo;
use redis::RedisConnectionInfo;
use tokio::time::timeout;
use tracing::debug;
use tracing::info;

use super::NotificationMessage;
use super::RedisNotificationSource;
use crate::constants::PING_REPLY;
use crate::spawn_listener;
use crate::ConnectionConfig;
use crate::ConnectionError;
use crate::ListenerHandle;
use crate::Result;

/// Opens verified connections to the store.
pub struct RedisConnector;

impl RedisConnector {
    /// Connects to the configured store and issues a liveness probe.
    ///
    /// Any failure (refused or unreachable endpoint, authentication,
    /// protocol mismatch, timeout, unexpected PING reply) is returned as
    /// [`ConnectionError`]. Nothing is retried.
    pub async fn connect(config: &ConnectionConfig) -> Result<ConnectionHandle> {
        let address = config.address();
        let connect_timeout = config.connect_timeout();

        let client = Client::open(connection_info(config)).map_err(|source| ConnectionError::Connect {
            address: address.clone(),
            source,
        })?;

        let connection = timeout(connect_timeout, client.get_multiplexed_async_connection())
            .await
            .map_err(|_| ConnectionError::Timeout {
                address: address.clone(),
                duration: connect_timeout,
            })?
            .map_err(|source| {
                debug!("connect to {} failed: {}", address, source);
                ConnectionError::Connect {
                    address: address.clone(),
                    source,
                }
            })?;

        let mut handle = ConnectionHandle {
            client,
            connection,
            address,
            connect_timeout,
        };
        handle.ping().await?;

        info!(address = %handle.address, db = config.db, "connected");
        Ok(handle)
    }
}

/// Live, verified connection to the store.
pub struct ConnectionHandle {
    client: Client,
    connection: MultiplexedConnection,
    address: String,
    connect_timeout: Duration,
}

impl ConnectionHandle {
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Sends PING and requires PONG in return.
    pub async fn ping(&mut self) -> Result<()> {
        let reply: String = timeout(self.connect_timeout, redis::cmd("PING").query_async(&mut self.connection))
            .await
            .map_err(|_| ConnectionError::Timeout {
                address: self.address.clone(),
                duration: self.connect_timeout,
            })?
            .map_err(|source| ConnectionError::Ping {
                address: self.address.clone(),
                source,
            })?;

        if reply != PING_REPLY {
            return Err(ConnectionError::UnexpectedPingReply {
                address: self.address.clone(),
                reply,
            }
            .into());
        }
        Ok(())
    }

    /// Subscribes `pattern` on a dedicated pub/sub connection and starts a
    /// background listener invoking `callback` once per inbound message.
    ///
    /// `callback` runs serially on the listener task. The listener wakes at
    /// least every `poll_interval` to observe a stop request.
    pub async fn subscribe_pattern<F>(
        &self,
        pattern: &str,
        poll_interval: Duration,
        callback: F,
    ) -> Result<ListenerHandle>
    where
        F: FnMut(NotificationMessage) -> Result<()> + Send + 'static,
    {
        let source =
            RedisNotificationSource::subscribe(&self.client, &self.address, pattern, self.connect_timeout).await?;
        Ok(spawn_listener(source, poll_interval, callback))
    }
}

pub(crate) fn connection_info(config: &ConnectionConfig) -> ConnectionInfo {
    ConnectionInfo {
        addr: ConnectionAddr::Tcp(config.host.clone(), config.port),
        redis: RedisConnectionInfo {
            db: config.db,
            username: config.username.clone(),
            password: config.password.clone(),
            ..Default::default()
        },
    }
}
