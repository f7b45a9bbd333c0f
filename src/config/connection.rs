use std::fmt::Debug;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Store endpoint, database selector and credentials
#[derive(Serialize, Deserialize, Clone)]
pub struct ConnectionConfig {
    /// Store host name or IP address
    #[serde(default = "default_host")]
    pub host: String,

    /// Store TCP port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logical database selected on the command connection
    #[serde(default)]
    pub db: i64,

    /// ACL user name (None for the default user)
    #[serde(default)]
    pub username: Option<String>,

    /// AUTH password (None to skip authentication)
    #[serde(default)]
    pub password: Option<String>,

    /// Upper bound on connection establishment in milliseconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_in_ms: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            db: 0,
            username: None,
            password: None,
            connect_timeout_in_ms: default_connect_timeout(),
        }
    }
}

impl Debug for ConnectionConfig {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("db", &self.db)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("connect_timeout_in_ms", &self.connect_timeout_in_ms)
            .finish()
    }
}

impl ConnectionConfig {
    /// `host:port`, used in diagnostics
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_in_ms)
    }

    /// Validates connection settings
    /// # Errors
    /// Returns `Error::InvalidConfig` when:
    /// - host is empty
    /// - port is 0
    /// - db is negative
    /// - connect timeout is 0
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::InvalidConfig("connection.host cannot be empty".into()));
        }

        if self.port == 0 {
            return Err(Error::InvalidConfig("connection.port cannot be 0".into()));
        }

        if self.db < 0 {
            return Err(Error::InvalidConfig(format!(
                "connection.db {} must be a non-negative database index",
                self.db
            )));
        }

        if self.connect_timeout_in_ms == 0 {
            return Err(Error::InvalidConfig(
                "connection.connect_timeout_in_ms must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    6379
}

fn default_connect_timeout() -> u64 {
    3000
}
