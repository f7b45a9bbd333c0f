//! Configuration management for the keyspace watcher.
//!
//! Sources are merged with priority (later wins):
//! 1. Default values (hardcoded)
//! 2. Config file from `REDISWATCH_CONFIG` (if set)
//! 3. Override file passed on the command line
//! 4. Environment variables with the `REDISWATCH__` prefix
//! 5. Command line positional arguments
//!

mod connection;
mod listener;
pub use connection::*;
pub use listener::*;


//---
use std::env;
use std::fmt::Debug;

use config::Config;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::Result;

/// Environment variable naming an optional TOML config file
pub const CONFIG_PATH_ENV: &str = "REDISWATCH_CONFIG";

/// Prefix for per-field environment overrides, e.g. `REDISWATCH__CONNECTION__PORT`
pub const ENV_PREFIX: &str = "REDISWATCH";

#[derive(Serialize, Deserialize, Clone, Default)]
pub struct WatchConfig {
    /// Store endpoint and credentials
    #[serde(default)]
    pub connection: ConnectionConfig,

    /// Background listener tuning
    #[serde(default)]
    pub listener: ListenerConfig,

    /// Enables shutdown diagnostics on stderr and debug level logging
    #[serde(default)]
    pub debug: bool,
}

impl Debug for WatchConfig {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("WatchConfig")
            .field("connection", &self.connection)
            .field("listener", &self.listener)
            .field("debug", &self.debug)
            .finish()
    }
}

impl WatchConfig {
    /// Loads configuration from defaults, `REDISWATCH_CONFIG` and
    /// `REDISWATCH__*` environment variables.
    ///
    /// # Note
    /// Validation is deferred so command line overrides can still be applied.
    /// Callers MUST call `validate()` before using the configuration.
    pub fn new() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Ok(config_path) = env::var(CONFIG_PATH_ENV) {
            builder = builder.add_source(File::with_name(&config_path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .ignore_empty(true)
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Merges an additional config file on top of the current values.
    /// Environment variables are re-applied so they keep the highest priority.
    pub fn with_override_config(
        &self,
        path: &str,
    ) -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(Config::try_from(self)?)
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Applies the endpoint given on the command line.
    ///
    /// `db` is only overridden when present so a configured database survives
    /// an invocation without the optional argument.
    pub fn with_endpoint(
        mut self,
        host: String,
        port: u16,
        db: Option<i64>,
    ) -> Self {
        self.connection.host = host;
        self.connection.port = port;
        if let Some(db) = db {
            self.connection.db = db;
        }
        self
    }

    /// Validates all sections and returns the validated instance.
    pub fn validate(self) -> Result<Self> {
        self.connection.validate()?;
        self.listener.validate()?;
        Ok(self)
    }
}
