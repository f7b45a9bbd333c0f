use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_POLL_INTERVAL_IN_MS;
use crate::Error;
use crate::Result;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ListenerConfig {
    /// How long the listener waits for a message before re-checking for a
    /// stop request (milliseconds)
    #[serde(default = "default_poll_interval")]
    pub poll_interval_in_ms: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            poll_interval_in_ms: default_poll_interval(),
        }
    }
}

impl ListenerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_in_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_in_ms == 0 {
            return Err(Error::InvalidConfig(
                "listener.poll_interval_in_ms must be greater than 0".into(),
            ));
        }

        // A stop request has to be observed well within a second
        if self.poll_interval_in_ms > 1000 {
            return Err(Error::InvalidConfig(format!(
                "listener.poll_interval_in_ms {} exceeds 1000",
                self.poll_interval_in_ms
            )));
        }

        Ok(())
    }
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_IN_MS
}
