// -
// Subscription

/// Pattern subscribed on the store: every channel
pub const SUBSCRIBE_ALL_PATTERN: &str = "*";

/// Default wake interval of the background listener
pub(crate) const DEFAULT_POLL_INTERVAL_IN_MS: u64 = 100;

// -
// Liveness probe

pub(crate) const PING_REPLY: &str = "PONG";
