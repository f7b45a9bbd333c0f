//! Watches a Redis server's keyspace notifications and reports every
//! observed operation as a `"<command> <key>"` line.
//!
//! Data flows from the [`ConnectionHandle`]'s background listener into an
//! [`EventPairer`], which pairs the command and key messages of each
//! operation. The [`ShutdownCoordinator`] turns termination signals into a
//! single shutdown that stops the listener.

mod app;
mod config;
mod connector;
mod errors;
mod listener;
mod pairing;
mod shutdown;
#[cfg(test)]
mod test_utils;

pub mod constants;

pub use app::*;
pub use config::*;
pub use connector::*;
pub use errors::*;
pub use listener::*;
pub use pairing::*;
pub use shutdown::*;
