use thiserror::Error;

mod database;
mod logging;
mod server;

pub use database::{Database, DbPoolConfig};
pub use logging::{Logging, LoggingStyle};
pub use server::Server;

#[derive(Debug, Error)]
#[error("Failed to load configuration")]
pub struct ParseError;

/// A configuration value that parsed fine but makes no sense.
#[derive(Debug, Error)]
#[error("invalid value for {field}: {reason}")]
pub struct InvalidValue {
    pub field: &'static str,
    pub reason: &'static str,
}
