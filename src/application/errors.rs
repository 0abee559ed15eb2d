//! Application layer errors

use thiserror::Error;

use crate::infrastructure::chat::UpstreamError;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Schedule error: {0}")]
    Schedule(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Command service errors.
///
/// Syntax, range and backend-name failures are recovered inside the
/// service as a usage reply; Unauthorized is swallowed without a reply so
/// admin commands are not confirmed to strangers.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("invalid command syntax: {0}")]
    InvalidSyntax(String),

    #[error("invalid time range: {0}")]
    InvalidRange(String),

    #[error("unknown backend: {0}")]
    InvalidBackend(String),

    #[error("sender is not an admin")]
    Unauthorized,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
