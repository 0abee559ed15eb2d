//! Chat backend traits - unified conversational interface

use std::fmt;

use async_trait::async_trait;

use crate::domain::entities::Message;

/// Chat backend errors
#[derive(Debug)]
pub enum UpstreamError {
    /// Backend returned an empty or failed reply payload
    EmptyReply(String),
    /// API error from provider
    ApiError(String),
    /// Network error
    NetworkError(String),
    /// Parse error
    ParseError(String),
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamError::EmptyReply(msg) => write!(f, "empty reply: {}", msg),
            UpstreamError::ApiError(msg) => write!(f, "API error: {}", msg),
            UpstreamError::NetworkError(msg) => write!(f, "network error: {}", msg),
            UpstreamError::ParseError(msg) => write!(f, "parse error: {}", msg),
        }
    }
}

impl std::error::Error for UpstreamError {}

/// Result type for chat backend operations
pub type ChatResult<T> = Result<T, UpstreamError>;

/// Conversational backend - one outbound reply call per inbound text.
///
/// Implementations normalize their provider's response items into an
/// ordered message chain; no retries, a failed call fails the reply.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Provider name
    fn name(&self) -> &str;

    /// Ask the backend for a reply to `text` on behalf of sender `who`
    async fn chat(&self, text: &str, who: &str) -> ChatResult<Message>;
}
