use async_trait::async_trait;

use crate::application::errors::BotError;
use crate::domain::entities::Message;

/// Transport trait - abstraction for the messaging platform adapter.
///
/// Carries the reply capability of an inbound event: services never talk to
/// the platform directly, they send through whichever adapter delivered the
/// event.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a message into a group conversation
    async fn send_to_group(&self, group_id: i64, message: &Message) -> Result<(), BotError>;

    /// Send a message to a friend's private conversation
    async fn send_to_friend(&self, user_id: i64, message: &Message) -> Result<(), BotError>;
}
