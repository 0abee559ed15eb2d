//! Console adapter for development/testing

use async_trait::async_trait;

use crate::application::errors::BotError;
use crate::domain::entities::{InboundEvent, Message};
use crate::domain::traits::Transport;

/// Console bot adapter for local development. Input lines become friend
/// messages from the configured admin; outbound messages print to stdout.
pub struct ConsoleAdapter {
    admin_id: i64,
}

impl ConsoleAdapter {
    pub fn new(admin_id: i64) -> Self {
        Self { admin_id }
    }

    /// Turn one input line into an event; a `g ` prefix simulates a group
    /// message so the relay path can be exercised locally
    pub fn parse_line(&self, line: &str) -> Option<InboundEvent> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        if let Some(rest) = line.strip_prefix("g ") {
            return Some(InboundEvent::group(self.admin_id, 0, rest));
        }
        Some(InboundEvent::friend(self.admin_id, line))
    }
}

#[async_trait]
impl Transport for ConsoleAdapter {
    async fn send_to_group(&self, group_id: i64, message: &Message) -> Result<(), BotError> {
        println!("[GROUP {}] {}", group_id, message);
        Ok(())
    }

    async fn send_to_friend(&self, user_id: i64, message: &Message) -> Result<(), BotError> {
        println!("[FRIEND {}] {}", user_id, message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::EventKind;

    #[test]
    fn plain_lines_become_friend_events() {
        let adapter = ConsoleAdapter::new(42);
        let event = adapter.parse_line("/setbot close").unwrap();
        assert_eq!(event.kind, EventKind::Friend);
        assert_eq!(event.sender_id, 42);
        assert_eq!(event.text, "/setbot close");
    }

    #[test]
    fn g_prefix_becomes_group_event() {
        let adapter = ConsoleAdapter::new(42);
        let event = adapter.parse_line("g hello bot").unwrap();
        assert_eq!(event.kind, EventKind::Group);
        assert_eq!(event.group_id, Some(0));
        assert_eq!(event.text, "hello bot");
    }

    #[test]
    fn blank_lines_are_ignored() {
        let adapter = ConsoleAdapter::new(42);
        assert!(adapter.parse_line("   ").is_none());
    }
}
