//! Global switch - `/setbot open|close` flips every registered service

use std::collections::HashSet;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::application::errors::BotError;
use crate::domain::entities::{EventKind, InboundEvent, Message};
use crate::domain::traits::Transport;

use super::registry::{Directive, ServiceState};

const USAGE: &str = "Invalid command. Usage: /setbot [open | close]";

static SETBOT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/setbot\s+(\w+)").unwrap());

pub struct GlobalSwitch {
    state: ServiceState,
    admins: Arc<HashSet<i64>>,
}

impl GlobalSwitch {
    pub fn new(admins: Arc<HashSet<i64>>) -> Self {
        Self {
            state: ServiceState::Open,
            admins,
        }
    }

    pub fn state(&self) -> ServiceState {
        self.state
    }

    pub fn open(&mut self) {
        self.state = ServiceState::Open;
    }

    pub fn close(&mut self) {
        self.state = ServiceState::Closed;
    }

    pub async fn handle<T: Transport>(
        &mut self,
        event: &InboundEvent,
        transport: &T,
    ) -> Result<Option<Directive>, BotError> {
        if event.kind != EventKind::Friend {
            return Ok(None);
        }
        if !self.admins.contains(&event.sender_id) {
            // unauthorized senders get no reply at all
            tracing::debug!(sender = event.sender_id, "ignoring /setbot from non-admin");
            return Ok(None);
        }

        let argument = SETBOT_RE
            .captures(event.text.trim())
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str());

        let (directive, confirmation) = match argument {
            Some("open") => (Directive::OpenAll, "Bot is now open."),
            Some("close") => (Directive::CloseAll, "Bot is now closed."),
            _ => {
                transport
                    .send_to_friend(event.sender_id, &Message::from_text(USAGE))
                    .await?;
                return Ok(None);
            }
        };

        transport
            .send_to_friend(event.sender_id, &Message::from_text(confirmation))
            .await?;
        Ok(Some(directive))
    }
}
