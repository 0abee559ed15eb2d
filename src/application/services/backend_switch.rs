//! Backend switch - `/check <name>` selects the active conversational backend

use std::collections::HashSet;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::application::errors::BotError;
use crate::domain::entities::{EventKind, InboundEvent, Message};
use crate::domain::traits::Transport;
use crate::infrastructure::chat::ChatProvider;

use super::registry::{Directive, ServiceState};

const USAGE: &str = "Invalid command. Usage: /check [MoLi | Turing]";

static CHECK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/check\s+(\w+)").unwrap());

pub struct BackendSwitch {
    state: ServiceState,
    admins: Arc<HashSet<i64>>,
}

impl BackendSwitch {
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
            tracing::debug!(sender = event.sender_id, "ignoring /check from non-admin");
            return Ok(None);
        }
        if self.state == ServiceState::Closed {
            transport
                .send_to_friend(event.sender_id, &Message::from_text(USAGE))
                .await?;
            return Ok(None);
        }

        let provider = CHECK_RE
            .captures(event.text.trim())
            .and_then(|caps| caps.get(1))
            .and_then(|m| ChatProvider::from_name(m.as_str()));

        let Some(provider) = provider else {
            transport
                .send_to_friend(event.sender_id, &Message::from_text(USAGE))
                .await?;
            return Ok(None);
        };

        transport
            .send_to_friend(
                event.sender_id,
                &Message::from_text(format!("Switched to {}", provider)),
            )
            .await?;
        Ok(Some(Directive::SwitchBackend(provider)))
    }
}
