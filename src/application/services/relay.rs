//! Conversational relay - forwards group chatter to the active backend

use std::sync::Arc;

use crate::application::errors::BotError;
use crate::domain::entities::InboundEvent;
use crate::domain::traits::Transport;
use crate::infrastructure::chat::{providers, ChatBackend, ChatConfig, ChatProvider};

use super::registry::{Directive, ServiceState};

/// Relays group messages to the active conversational backend and sends the
/// assembled reply back into the originating group. Public, no admin check.
pub struct ConversationRelay {
    state: ServiceState,
    active: ChatProvider,
    client: Arc<dyn ChatBackend>,
    config: ChatConfig,
}

impl ConversationRelay {
    pub fn new(config: &ChatConfig) -> Self {
        Self {
            state: ServiceState::Open,
            active: config.provider,
            client: providers::create(config.provider, config),
            config: config.clone(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_client(config: &ChatConfig, client: Arc<dyn ChatBackend>) -> Self {
        Self {
            state: ServiceState::Open,
            active: config.provider,
            client,
            config: config.clone(),
        }
    }

    pub fn state(&self) -> ServiceState {
        self.state
    }

    pub fn active_backend(&self) -> ChatProvider {
        self.active
    }

    pub fn open(&mut self) {
        self.state = ServiceState::Open;
    }

    pub fn close(&mut self) {
        self.state = ServiceState::Closed;
    }

    /// Swap the active backend; a fresh client is built from configuration
    pub fn switch_backend(&mut self, provider: ChatProvider) {
        self.active = provider;
        self.client = providers::create(provider, &self.config);
        tracing::info!(backend = %provider, "switched conversational backend");
    }

    pub async fn handle<T: Transport>(
        &mut self,
        event: &InboundEvent,
        transport: &T,
    ) -> Result<Option<Directive>, BotError> {
        if !event.is_group() {
            return Ok(None);
        }
        if self.state == ServiceState::Closed {
            tracing::debug!(event_id = %event.id, "relay closed, ignoring group message");
            return Ok(None);
        }
        let Some(group_id) = event.group_id else {
            return Ok(None);
        };

        let reply = self
            .client
            .chat(&event.text, &event.sender_id.to_string())
            .await?;
        transport.send_to_group(group_id, &reply).await?;
        Ok(None)
    }
}
