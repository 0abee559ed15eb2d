//! Service registry - ordered first-match-wins prefix lookup

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::errors::BotError;
use crate::domain::entities::InboundEvent;
use crate::domain::traits::Transport;
use crate::infrastructure::chat::{ChatConfig, ChatProvider};
use crate::infrastructure::scheduler::{ScheduleSignal, Scheduler};

use super::{BackendSwitch, ConversationRelay, GlobalSwitch, ScheduledSwitch};

/// Enabled/disabled flag carried by every service record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ServiceState {
    #[default]
    Open,
    Closed,
}

/// A cross-service mutation requested by a handler.
///
/// Handlers cannot reach into their siblings while one of them is borrowed
/// for dispatch, so they return a directive and the registry applies it
/// after the handler has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    OpenAll,
    CloseAll,
    SwitchBackend(ChatProvider),
}

/// A registered command service
pub enum Service {
    Relay(ConversationRelay),
    BackendSwitch(BackendSwitch),
    GlobalSwitch(GlobalSwitch),
    ScheduledSwitch(ScheduledSwitch),
}

impl Service {
    /// Prefixes this service answers to; the empty string matches everything
    pub fn prefixes(&self) -> &'static [&'static str] {
        match self {
            Service::Relay(_) => &[""],
            Service::BackendSwitch(_) => &["/check"],
            Service::GlobalSwitch(_) => &["/setbot"],
            Service::ScheduledSwitch(_) => &["/setopen"],
        }
    }

    pub fn open(&mut self) {
        match self {
            Service::Relay(s) => s.open(),
            Service::BackendSwitch(s) => s.open(),
            Service::GlobalSwitch(s) => s.open(),
            Service::ScheduledSwitch(s) => s.open(),
        }
    }

    pub fn close(&mut self) {
        match self {
            Service::Relay(s) => s.close(),
            Service::BackendSwitch(s) => s.close(),
            Service::GlobalSwitch(s) => s.close(),
            Service::ScheduledSwitch(s) => s.close(),
        }
    }

    pub async fn handle<T: Transport>(
        &mut self,
        event: &InboundEvent,
        transport: &T,
    ) -> Result<Option<Directive>, BotError> {
        match self {
            Service::Relay(s) => s.handle(event, transport).await,
            Service::BackendSwitch(s) => s.handle(event, transport).await,
            Service::GlobalSwitch(s) => s.handle(event, transport).await,
            Service::ScheduledSwitch(s) => s.handle(event, transport).await,
        }
    }
}

/// Ordered list of command services.
///
/// Resolution is first-registered-prefix-wins, so services with more
/// specific prefixes must be registered before the catch-all relay.
/// Assembled once at startup; one long-lived instance per service variant.
pub struct ServiceRegistry {
    services: Vec<Service>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self {
            services: Vec::new(),
        }
    }

    /// Assemble the standard service set in match order
    pub fn standard(
        admins: &[i64],
        chat: &ChatConfig,
        schedule_tx: mpsc::Sender<ScheduleSignal>,
    ) -> Self {
        let admins: Arc<HashSet<i64>> = Arc::new(admins.iter().copied().collect());

        let mut registry = Self::new();
        registry.register(Service::BackendSwitch(BackendSwitch::new(admins.clone())));
        registry.register(Service::ScheduledSwitch(ScheduledSwitch::new(
            admins.clone(),
            Scheduler::new(schedule_tx),
        )));
        registry.register(Service::GlobalSwitch(GlobalSwitch::new(admins)));
        registry.register(Service::Relay(ConversationRelay::new(chat)));
        registry
    }

    pub fn register(&mut self, service: Service) {
        self.services.push(service);
    }

    /// Index of the first service whose prefix list matches `text`
    pub fn resolve(&self, text: &str) -> Option<usize> {
        self.services.iter().position(|service| {
            service
                .prefixes()
                .iter()
                .any(|prefix| text.starts_with(prefix))
        })
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Service> {
        self.services.get_mut(index)
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn open_all(&mut self) {
        for service in &mut self.services {
            service.open();
        }
    }

    pub fn close_all(&mut self) {
        for service in &mut self.services {
            service.close();
        }
    }

    pub fn switch_backend(&mut self, provider: ChatProvider) {
        for service in &mut self.services {
            if let Service::Relay(relay) = service {
                relay.switch_backend(provider);
            }
        }
    }

    pub fn apply(&mut self, directive: Directive) {
        match directive {
            Directive::OpenAll => self.open_all(),
            Directive::CloseAll => self.close_all(),
            Directive::SwitchBackend(provider) => self.switch_backend(provider),
        }
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::chat::ChatConfig;

    fn standard_registry() -> ServiceRegistry {
        let (tx, _rx) = mpsc::channel(1);
        ServiceRegistry::standard(&[42], &ChatConfig::default(), tx)
    }

    #[test]
    fn resolves_specific_prefix_before_catch_all() {
        let registry = standard_registry();

        let idx = registry.resolve("/check Turing").unwrap();
        assert!(matches!(
            registry.services()[idx],
            Service::BackendSwitch(_)
        ));

        let idx = registry.resolve("/setopen 9:00-18:00").unwrap();
        assert!(matches!(
            registry.services()[idx],
            Service::ScheduledSwitch(_)
        ));

        let idx = registry.resolve("/setbot close").unwrap();
        assert!(matches!(registry.services()[idx], Service::GlobalSwitch(_)));
    }

    #[test]
    fn catch_all_matches_everything_else() {
        let registry = standard_registry();
        let idx = registry.resolve("hello there").unwrap();
        assert!(matches!(registry.services()[idx], Service::Relay(_)));

        // unknown slash commands still land in the relay
        let idx = registry.resolve("/unknown").unwrap();
        assert!(matches!(registry.services()[idx], Service::Relay(_)));
    }

    #[test]
    fn resolve_returns_none_without_matching_prefix() {
        let (tx, _rx) = mpsc::channel(1);
        let admins: Arc<HashSet<i64>> = Arc::new([42].into_iter().collect());
        let mut registry = ServiceRegistry::new();
        registry.register(Service::GlobalSwitch(GlobalSwitch::new(admins.clone())));
        registry.register(Service::ScheduledSwitch(ScheduledSwitch::new(
            admins,
            Scheduler::new(tx),
        )));

        assert!(registry.resolve("/check Turing").is_none());
        assert!(registry.resolve("hello").is_none());
    }

    #[test]
    fn close_all_flips_every_service() {
        let mut registry = standard_registry();
        registry.close_all();
        for service in registry.services() {
            let state = match service {
                Service::Relay(s) => s.state(),
                Service::BackendSwitch(s) => s.state(),
                Service::GlobalSwitch(s) => s.state(),
                Service::ScheduledSwitch(s) => s.state(),
            };
            assert_eq!(state, ServiceState::Closed);
        }
    }
}
