//! Dispatch entrypoint - resolves one service per event, isolates failures

use crate::domain::entities::InboundEvent;
use crate::domain::traits::Transport;

use super::services::ServiceRegistry;

/// Routes inbound events to the first matching service.
///
/// Every handler invocation runs inside a fault boundary: errors are logged
/// and swallowed, so one failing command never stops the event loop.
pub struct Dispatcher {
    registry: ServiceRegistry,
}

impl Dispatcher {
    pub fn new(registry: ServiceRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ServiceRegistry {
        &mut self.registry
    }

    pub async fn dispatch<T: Transport>(&mut self, event: &InboundEvent, transport: &T) {
        let Some(index) = self.registry.resolve(&event.text) else {
            tracing::debug!(event_id = %event.id, "no service matched, ignoring");
            return;
        };

        let result = match self.registry.get_mut(index) {
            Some(service) => service.handle(event, transport).await,
            None => return,
        };

        match result {
            Ok(Some(directive)) => self.registry.apply(directive),
            Ok(None) => {}
            Err(e) => {
                tracing::error!(event_id = %event.id, error = %e, "service failed");
            }
        }
    }
}
