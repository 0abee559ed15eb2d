//! Chat providers

pub mod moli;
pub mod turing;

pub use moli::MoliProvider;
pub use turing::TuringProvider;

use std::sync::Arc;

use super::{ChatBackend, ChatConfig, ChatProvider};

/// Build a backend client for the selected provider.
///
/// Missing credentials are tolerated here; the first reply call will fail
/// with an upstream auth error instead.
pub fn create(provider: ChatProvider, config: &ChatConfig) -> Arc<dyn ChatBackend> {
    match provider {
        ChatProvider::MoLi => {
            if config.moli.api_key.is_none() {
                tracing::warn!("MoLi API key not set");
            }
            Arc::new(MoliProvider::new(
                config.moli.api_key.clone().unwrap_or_default(),
                config.moli.api_secret.clone().unwrap_or_default(),
                config
                    .moli
                    .reply_to
                    .clone()
                    .unwrap_or_else(|| "defaultGroup".to_string()),
            ))
        }
        ChatProvider::Turing => {
            if config.turing.api_key.is_none() {
                tracing::warn!("Turing API key not set");
            }
            Arc::new(TuringProvider::new(
                config.turing.api_key.clone().unwrap_or_default(),
            ))
        }
    }
}
