//! Chat backend configuration

use std::fmt;

use serde::{Deserialize, Serialize};

/// Chat backend selector. Exactly two providers exist; command arguments
/// are matched case-sensitively against the variant names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum ChatProvider {
    MoLi,
    Turing,
}

impl ChatProvider {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "MoLi" => Some(Self::MoLi),
            "Turing" => Some(Self::Turing),
            _ => None,
        }
    }
}

impl Default for ChatProvider {
    fn default() -> Self {
        Self::MoLi
    }
}

impl fmt::Display for ChatProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatProvider::MoLi => write!(f, "MoLi"),
            ChatProvider::Turing => write!(f, "Turing"),
        }
    }
}

/// Chat configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ChatConfig {
    /// Default provider
    pub provider: ChatProvider,
    pub moli: MoliConfig,
    pub turing: TuringConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct MoliConfig {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    /// Channel identifier sent as the `to` field of reply requests
    pub reply_to: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TuringConfig {
    pub api_key: Option<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            provider: ChatProvider::MoLi,
            moli: MoliConfig::default(),
            turing: TuringConfig::default(),
        }
    }
}

impl ChatConfig {
    /// Load credential overrides from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(key) = std::env::var("MOLI_API_KEY") {
            config.moli.api_key = Some(key);
        }
        if let Ok(secret) = std::env::var("MOLI_API_SECRET") {
            config.moli.api_secret = Some(secret);
        }
        if let Ok(key) = std::env::var("TURING_API_KEY") {
            config.turing.api_key = Some(key);
        }
        if let Ok(provider) = std::env::var("CHAT_PROVIDER") {
            if let Some(p) = ChatProvider::from_name(&provider) {
                config.provider = p;
            }
        }

        config
    }
}
