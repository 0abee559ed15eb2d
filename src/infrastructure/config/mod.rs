//! Configuration management

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::application::errors::ConfigError;
use crate::infrastructure::chat::ChatConfig;

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub bot: BotConfig,
    /// Sender ids allowed to use admin commands
    #[serde(default)]
    pub admins: Vec<i64>,
    pub chat: ChatConfig,
    pub adapters: AdaptersConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BotConfig {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdaptersConfig {
    pub mirai: Option<MiraiConfig>,
    pub console: Option<ConsoleConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct MiraiConfig {
    pub base_url: String,
    pub verify_key: Option<String>,
    /// Account the API session is bound to
    pub qq: i64,
    /// Groups the relay listens in; empty list allows all
    #[serde(default)]
    pub groups: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConsoleConfig {
    pub enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                name: "relay-bot".to_string(),
            },
            admins: Vec::new(),
            chat: ChatConfig::default(),
            adapters: AdaptersConfig {
                mirai: None,
                console: Some(ConsoleConfig { enabled: true }),
            },
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    /// Check if a sender id is in the admin allow-list
    pub fn is_admin(&self, sender_id: i64) -> bool {
        self.admins.contains(&sender_id)
    }

    pub fn load_env() -> Self {
        // Load from environment variables
        let mut config = Config::default();
        config.chat = ChatConfig::from_env();

        if let Ok(admins) = std::env::var("ADMIN_QQ") {
            config.admins = admins
                .split(',')
                .filter_map(|id| id.trim().parse().ok())
                .collect();
        }

        if let Ok(base_url) = std::env::var("MIRAI_BASE_URL") {
            let qq = std::env::var("BOT_QQ")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);
            config.adapters.mirai = Some(MiraiConfig {
                base_url,
                verify_key: std::env::var("MIRAI_VERIFY_KEY").ok(),
                qq,
                groups: Vec::new(),
            });
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kebab_case_yaml() {
        let yaml = r#"
bot:
  name: relay-bot
admins:
  - 42
  - 77
chat:
  provider: Turing
  moli:
    api-key: mk
    api-secret: ms
    reply-to: roomA
  turing:
    api-key: tk
adapters:
  mirai:
    base-url: "http://localhost:8080"
    verify-key: secret
    qq: 123456
    groups:
      - 111
  console: null
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.bot.name, "relay-bot");
        assert!(config.is_admin(42));
        assert!(!config.is_admin(43));
        assert_eq!(
            config.chat.provider,
            crate::infrastructure::chat::ChatProvider::Turing
        );
        let mirai = config.adapters.mirai.unwrap();
        assert_eq!(mirai.qq, 123456);
        assert_eq!(mirai.groups, vec![111]);
    }

    #[test]
    fn default_round_trips_through_yaml() {
        let yaml = serde_yaml::to_string(&Config::default()).unwrap();
        let config: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config.bot.name, "relay-bot");
        assert!(config.admins.is_empty());
        assert!(config.adapters.mirai.is_none());
    }
}
