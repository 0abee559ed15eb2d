//! Mirai adapter - speaks the mirai-api-http polling protocol

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::errors::BotError;
use crate::domain::entities::{InboundEvent, Message, Part};
use crate::domain::traits::Transport;

/// Incoming message event as mirai-api-http reports it
#[derive(Debug, Clone, Deserialize)]
pub struct WireEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub sender: Option<WireSender>,
    #[serde(rename = "messageChain", default)]
    pub message_chain: Vec<WireChainItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireSender {
    pub id: i64,
    pub group: Option<WireGroup>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireGroup {
    pub id: i64,
}

/// Incoming chain segment; only `Plain` text is extracted, other segment
/// kinds (Source, At, Face, ...) are skipped
#[derive(Debug, Clone, Deserialize)]
pub struct WireChainItem {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: Option<String>,
}

/// Outgoing message chain segment
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum ChainItem {
    Plain { text: String },
    Image { url: String },
    Voice { url: String },
}

/// Mirai bot adapter
pub struct MiraiAdapter {
    base_url: String,
    verify_key: Option<String>,
    qq: i64,
    groups: Vec<i64>,
    session_key: Option<String>,
    client: Client,
}

impl MiraiAdapter {
    pub fn new(
        base_url: impl Into<String>,
        verify_key: Option<String>,
        qq: i64,
        groups: Vec<i64>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            verify_key,
            qq,
            groups,
            session_key: None,
            client: Client::new(),
        }
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), method)
    }

    fn session(&self) -> Result<&str, BotError> {
        self.session_key
            .as_deref()
            .ok_or_else(|| BotError::Internal("mirai session not established".to_string()))
    }

    /// Check if a group passes the configured allow-list
    fn is_group_allowed(&self, group_id: i64) -> bool {
        self.groups.is_empty() || self.groups.contains(&group_id)
    }

    /// Open and bind an API session
    pub async fn connect(&mut self) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct VerifyRequest<'a> {
            #[serde(rename = "verifyKey")]
            verify_key: &'a str,
        }

        #[derive(Deserialize)]
        struct VerifyResponse {
            code: i32,
            session: Option<String>,
            msg: Option<String>,
        }

        let verify_key = self
            .verify_key
            .as_deref()
            .ok_or_else(|| BotError::Config("mirai verify-key is required".to_string()))?;

        let response = self
            .client
            .post(self.api_url("verify"))
            .json(&VerifyRequest { verify_key })
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let data: VerifyResponse = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        if data.code != 0 {
            return Err(BotError::Network(format!(
                "mirai verify failed: code {}, {}",
                data.code,
                data.msg.unwrap_or_default()
            )));
        }
        let session = data
            .session
            .ok_or_else(|| BotError::Parse("verify response missing session".to_string()))?;

        #[derive(Serialize)]
        struct BindRequest<'a> {
            #[serde(rename = "sessionKey")]
            session_key: &'a str,
            qq: i64,
        }

        #[derive(Deserialize)]
        struct StatusResponse {
            code: i32,
            msg: Option<String>,
        }

        let response = self
            .client
            .post(self.api_url("bind"))
            .json(&BindRequest {
                session_key: &session,
                qq: self.qq,
            })
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let data: StatusResponse = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        if data.code != 0 {
            return Err(BotError::Network(format!(
                "mirai bind failed: code {}, {}",
                data.code,
                data.msg.unwrap_or_default()
            )));
        }

        self.session_key = Some(session);
        tracing::info!(qq = self.qq, "mirai session established");
        Ok(())
    }

    /// Poll for new message events, normalized for dispatch
    pub async fn fetch_events(&self, count: u32) -> Result<Vec<InboundEvent>, BotError> {
        #[derive(Deserialize)]
        struct FetchResponse {
            code: i32,
            #[serde(default)]
            data: Vec<WireEvent>,
        }

        let url = format!(
            "{}?sessionKey={}&count={}",
            self.api_url("fetchMessage"),
            self.session()?,
            count
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let data: FetchResponse = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        if data.code != 0 {
            return Err(BotError::Network(format!(
                "mirai fetchMessage failed: code {}",
                data.code
            )));
        }

        Ok(data
            .data
            .iter()
            .filter_map(|wire| self.normalize(wire))
            .collect())
    }

    /// Map a wire event to an inbound event; unsupported kinds, filtered
    /// groups and empty texts are dropped
    fn normalize(&self, wire: &WireEvent) -> Option<InboundEvent> {
        let sender = wire.sender.as_ref()?;
        let text = chain_text(&wire.message_chain);
        if text.is_empty() {
            return None;
        }

        match wire.kind.as_str() {
            "FriendMessage" => Some(InboundEvent::friend(sender.id, text)),
            "GroupMessage" => {
                let group_id = sender.group.as_ref()?.id;
                if !self.is_group_allowed(group_id) {
                    return None;
                }
                Some(InboundEvent::group(sender.id, group_id, text))
            }
            _ => None,
        }
    }

    async fn send_chain(&self, method: &str, target: i64, message: &Message) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct SendRequest<'a> {
            #[serde(rename = "sessionKey")]
            session_key: &'a str,
            target: i64,
            #[serde(rename = "messageChain")]
            message_chain: Vec<ChainItem>,
        }

        #[derive(Deserialize)]
        struct StatusResponse {
            code: i32,
            msg: Option<String>,
        }

        let request = SendRequest {
            session_key: self.session()?,
            target,
            message_chain: to_chain(message),
        };

        let response = self
            .client
            .post(self.api_url(method))
            .json(&request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let data: StatusResponse = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        if data.code != 0 {
            return Err(BotError::Network(format!(
                "mirai {} failed: code {}, {}",
                method,
                data.code,
                data.msg.unwrap_or_default()
            )));
        }
        Ok(())
    }
}

/// Concatenated text of the `Plain` segments of a message chain
fn chain_text(chain: &[WireChainItem]) -> String {
    chain
        .iter()
        .filter(|item| item.kind == "Plain")
        .filter_map(|item| item.text.as_deref())
        .collect::<Vec<_>>()
        .join("")
        .trim()
        .to_string()
}

fn to_chain(message: &Message) -> Vec<ChainItem> {
    message
        .parts()
        .iter()
        .map(|part| match part {
            Part::Text(text) => ChainItem::Plain { text: text.clone() },
            Part::Image(url) => ChainItem::Image { url: url.clone() },
            Part::Voice(url) => ChainItem::Voice { url: url.clone() },
        })
        .collect()
}

#[async_trait]
impl Transport for MiraiAdapter {
    async fn send_to_group(&self, group_id: i64, message: &Message) -> Result<(), BotError> {
        self.send_chain("sendGroupMessage", group_id, message).await
    }

    async fn send_to_friend(&self, user_id: i64, message: &Message) -> Result<(), BotError> {
        self.send_chain("sendFriendMessage", user_id, message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::EventKind;

    fn plain(text: &str) -> WireChainItem {
        WireChainItem {
            kind: "Plain".to_string(),
            text: Some(text.to_string()),
        }
    }

    fn source() -> WireChainItem {
        WireChainItem {
            kind: "Source".to_string(),
            text: None,
        }
    }

    #[test]
    fn chain_text_skips_non_plain_segments() {
        let chain = vec![source(), plain("hello "), plain("world")];
        assert_eq!(chain_text(&chain), "hello world");
    }

    #[test]
    fn outbound_parts_map_to_chain_segments() {
        let message = Message::new()
            .add_text("hi")
            .add_image("https://x/a.png")
            .add_text("");
        let chain = to_chain(&message);
        let json = serde_json::to_value(&chain).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"type": "Plain", "text": "hi"},
                {"type": "Image", "url": "https://x/a.png"},
                {"type": "Plain", "text": ""},
            ])
        );
    }

    #[test]
    fn normalize_filters_disallowed_groups() {
        let adapter = MiraiAdapter::new("http://localhost:8080", None, 1, vec![111]);
        let allowed = WireEvent {
            kind: "GroupMessage".to_string(),
            sender: Some(WireSender {
                id: 7,
                group: Some(WireGroup { id: 111 }),
            }),
            message_chain: vec![plain("hi")],
        };
        let denied = WireEvent {
            kind: "GroupMessage".to_string(),
            sender: Some(WireSender {
                id: 7,
                group: Some(WireGroup { id: 222 }),
            }),
            message_chain: vec![plain("hi")],
        };

        let event = adapter.normalize(&allowed).unwrap();
        assert_eq!(event.kind, EventKind::Group);
        assert_eq!(event.group_id, Some(111));
        assert!(adapter.normalize(&denied).is_none());
    }

    #[test]
    fn normalize_drops_empty_and_unknown_events() {
        let adapter = MiraiAdapter::new("http://localhost:8080", None, 1, Vec::new());
        let empty = WireEvent {
            kind: "FriendMessage".to_string(),
            sender: Some(WireSender { id: 7, group: None }),
            message_chain: vec![source()],
        };
        let stranger = WireEvent {
            kind: "StrangerMessage".to_string(),
            sender: Some(WireSender { id: 7, group: None }),
            message_chain: vec![plain("hi")],
        };

        assert!(adapter.normalize(&empty).is_none());
        assert!(adapter.normalize(&stranger).is_none());
    }
}
