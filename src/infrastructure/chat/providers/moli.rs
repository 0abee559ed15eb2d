//! MoLi provider - molicloud reply API

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Message, Part};
use crate::infrastructure::chat::{ChatBackend, ChatResult, UpstreamError};

/// MoLi API endpoint
const API_BASE: &str = "https://i.mly.app/reply";

/// Base URL for media files referenced by reply items
const FILE_BASE: &str = "https://files.molicloud.com/";

/// MoLi provider
pub struct MoliProvider {
    api_key: String,
    api_secret: String,
    reply_to: String,
    client: Client,
}

impl MoliProvider {
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        reply_to: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            reply_to: reply_to.into(),
            client: Client::new(),
        }
    }

    /// Map reply items onto a message chain. Unknown item types are
    /// dropped; the trailing empty text part is the transport's
    /// message-building convention.
    fn assemble(items: Vec<ReplyItem>) -> Message {
        let mut message = Message::new();
        for item in items {
            // 1: text, 2: image, 3: document, 4: voice, 9: other file
            match item.typed {
                1 | 3 => message.push(Part::Text(item.content)),
                2 => message.push(Part::Image(format!("{}{}", FILE_BASE, item.content))),
                4 => message.push(Part::Voice(format!("{}{}", FILE_BASE, item.content))),
                _ => {}
            }
        }
        message.push(Part::Text(String::new()));
        message
    }
}

/// API request structure
#[derive(Serialize)]
struct ReplyRequest<'a> {
    content: &'a str,
    /// 2 = group message
    #[serde(rename = "type")]
    kind: u8,
    from: &'a str,
    to: &'a str,
}

/// API response structure
#[derive(Deserialize, Debug)]
struct ReplyResponse {
    message: Option<String>,
    #[serde(default)]
    data: Vec<ReplyItem>,
}

/// Single reply item
#[derive(Deserialize, Debug)]
struct ReplyItem {
    typed: u8,
    content: String,
}

#[async_trait]
impl ChatBackend for MoliProvider {
    fn name(&self) -> &str {
        "MoLi"
    }

    async fn chat(&self, text: &str, who: &str) -> ChatResult<Message> {
        let request = ReplyRequest {
            content: text,
            kind: 2,
            from: who,
            to: &self.reply_to,
        };

        let response = self
            .client
            .post(API_BASE)
            .header("Api-Key", &self.api_key)
            .header("Api-Secret", &self.api_secret)
            .json(&request)
            .send()
            .await
            .map_err(|e| UpstreamError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::ApiError(format!(
                "status: {}, body: {}",
                status, body
            )));
        }

        let reply: ReplyResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::ParseError(e.to_string()))?;

        if reply.data.is_empty() {
            return Err(UpstreamError::EmptyReply(
                reply.message.unwrap_or_else(|| "no reply items".to_string()),
            ));
        }

        Ok(Self::assemble(reply.data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembles_text_and_image_with_trailing_empty_part() {
        let items = vec![
            ReplyItem {
                typed: 1,
                content: "hello".to_string(),
            },
            ReplyItem {
                typed: 2,
                content: "pic/a.png".to_string(),
            },
        ];

        let message = MoliProvider::assemble(items);
        assert_eq!(
            message.parts(),
            &[
                Part::Text("hello".to_string()),
                Part::Image("https://files.molicloud.com/pic/a.png".to_string()),
                Part::Text(String::new()),
            ]
        );
    }

    #[test]
    fn documents_map_to_text_and_voice_gets_file_base() {
        let items = vec![
            ReplyItem {
                typed: 3,
                content: "doc body".to_string(),
            },
            ReplyItem {
                typed: 4,
                content: "audio/v.silk".to_string(),
            },
        ];

        let message = MoliProvider::assemble(items);
        assert_eq!(
            message.parts(),
            &[
                Part::Text("doc body".to_string()),
                Part::Voice("https://files.molicloud.com/audio/v.silk".to_string()),
                Part::Text(String::new()),
            ]
        );
    }

    #[test]
    fn drops_unknown_item_types() {
        let items = vec![
            ReplyItem {
                typed: 9,
                content: "blob".to_string(),
            },
            ReplyItem {
                typed: 1,
                content: "kept".to_string(),
            },
        ];

        let message = MoliProvider::assemble(items);
        assert_eq!(
            message.parts(),
            &[Part::Text("kept".to_string()), Part::Text(String::new())]
        );
    }
}
