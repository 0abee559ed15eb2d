//! Turing provider - Turing Robot openapi v2

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Message, Part};
use crate::infrastructure::chat::{ChatBackend, ChatResult, UpstreamError};

/// Turing API endpoint
const API_BASE: &str = "http://openapi.turingapi.com/openapi/api/v2";

/// Turing provider
pub struct TuringProvider {
    api_key: String,
    client: Client,
}

impl TuringProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client: Client::new(),
        }
    }

    /// Map result items onto a message chain. Unknown result types are
    /// dropped; link results become plain text.
    fn assemble(results: Vec<ResultItem>) -> Message {
        let mut message = Message::new();
        for item in results {
            match item.result_type.as_str() {
                "text" => {
                    if let Some(text) = item.values.text {
                        message.push(Part::Text(text));
                    }
                }
                "url" => {
                    if let Some(url) = item.values.url {
                        message.push(Part::Text(url));
                    }
                }
                "image" => {
                    if let Some(url) = item.values.image {
                        message.push(Part::Image(url));
                    }
                }
                "voice" => {
                    if let Some(url) = item.values.voice {
                        message.push(Part::Voice(url));
                    }
                }
                _ => {}
            }
        }
        message.push(Part::Text(String::new()));
        message
    }
}

/// API request structure
#[derive(Serialize)]
struct ChatRequest<'a> {
    perception: Perception<'a>,
    #[serde(rename = "userInfo")]
    user_info: UserInfo<'a>,
}

#[derive(Serialize)]
struct Perception<'a> {
    #[serde(rename = "inputText")]
    input_text: InputText<'a>,
}

#[derive(Serialize)]
struct InputText<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct UserInfo<'a> {
    #[serde(rename = "apiKey")]
    api_key: &'a str,
    #[serde(rename = "userId")]
    user_id: &'a str,
}

/// API response structure
#[derive(Deserialize, Debug)]
struct ChatResponse {
    message: Option<String>,
    #[serde(default)]
    results: Vec<ResultItem>,
}

/// Single result item
#[derive(Deserialize, Debug)]
struct ResultItem {
    #[serde(rename = "resultType")]
    result_type: String,
    #[serde(default)]
    values: ResultValues,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct ResultValues {
    text: Option<String>,
    url: Option<String>,
    image: Option<String>,
    voice: Option<String>,
}

#[async_trait]
impl ChatBackend for TuringProvider {
    fn name(&self) -> &str {
        "Turing"
    }

    async fn chat(&self, text: &str, who: &str) -> ChatResult<Message> {
        let request = ChatRequest {
            perception: Perception {
                input_text: InputText { text },
            },
            user_info: UserInfo {
                api_key: &self.api_key,
                user_id: who,
            },
        };

        let response = self
            .client
            .post(API_BASE)
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

        let reply: ChatResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::ParseError(e.to_string()))?;

        if reply.results.is_empty() {
            return Err(UpstreamError::EmptyReply(
                reply.message.unwrap_or_else(|| "no results".to_string()),
            ));
        }

        Ok(Self::assemble(reply.results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(result_type: &str, values: ResultValues) -> ResultItem {
        ResultItem {
            result_type: result_type.to_string(),
            values,
        }
    }

    #[test]
    fn assembles_text_and_image_with_trailing_empty_part() {
        let results = vec![
            item(
                "text",
                ResultValues {
                    text: Some("hi there".to_string()),
                    ..Default::default()
                },
            ),
            item(
                "image",
                ResultValues {
                    image: Some("https://img.example/a.jpg".to_string()),
                    ..Default::default()
                },
            ),
        ];

        let message = TuringProvider::assemble(results);
        assert_eq!(
            message.parts(),
            &[
                Part::Text("hi there".to_string()),
                Part::Image("https://img.example/a.jpg".to_string()),
                Part::Text(String::new()),
            ]
        );
    }

    #[test]
    fn url_results_become_plain_text() {
        let results = vec![item(
            "url",
            ResultValues {
                url: Some("https://example.com".to_string()),
                ..Default::default()
            },
        )];

        let message = TuringProvider::assemble(results);
        assert_eq!(
            message.parts(),
            &[
                Part::Text("https://example.com".to_string()),
                Part::Text(String::new()),
            ]
        );
    }

    #[test]
    fn drops_unknown_result_types() {
        let results = vec![
            item("news", ResultValues::default()),
            item("video", ResultValues::default()),
        ];

        let message = TuringProvider::assemble(results);
        assert_eq!(message.parts(), &[Part::Text(String::new())]);
    }
}
