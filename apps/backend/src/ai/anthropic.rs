//! Claude move provider over the Anthropic messages API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::prompt;
use super::trait_def::{MoveProvider, MoveRequest, PlayerId, ProviderError};

pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const API_VERSION: &str = "2023-06-01";

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: [UserMessage<'a>; 1],
}

#[derive(Serialize)]
struct UserMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

pub struct AnthropicProvider {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
    endpoint: String,
}

impl AnthropicProvider {
    pub fn new(http: reqwest::Client, api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            http,
            api_key,
            model: model.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

/// First content block, cut down to its first word: Claude tends to explain
/// itself even when told not to.
fn extract_answer(body: &str) -> Result<String, ProviderError> {
    let parsed: MessagesResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Decode(e.to_string()))?;
    parsed
        .content
        .into_iter()
        .next()
        .and_then(|block| block.text)
        .and_then(|text| text.split_whitespace().next().map(str::to_string))
        .ok_or(ProviderError::EmptyResponse {
            provider: PlayerId::Claude,
        })
}

#[async_trait]
impl MoveProvider for AnthropicProvider {
    fn id(&self) -> PlayerId {
        PlayerId::Claude
    }

    async fn suggest_move(&self, request: &MoveRequest) -> Result<String, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::MissingApiKey {
            provider: PlayerId::Claude,
        })?;

        let user = prompt::anthropic_user(request);
        let payload = MessagesRequest {
            model: &self.model,
            max_tokens: 10,
            temperature: 0.3,
            system: prompt::ANTHROPIC_SYSTEM,
            messages: [UserMessage {
                role: "user",
                content: &user,
            }],
        };

        let response = self
            .http
            .post(&self.endpoint)
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ProviderError::Status {
                provider: PlayerId::Claude,
                status: status.as_u16(),
                body,
            });
        }

        extract_answer(&body)
    }
}
