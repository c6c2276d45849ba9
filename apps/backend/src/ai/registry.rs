//! The two providers that play, keyed by identity.

use std::sync::Arc;
use std::time::Duration;

use super::anthropic::AnthropicProvider;
use super::openai::OpenAiProvider;
use super::trait_def::{MoveProvider, PlayerId};
use crate::config::AppConfig;
use crate::error::AppError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct ProviderRegistry {
    chatgpt: Arc<dyn MoveProvider>,
    claude: Arc<dyn MoveProvider>,
}

impl ProviderRegistry {
    pub fn new(chatgpt: Arc<dyn MoveProvider>, claude: Arc<dyn MoveProvider>) -> Self {
        Self { chatgpt, claude }
    }

    /// Build the HTTP-backed providers. Missing API keys are not an error here:
    /// the provider fails each call and acquisition falls back.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| AppError::config(format!("failed to build HTTP client: {e}")))?;

        for (id, provider) in [
            (PlayerId::ChatGpt, &config.openai),
            (PlayerId::Claude, &config.anthropic),
        ] {
            if provider.api_key.is_none() {
                tracing::warn!(provider = %id, "API key not configured; moves will be random");
            }
        }

        let chatgpt = OpenAiProvider::new(
            http.clone(),
            config.openai.api_key.clone(),
            config.openai.model.clone(),
        );
        let claude = AnthropicProvider::new(
            http,
            config.anthropic.api_key.clone(),
            config.anthropic.model.clone(),
        );

        Ok(Self::new(Arc::new(chatgpt), Arc::new(claude)))
    }

    pub fn get(&self, id: PlayerId) -> &Arc<dyn MoveProvider> {
        match id {
            PlayerId::ChatGpt => &self.chatgpt,
            PlayerId::Claude => &self.claude,
        }
    }
}
