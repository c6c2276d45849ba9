//! Move provider trait definition.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity of an external move provider. One provider plays each color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    #[serde(rename = "ChatGPT")]
    ChatGpt,
    Claude,
}

impl PlayerId {
    pub const ALL: [PlayerId; 2] = [PlayerId::ChatGpt, PlayerId::Claude];

    pub fn as_str(self) -> &'static str {
        match self {
            PlayerId::ChatGpt => "ChatGPT",
            PlayerId::Claude => "Claude",
        }
    }

    pub fn other(self) -> PlayerId {
        match self {
            PlayerId::ChatGpt => PlayerId::Claude,
            PlayerId::Claude => PlayerId::ChatGpt,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a provider is shown when asked for a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    pub fen: String,
    /// Legal moves in SAN.
    pub legal_moves: Vec<String>,
}

/// Errors that can occur while asking a provider for a move.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} API key not configured")]
    MissingApiKey { provider: PlayerId },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{provider} API error ({status}): {body}")]
    Status {
        provider: PlayerId,
        status: u16,
        body: String,
    },
    #[error("could not decode provider response: {0}")]
    Decode(String),
    #[error("no response from {provider}")]
    EmptyResponse { provider: PlayerId },
    #[error("provider call timed out after {0:?}")]
    Timeout(Duration),
}

/// Trait for move providers.
///
/// Implementations return the provider's raw answer. Parsing and validation
/// against the legal move set happen in the acquisition layer, so a provider
/// never needs to know the rules.
#[async_trait]
pub trait MoveProvider: Send + Sync {
    fn id(&self) -> PlayerId;

    async fn suggest_move(&self, request: &MoveRequest) -> Result<String, ProviderError>;
}
