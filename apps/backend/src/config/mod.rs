//! Process configuration, read once at startup.

use std::env;
use std::time::Duration;

use crate::ai::{anthropic, openai};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Move loop tick period.
    pub move_interval: Duration,
    /// Hard limit on a single provider call.
    pub provider_timeout: Duration,
    /// Capacity of each viewer's outbound queue.
    pub viewer_queue: usize,
    /// `None` allows any origin.
    pub cors_origins: Option<Vec<String>>,
    pub openai: ProviderConfig,
    pub anthropic: ProviderConfig,
    /// `None` keeps game history in memory.
    pub database_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Parse configuration from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let move_interval_ms: u64 = parse_or(&get, "ARENA_MOVE_INTERVAL_MS", 4000)?;
        if move_interval_ms == 0 {
            return Err(AppError::config("ARENA_MOVE_INTERVAL_MS must be greater than zero"));
        }
        let provider_timeout_secs: u64 = parse_or(&get, "ARENA_PROVIDER_TIMEOUT_SECS", 45)?;
        if provider_timeout_secs == 0 {
            return Err(AppError::config(
                "ARENA_PROVIDER_TIMEOUT_SECS must be greater than zero",
            ));
        }
        let viewer_queue: usize = parse_or(&get, "ARENA_VIEWER_QUEUE", 256)?;
        if viewer_queue == 0 {
            return Err(AppError::config("ARENA_VIEWER_QUEUE must be greater than zero"));
        }

        let cors_origins = get("ARENA_CORS_ORIGINS").map(|raw| {
            raw.split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect()
        });

        Ok(Self {
            host: get("ARENA_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&get, "ARENA_PORT", 8080)?,
            move_interval: Duration::from_millis(move_interval_ms),
            provider_timeout: Duration::from_secs(provider_timeout_secs),
            viewer_queue,
            cors_origins,
            openai: ProviderConfig {
                api_key: get("OPENAI_API_KEY"),
                model: get("OPENAI_MODEL").unwrap_or_else(|| openai::DEFAULT_MODEL.to_string()),
            },
            anthropic: ProviderConfig {
                api_key: get("ANTHROPIC_API_KEY"),
                model: get("ANTHROPIC_MODEL")
                    .unwrap_or_else(|| anthropic::DEFAULT_MODEL.to_string()),
            },
            database_url: get("DATABASE_URL"),
        })
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::config(format!("{key} must be a valid number, got '{raw}'"))),
    }
}
