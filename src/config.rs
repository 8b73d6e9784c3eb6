use std::time::Duration;

use crate::error::{AppError, Result};

pub const API_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
pub const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Pause between two polling iterations (seconds).
pub const RETRY_INTERVAL_SECS: u64 = 600;

/// Timeout applied to every outbound HTTP request (seconds).
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Environment variables that must be present for the bot to start.
pub const REQUIRED_VARS: [&str; 3] = ["API_TOKEN", "BOT_TOKEN", "CHAT_ID"];

#[derive(Clone)]
pub struct Config {
    /// Review API token, sent as `Authorization: OAuth <token>` (API_TOKEN)
    pub api_token: String,
    /// Telegram bot token (BOT_TOKEN)
    pub bot_token: String,
    /// Destination chat for every notification (CHAT_ID)
    pub chat_id: String,
    pub api_endpoint: String,
    pub telegram_api_url: String,
    pub retry_interval: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Every missing required
    /// variable is logged before the error is returned.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let missing: Vec<&str> = REQUIRED_VARS
            .iter()
            .copied()
            .filter(|key| get(*key).is_none())
            .collect();
        for key in &missing {
            tracing::error!(var = *key, "Missing required environment variable: '{key}'");
        }
        if !missing.is_empty() {
            return Err(AppError::Config(format!(
                "missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        let retry_secs = match get("RETRY_INTERVAL_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                AppError::Config("RETRY_INTERVAL_SECS must be a whole number of seconds".to_string())
            })?,
            None => RETRY_INTERVAL_SECS,
        };

        Ok(Self {
            api_token: get("API_TOKEN").unwrap_or_default(),
            bot_token: get("BOT_TOKEN").unwrap_or_default(),
            chat_id: get("CHAT_ID").unwrap_or_default(),
            api_endpoint: get("API_ENDPOINT").unwrap_or_else(|| API_ENDPOINT.to_string()),
            telegram_api_url: get("TELEGRAM_API_URL")
                .unwrap_or_else(|| TELEGRAM_API_URL.to_string()),
            retry_interval: Duration::from_secs(retry_secs),
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &mask(&self.api_token))
            .field("bot_token", &mask(&self.bot_token))
            .field("chat_id", &self.chat_id)
            .field("api_endpoint", &self.api_endpoint)
            .field("telegram_api_url", &self.telegram_api_url)
            .field("retry_interval_secs", &self.retry_interval.as_secs())
            .finish()
    }
}

fn mask(s: &str) -> String {
    if s.len() <= 6 {
        "***".into()
    } else {
        format!("{}***", s.chars().take(3).collect::<String>())
    }
}

/// Log filter directive (LOG_LEVEL). Read separately so logging is up before
/// the required variables are checked.
pub fn log_level() -> String {
    std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string())
}

/// Optional log file mirrored alongside stdout (LOG_FILE).
pub fn log_file() -> Option<String> {
    std::env::var("LOG_FILE").ok().filter(|s| !s.trim().is_empty())
}
