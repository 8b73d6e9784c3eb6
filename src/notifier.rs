use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::config::{Config, HTTP_TIMEOUT_SECS};
use crate::error::{AppError, Result};

/// Outbound messaging channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, chat_id: &str, text: &str) -> Result<()>;
}

/// Telegram Bot API client (`sendMessage` only).
pub struct TelegramBot {
    client: reqwest::Client,
    send_url: String,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct BotApiReply {
    ok: bool,
    description: Option<String>,
}

impl TelegramBot {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        let base = cfg.telegram_api_url.trim_end_matches('/');
        Ok(Self {
            client,
            send_url: format!("{base}/bot{}/sendMessage", cfg.bot_token),
        })
    }
}

#[async_trait]
impl Notifier for TelegramBot {
    async fn send(&self, chat_id: &str, text: &str) -> Result<()> {
        let resp = self
            .client
            .post(&self.send_url)
            .json(&SendMessageRequest { chat_id, text })
            .send()
            .await
            .map_err(|e| AppError::Notify(e.without_url().to_string()))?;

        let status = resp.status();
        let reply: Option<BotApiReply> = resp.json().await.ok();
        match reply {
            Some(BotApiReply { ok: true, .. }) if status.is_success() => Ok(()),
            Some(BotApiReply { description, .. }) => Err(AppError::Notify(format!(
                "status {}: {}",
                status.as_u16(),
                description.unwrap_or_else(|| "no description".to_string())
            ))),
            None => Err(AppError::Notify(format!(
                "status {} with unreadable body",
                status.as_u16()
            ))),
        }
    }
}

/// Deliver `message` to `chat_id`. Failures are logged and swallowed; the
/// return value tells whether the message went out.
pub async fn send_message<N: Notifier + ?Sized>(bot: &N, chat_id: &str, message: &str) -> bool {
    info!("Sending notification");
    match bot.send(chat_id, message).await {
        Ok(()) => {
            info!(chat_id, "Notification delivered: {message}");
            true
        }
        Err(e) => {
            error!(chat_id, "Failed to send notification: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn bot_for(server: &MockServer) -> TelegramBot {
        let cfg = Config {
            api_token: "api".to_string(),
            bot_token: "123:abc".to_string(),
            chat_id: "42".to_string(),
            api_endpoint: "http://127.0.0.1:1/".to_string(),
            telegram_api_url: format!("{}/", server.uri()),
            retry_interval: Duration::from_secs(600),
        };
        TelegramBot::new(&cfg).unwrap()
    }

    #[tokio::test]
    async fn posts_send_message_to_bot_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .and(body_json(json!({"chat_id": "42", "text": "hello"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let bot = bot_for(&server);
        assert!(send_message(&bot, "42", "hello").await);
    }

    #[tokio::test]
    async fn api_rejection_is_swallowed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: chat not found",
            })))
            .mount(&server)
            .await;

        let bot = bot_for(&server);
        let err = bot.send("42", "hello").await.unwrap_err();
        assert!(err.to_string().contains("chat not found"), "err={err}");
        assert!(!send_message(&bot, "42", "hello").await);
    }

    #[tokio::test]
    async fn unreachable_bot_api_is_swallowed() {
        let cfg = Config {
            api_token: "api".to_string(),
            bot_token: "123:abc".to_string(),
            chat_id: "42".to_string(),
            api_endpoint: "http://127.0.0.1:1/".to_string(),
            telegram_api_url: "http://127.0.0.1:1".to_string(),
            retry_interval: Duration::from_secs(600),
        };
        let bot = TelegramBot::new(&cfg).unwrap();
        assert!(!send_message(&bot, "42", "hello").await);
    }
}
