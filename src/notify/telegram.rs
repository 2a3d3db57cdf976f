// src/notify/telegram.rs
//! Telegram bot API client: `sendMessage` with timeout + bounded retries,
//! and the long-poll `getUpdates` call used by the command loop.

use std::sync::RwLock;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{format_html, Alert, Notifier, NotifyError};

/// Incoming update from `getUpdates`.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    result: Option<T>,
}

/// Thin wrapper over the bot HTTP API.
pub struct TelegramApi {
    base: String,
    client: Client,
    timeout: Duration,
}

impl TelegramApi {
    pub fn new(token: &str) -> Self {
        Self {
            base: format!("https://api.telegram.org/bot{token}"),
            client: Client::new(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Long-poll for updates after `offset`. `poll_secs` is the server-side
    /// hold, so the HTTP timeout must exceed it.
    pub async fn get_updates(&self, offset: i64, poll_secs: u64) -> Result<Vec<Update>, NotifyError> {
        let resp: ApiResponse<Vec<Update>> = self
            .client
            .get(format!("{}/getUpdates", self.base))
            .query(&[("offset", offset.to_string()), ("timeout", poll_secs.to_string())])
            .timeout(self.timeout + Duration::from_secs(poll_secs))
            .send()
            .await?
            .json()
            .await?;
        if !resp.ok {
            return Err(NotifyError::Api(
                resp.description.unwrap_or_else(|| "getUpdates not ok".into()),
            ));
        }
        Ok(resp.result.unwrap_or_default())
    }

    /// Send an HTML-formatted message with preview disabled.
    pub async fn send_html(&self, chat_id: i64, text: &str) -> Result<(), NotifyError> {
        let body = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML",
            "disable_web_page_preview": true,
        });
        let resp: ApiResponse<serde_json::Value> = self
            .client
            .post(format!("{}/sendMessage", self.base))
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?
            .json()
            .await?;
        if !resp.ok {
            return Err(NotifyError::Api(
                resp.description.unwrap_or_else(|| "sendMessage not ok".into()),
            ));
        }
        Ok(())
    }
}

/// Alert channel bound to the chat that issued `/on`. Until a chat is
/// bound, sends are a debug-logged no-op.
pub struct TelegramNotifier {
    api: TelegramApi,
    chat_id: RwLock<Option<i64>>,
    max_retries: u8,
}

impl TelegramNotifier {
    pub fn new(api: TelegramApi) -> Self {
        Self {
            api,
            chat_id: RwLock::new(None),
            max_retries: 3,
        }
    }

    pub fn with_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn bind_chat(&self, chat_id: i64) {
        *self.chat_id.write().expect("chat id lock") = Some(chat_id);
    }

    pub fn bound_chat(&self) -> Option<i64> {
        *self.chat_id.read().expect("chat id lock")
    }
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, alert: &Alert) -> Result<(), NotifyError> {
        let Some(chat_id) = self.bound_chat() else {
            tracing::debug!("telegram disabled (no chat bound)");
            return Ok(());
        };
        let text = format_html(alert);

        let mut attempt: u8 = 0;
        loop {
            attempt += 1;
            match self.api.send_html(chat_id, &text).await {
                Ok(()) => return Ok(()),
                Err(e) if attempt < self.max_retries => {
                    tracing::debug!(error = ?e, attempt, "telegram send retry");
                    tokio::time::sleep(Duration::from_millis(500u64 << (attempt - 1))).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updates_deserialize_from_bot_api_shape() {
        let raw = r#"{"ok":true,"result":[{"update_id":7,"message":{"chat":{"id":42},"text":"/on"}}]}"#;
        let resp: ApiResponse<Vec<Update>> = serde_json::from_str(raw).unwrap();
        assert!(resp.ok);
        let updates = resp.result.unwrap();
        assert_eq!(updates[0].update_id, 7);
        assert_eq!(updates[0].message.as_ref().unwrap().chat.id, 42);
        assert_eq!(
            updates[0].message.as_ref().unwrap().text.as_deref(),
            Some("/on")
        );
    }

    #[test]
    fn notifier_starts_unbound() {
        let n = TelegramNotifier::new(TelegramApi::new("TEST"));
        assert_eq!(n.bound_chat(), None);
        n.bind_chat(42);
        assert_eq!(n.bound_chat(), Some(42));
    }
}
