//! Telegram Bot API transport.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Public Bot API endpoint.
pub const DEFAULT_TELEGRAM_URL: &str = "https://api.telegram.org";

/// Errors from the chat transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Transport failure.
    #[error("Telegram request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The Bot API answered `ok: false`.
    #[error("Telegram API error {code}: {description}")]
    Api {
        /// Error code reported by Telegram.
        code: i64,
        /// Description reported by Telegram.
        description: String,
    },
    /// Response body did not match the expected shape.
    #[error("Malformed Telegram response: {0}")]
    Decode(String),
}

/// Sends replies to a chat.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Sends `text` to `chat_id`.
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TransportError>;
}

/// One incoming update.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Update {
    #[serde(default)]
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

/// A chat message. Only the fields the bot reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub message_id: Option<i64>,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
}

#[derive(Serialize)]
struct GetUpdates {
    offset: i64,
    timeout: u64,
    allowed_updates: [&'static str; 1],
}

#[derive(Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    description: Option<String>,
}

/// Bot API client bound to one bot token.
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    /// `<api>/bot<token>`; holds the token.
    endpoint: String,
}

impl TelegramClient {
    /// Creates a client for `token` against `api_url`.
    pub fn new(client: Client, api_url: &str, token: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
        }
    }

    /// Long-polls for updates after `offset`, waiting up to `timeout_secs`.
    pub async fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TransportError> {
        let result = self
            .call(
                "getUpdates",
                &GetUpdates {
                    offset,
                    timeout: timeout_secs,
                    allowed_updates: ["message"],
                },
                // the HTTP request must outlive the long poll
                Some(Duration::from_secs(timeout_secs + 10)),
            )
            .await?;
        serde_json::from_value(result).map_err(|e| TransportError::Decode(e.to_string()))
    }

    async fn call<B: Serialize + Sync>(
        &self,
        method: &str,
        body: &B,
        timeout: Option<Duration>,
    ) -> Result<Value, TransportError> {
        debug!(method = method, "Telegram call");
        let mut request = self
            .client
            .post(format!("{}/{}", self.endpoint, method))
            .json(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response: ApiResponse = request
            .send()
            .await?
            .json()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))?;

        if !response.ok {
            return Err(TransportError::Api {
                code: response.error_code.unwrap_or_default(),
                description: response.description.unwrap_or_default(),
            });
        }
        Ok(response.result.unwrap_or(Value::Null))
    }
}

impl fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramClient").finish_non_exhaustive()
    }
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TransportError> {
        self.call("sendMessage", &SendMessage { chat_id, text }, None)
            .await
            .map(|_| ())
    }
}
