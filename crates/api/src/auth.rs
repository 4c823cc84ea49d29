//! Webhook authentication.
//!
//! Telegram echoes the secret configured with `setWebhook` in the
//! `X-Telegram-Bot-Api-Secret-Token` header of every delivery. When a secret
//! is configured, deliveries without a matching header are ignored.

use axum::http::HeaderMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};
use zeroize::Zeroizing;

/// Header Telegram uses to echo the webhook secret.
pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Webhook secret shared across handlers.
#[derive(Clone, Default)]
pub struct WebhookAuth {
    secret: Option<Arc<Zeroizing<String>>>,
}

impl WebhookAuth {
    /// Accepts every delivery.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Requires `secret` on every delivery. An empty secret disables the check.
    #[must_use]
    pub fn with_secret(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        Self {
            secret: (!secret.is_empty()).then(|| Arc::new(Zeroizing::new(secret))),
        }
    }

    /// Whether a secret is configured.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }

    /// Checks the delivery headers against the configured secret.
    #[must_use]
    pub fn verify(&self, headers: &HeaderMap) -> bool {
        let Some(expected) = &self.secret else {
            return true;
        };

        match extract_secret(headers) {
            Some(provided) if constant_time_eq(provided.as_bytes(), expected.as_bytes()) => {
                debug!("Webhook secret verified");
                true
            }
            Some(_) => {
                warn!("Webhook secret mismatch");
                false
            }
            None => {
                warn!("Webhook secret missing");
                false
            }
        }
    }
}

impl fmt::Debug for WebhookAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookAuth")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

/// Extracts the secret token from request headers.
pub fn extract_secret(headers: &HeaderMap) -> Option<&str> {
    if let Some(value) = headers.get(SECRET_TOKEN_HEADER)
        && let Ok(secret) = value.to_str()
    {
        return Some(secret);
    }
    None
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
