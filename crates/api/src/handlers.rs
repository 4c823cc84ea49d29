//! Request handlers.

use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};
use tradebot_bot::Update;

/// Largest webhook body read; larger deliveries are dropped.
pub const MAX_WEBHOOK_BODY: usize = 1024 * 1024;

/// Query string of the Google redirect.
#[derive(Debug, Deserialize)]
pub struct OAuthCallback {
    pub code: Option<String>,
    /// One-time state issued by `/connect`.
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Health check.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Telegram webhook.
///
/// Always answers 200 so Telegram does not redeliver; the reply is sent on
/// its own task. Bodies that are not a text message are ignored.
pub async fn webhook(State(state): State<AppState>, headers: HeaderMap, body: Body) -> StatusCode {
    if !state.auth.verify(&headers) {
        return StatusCode::OK;
    }

    let body = match axum::body::to_bytes(body, MAX_WEBHOOK_BODY).await {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e, "Dropping oversized or unreadable webhook body");
            return StatusCode::OK;
        }
    };

    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            debug!(error = %e, "Ignoring unparseable webhook body");
            return StatusCode::OK;
        }
    };

    let Some(message) = update.message else {
        return StatusCode::OK;
    };
    let Some(text) = message.text else {
        return StatusCode::OK;
    };
    let chat_id = message.chat.id;

    info!(chat_id = chat_id, update_id = update.update_id, "Webhook message");
    tokio::spawn(async move {
        state
            .dispatcher
            .respond(state.transport.as_ref(), chat_id, &text)
            .await;
    });

    StatusCode::OK
}

/// Google OAuth redirect target. Completes the login and notifies the chat
/// the login was started from.
///
/// Only states issued by `/connect` are accepted, each once; anything else is
/// rejected before the code is exchanged.
pub async fn oauth_callback(
    State(state): State<AppState>,
    Query(params): Query<OAuthCallback>,
) -> impl IntoResponse {
    if let Some(error) = params.error {
        warn!(error = %error, "Google login denied");
        return (StatusCode::BAD_REQUEST, format!("Login failed: {error}"));
    }
    let Some(code) = params.code else {
        return (
            StatusCode::BAD_REQUEST,
            "Missing authorization code".to_string(),
        );
    };

    let chat_id = match params.state.as_deref() {
        Some(login_state) => state.dispatcher.redeem_login(login_state).await,
        None => None,
    };
    let Some(chat_id) = chat_id else {
        warn!("Login callback with an unknown or expired state");
        return (
            StatusCode::BAD_REQUEST,
            "Unknown or expired login request, send /connect again".to_string(),
        );
    };

    let reply = state.dispatcher.complete_login(&code).await;
    if let Err(e) = state.transport.send_message(chat_id, &reply).await {
        warn!(chat_id = chat_id, error = %e, "Failed to notify chat");
    }

    (StatusCode::OK, format!("{reply}\nYou can return to Telegram."))
}
