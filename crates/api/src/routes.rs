//! Route definitions.

use crate::handlers::{health, oauth_callback, webhook};
use crate::state::AppState;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

/// Telegram delivery routes. The webhook enforces its own body limit.
pub fn telegram_routes() -> Router<AppState> {
    Router::new().route(
        "/webhook",
        post(webhook).layer(DefaultBodyLimit::disable()),
    )
}

/// OAuth redirect routes.
pub fn oauth_routes() -> Router<AppState> {
    Router::new().route("/oauth2/callback/google", get(oauth_callback))
}

/// Full application router, without middleware.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(telegram_routes())
        .merge(oauth_routes())
        .route("/health", get(health))
        .with_state(state)
}
