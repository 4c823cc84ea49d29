//! HTTP server for the trade bot.
//!
//! This crate provides the webhook surface of the bot:
//! - Telegram webhook deliveries (`POST /webhook`)
//! - Google OAuth redirect (`GET /oauth2/callback/google`)
//! - Health check (`GET /health`)
//! - Optional webhook secret verification

/// Webhook authentication.
pub mod auth;
/// Error types.
pub mod error;
/// Request handlers.
pub mod handlers;
/// Route definitions.
pub mod routes;
/// Server configuration and startup.
pub mod server;
/// Application state.
pub mod state;

pub use auth::WebhookAuth;
pub use error::ApiError;
pub use routes::create_router;
pub use server::{ApiServer, ServerConfig};
pub use state::AppState;
