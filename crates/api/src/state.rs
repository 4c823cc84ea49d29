//! Application state shared by the handlers.

use crate::auth::WebhookAuth;
use std::sync::Arc;
use tradebot_bot::{ChatTransport, Dispatcher};

/// Handles built once at start-up.
#[derive(Clone)]
pub struct AppState {
    /// Command dispatcher.
    pub dispatcher: Arc<Dispatcher>,
    /// Reply channel.
    pub transport: Arc<dyn ChatTransport>,
    /// Webhook secret check.
    pub auth: WebhookAuth,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        transport: Arc<dyn ChatTransport>,
        auth: WebhookAuth,
    ) -> Self {
        Self {
            dispatcher,
            transport,
            auth,
        }
    }
}
