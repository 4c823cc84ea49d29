//! Google → Okto login flow.

use crate::google::GoogleOAuthClient;
use crate::okto::{OktoClient, OktoWallet};
use crate::AuthError;
use async_trait::async_trait;
use tracing::info;

/// Result of a completed login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedWallet {
    pub wallets: Vec<OktoWallet>,
}

impl ConnectedWallet {
    /// First wallet on `network`, compared case-insensitively.
    pub fn address_on(&self, network: &str) -> Option<&str> {
        self.wallets
            .iter()
            .find(|w| w.network_name.eq_ignore_ascii_case(network))
            .map(|w| w.address.as_str())
    }
}

/// Connects a chat user to a custodial wallet.
#[async_trait]
pub trait WalletConnector: Send + Sync {
    /// URL the user opens to log in; `state` comes back with the redirect.
    fn authorization_url(&self, state: &str) -> Result<String, AuthError>;

    /// Completes the login with the authorization code from the redirect.
    async fn connect(&self, code: &str) -> Result<ConnectedWallet, AuthError>;
}

/// Google login followed by Okto authentication.
#[derive(Debug, Clone)]
pub struct OktoConnector {
    google: GoogleOAuthClient,
    okto: OktoClient,
}

impl OktoConnector {
    pub fn new(google: GoogleOAuthClient, okto: OktoClient) -> Self {
        Self { google, okto }
    }
}

#[async_trait]
impl WalletConnector for OktoConnector {
    fn authorization_url(&self, state: &str) -> Result<String, AuthError> {
        self.google.authorization_url(state)
    }

    async fn connect(&self, code: &str) -> Result<ConnectedWallet, AuthError> {
        let id_token = self.google.id_token(code).await?;
        let session = self.okto.authenticate(&id_token).await?;
        let wallets = self.okto.wallets(&session).await?;
        info!(wallets = wallets.len(), "Wallet connected");
        Ok(ConnectedWallet { wallets })
    }
}
