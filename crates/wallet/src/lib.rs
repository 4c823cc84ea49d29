//! Wallet authentication.
//!
//! This crate provides the login flow behind `/connect`:
//! - Google OAuth2 authorization URL and code exchange
//! - Okto authentication with the Google `id_token`
//! - Wallet listing for the authenticated user

/// Google OAuth2 client.
pub mod google;
/// Okto wallet-as-a-service client.
pub mod okto;
/// Google → Okto login flow.
pub mod connector;

pub use connector::{ConnectedWallet, OktoConnector, WalletConnector};
pub use google::{GoogleOAuthClient, GoogleOAuthConfig, GoogleTokens};
pub use okto::{OktoClient, OktoConfig, OktoSession, OktoWallet};

use tradebot_domain::TradeError;

/// Errors from the identity provider or the wallet service.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Transport failure.
    #[error("Auth request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The provider rejected the request.
    #[error("{provider} returned HTTP {status}: {message}")]
    Provider {
        /// Google or Okto.
        provider: &'static str,
        /// HTTP status.
        status: u16,
        /// Error message reported by the provider.
        message: String,
    },
    /// The token response carried no `id_token`.
    #[error("Google did not return an id_token")]
    MissingIdToken,
    /// The Okto response carried no auth token.
    #[error("Okto did not return an auth token")]
    MissingToken,
    /// Response body did not match the expected shape.
    #[error("Malformed auth response: {0}")]
    Decode(String),
    /// Invalid endpoint URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl From<AuthError> for TradeError {
    fn from(err: AuthError) -> Self {
        TradeError::AuthenticationFailed(err.to_string())
    }
}

/// Reads an error message from a provider's JSON body.
pub(crate) fn provider_error(provider: &'static str, status: u16, body: &str) -> AuthError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["error_description", "message", "error"]
                .iter()
                .find_map(|key| v.get(*key).and_then(|m| m.as_str()).map(String::from))
        })
        .unwrap_or_else(|| body.to_string());
    AuthError::Provider {
        provider,
        status,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_message() {
        let err = provider_error(
            "Google",
            400,
            r#"{"error":"invalid_grant","error_description":"Bad Request"}"#,
        );
        assert_eq!(err.to_string(), "Google returned HTTP 400: Bad Request");

        let err = provider_error("Okto", 502, "bad gateway");
        assert_eq!(err.to_string(), "Okto returned HTTP 502: bad gateway");
    }

    #[test]
    fn test_maps_to_authentication_failed() {
        let err: TradeError = AuthError::MissingIdToken.into();
        assert!(matches!(err, TradeError::AuthenticationFailed(_)));
    }
}
