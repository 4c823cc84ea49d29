//! Google OAuth2 authorization code flow.

use crate::{AuthError, provider_error};
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use tracing::{debug, info};
use url::Url;
use zeroize::Zeroizing;

/// Google consent screen.
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
/// Google token endpoint.
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
/// Default redirect target, served by the API's callback route.
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8000/oauth2/callback/google";

const SCOPES: &str = "profile email";

/// OAuth client registration.
#[derive(Clone)]
pub struct GoogleOAuthConfig {
    /// OAuth client id.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: Zeroizing<String>,
    /// Registered redirect URI.
    pub redirect_uri: String,
    /// Consent screen URL.
    pub auth_url: String,
    /// Token endpoint URL.
    pub token_url: String,
}

impl GoogleOAuthConfig {
    /// Creates a config for the public Google endpoints.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: Zeroizing::new(client_secret.into()),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
        }
    }

    /// Overrides the redirect URI.
    #[must_use]
    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = redirect_uri.into();
        self
    }
}

impl fmt::Debug for GoogleOAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleOAuthConfig")
            .field("client_id", &self.client_id)
            .field("redirect_uri", &self.redirect_uri)
            .field("auth_url", &self.auth_url)
            .field("token_url", &self.token_url)
            .finish_non_exhaustive()
    }
}

/// Token endpoint response.
#[derive(Clone, Deserialize)]
pub struct GoogleTokens {
    pub access_token: String,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl fmt::Debug for GoogleTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleTokens")
            .field("has_id_token", &self.id_token.is_some())
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// Google OAuth2 client.
#[derive(Debug, Clone)]
pub struct GoogleOAuthClient {
    client: Client,
    config: GoogleOAuthConfig,
}

impl GoogleOAuthClient {
    /// Creates a new client.
    pub fn new(client: Client, config: GoogleOAuthConfig) -> Self {
        Self { client, config }
    }

    /// Consent URL requesting offline access to `profile email`. `state` is
    /// echoed back to the redirect URI.
    pub fn authorization_url(&self, state: &str) -> Result<String, AuthError> {
        let url = Url::parse_with_params(
            &self.config.auth_url,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", SCOPES),
                ("access_type", "offline"),
                ("state", state),
            ],
        )?;
        Ok(url.into())
    }

    /// Exchanges an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str) -> Result<GoogleTokens, AuthError> {
        debug!(token_url = %self.config.token_url, "Exchanging authorization code");
        let response = self
            .client
            .post(&self.config.token_url)
            .form(&[
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(provider_error("Google", status.as_u16(), &body));
        }

        let tokens: GoogleTokens =
            serde_json::from_str(&body).map_err(|e| AuthError::Decode(e.to_string()))?;
        info!(has_id_token = tokens.id_token.is_some(), "Google code exchanged");
        Ok(tokens)
    }

    /// Exchanges a code and keeps only the `id_token`.
    pub async fn id_token(&self, code: &str) -> Result<Zeroizing<String>, AuthError> {
        self.exchange_code(code)
            .await?
            .id_token
            .map(Zeroizing::new)
            .ok_or(AuthError::MissingIdToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client_for(server: &mockito::ServerGuard) -> GoogleOAuthClient {
        let mut config = GoogleOAuthConfig::new("client-123", "shh");
        config.token_url = format!("{}/token", server.url());
        GoogleOAuthClient::new(Client::new(), config)
    }

    #[test]
    fn test_authorization_url() {
        let client = GoogleOAuthClient::new(
            Client::new(),
            GoogleOAuthConfig::new("client-123", "shh")
                .with_redirect_uri("https://bot.example/oauth2/callback/google"),
        );
        let url = Url::parse(&client.authorization_url("42").unwrap()).unwrap();

        assert_eq!(url.host_str(), Some("accounts.google.com"));
        let params: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(params["client_id"], "client-123");
        assert_eq!(params["redirect_uri"], "https://bot.example/oauth2/callback/google");
        assert_eq!(params["scope"], "profile email");
        assert_eq!(params["access_type"], "offline");
        assert_eq!(params["response_type"], "code");
        assert_eq!(params["state"], "42");
        assert!(!params.contains_key("client_secret"));
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = GoogleOAuthConfig::new("client-123", "very-secret");
        assert!(!format!("{config:?}").contains("very-secret"));
    }

    #[tokio::test]
    async fn test_exchange_code() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/token")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("code".into(), "auth-code".into()),
                Matcher::UrlEncoded("client_secret".into(), "shh".into()),
                Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
            ]))
            .with_body(r#"{"access_token":"at","id_token":"jwt","expires_in":3599,"token_type":"Bearer"}"#)
            .create_async()
            .await;

        let token = client_for(&server).id_token("auth-code").await.unwrap();
        assert_eq!(token.as_str(), "jwt");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_id_token() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/token")
            .with_body(r#"{"access_token":"at"}"#)
            .create_async()
            .await;

        let err = client_for(&server).id_token("auth-code").await.unwrap_err();
        assert!(matches!(err, AuthError::MissingIdToken));
    }

    #[tokio::test]
    async fn test_rejected_code() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/token")
            .with_status(400)
            .with_body(r#"{"error":"invalid_grant","error_description":"Malformed auth code."}"#)
            .create_async()
            .await;

        match client_for(&server).exchange_code("bad").await.unwrap_err() {
            AuthError::Provider { status, message, .. } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Malformed auth code.");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
