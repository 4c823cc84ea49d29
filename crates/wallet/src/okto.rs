//! Okto wallet-as-a-service client.

use crate::{AuthError, provider_error};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::{debug, info};
use zeroize::Zeroizing;

/// Okto sandbox environment.
pub const DEFAULT_OKTO_URL: &str = "https://sandbox-api.okto.tech";

/// Okto application credentials.
#[derive(Clone)]
pub struct OktoConfig {
    /// API base URL.
    pub base_url: String,
    /// Client API key, sent as `x-api-key`.
    pub api_key: Zeroizing<String>,
}

impl OktoConfig {
    /// Creates a config for the sandbox environment.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_OKTO_URL.to_string(),
            api_key: Zeroizing::new(api_key.into()),
        }
    }
}

impl fmt::Debug for OktoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OktoConfig")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// An authenticated Okto user.
#[derive(Clone)]
pub struct OktoSession {
    pub auth_token: Zeroizing<String>,
    pub refresh_token: Option<Zeroizing<String>>,
}

impl fmt::Debug for OktoSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OktoSession").finish_non_exhaustive()
    }
}

/// One wallet of the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OktoWallet {
    pub network_name: String,
    pub address: String,
}

#[derive(Serialize)]
struct AuthenticateRequest<'a> {
    id_token: &'a str,
}

/// Okto API client.
#[derive(Debug, Clone)]
pub struct OktoClient {
    client: Client,
    config: OktoConfig,
}

impl OktoClient {
    /// Creates a new client.
    pub fn new(client: Client, config: OktoConfig) -> Self {
        Self { client, config }
    }

    /// Exchanges a Google `id_token` for an Okto auth token.
    pub async fn authenticate(&self, id_token: &str) -> Result<OktoSession, AuthError> {
        let body = self
            .send(
                self.request("/api/v1/authenticate")
                    .json(&AuthenticateRequest { id_token }),
            )
            .await?;

        // `{data: {auth_token, refresh_auth_token}}`, older deployments answer `{token}`
        let auth_token = string_at(&body, &["/data/auth_token", "/data/token", "/token"])
            .ok_or(AuthError::MissingToken)?;
        let refresh_token = string_at(&body, &["/data/refresh_auth_token"]);

        info!("Okto authentication successful");
        Ok(OktoSession {
            auth_token: Zeroizing::new(auth_token),
            refresh_token: refresh_token.map(Zeroizing::new),
        })
    }

    /// Lists the user's wallets, creating them on first use.
    pub async fn wallets(&self, session: &OktoSession) -> Result<Vec<OktoWallet>, AuthError> {
        let body = self
            .send(
                self.request("/api/v1/wallet")
                    .bearer_auth(session.auth_token.as_str()),
            )
            .await?;

        let wallets = body
            .pointer("/data/wallets")
            .cloned()
            .ok_or_else(|| AuthError::Decode("response has no data.wallets".to_string()))?;
        let wallets: Vec<OktoWallet> =
            serde_json::from_value(wallets).map_err(|e| AuthError::Decode(e.to_string()))?;
        debug!(count = wallets.len(), "Fetched Okto wallets");
        Ok(wallets)
    }

    fn request(&self, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        self.client
            .post(url)
            .header("x-api-key", self.config.api_key.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, AuthError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(provider_error("Okto", status.as_u16(), &body));
        }
        serde_json::from_str(&body).map_err(|e| AuthError::Decode(e.to_string()))
    }
}

fn string_at(body: &Value, pointers: &[&str]) -> Option<String> {
    pointers
        .iter()
        .find_map(|p| body.pointer(p).and_then(Value::as_str).map(String::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client_for(server: &mockito::ServerGuard) -> OktoClient {
        let mut config = OktoConfig::new("api-key-1");
        config.base_url = server.url();
        OktoClient::new(Client::new(), config)
    }

    fn session(token: &str) -> OktoSession {
        OktoSession {
            auth_token: Zeroizing::new(token.to_string()),
            refresh_token: None,
        }
    }

    #[tokio::test]
    async fn test_authenticate_sends_api_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/authenticate")
            .match_header("x-api-key", "api-key-1")
            .match_body(Matcher::Json(serde_json::json!({ "id_token": "jwt" })))
            .with_body(r#"{"status":"success","data":{"auth_token":"okto-token","refresh_auth_token":"r"}}"#)
            .create_async()
            .await;

        let session = client_for(&server).authenticate("jwt").await.unwrap();
        assert_eq!(session.auth_token.as_str(), "okto-token");
        assert_eq!(session.refresh_token.as_deref().map(String::as_str), Some("r"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_authenticate_flat_token() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/v1/authenticate")
            .with_body(r#"{"token":"flat"}"#)
            .create_async()
            .await;

        let session = client_for(&server).authenticate("jwt").await.unwrap();
        assert_eq!(session.auth_token.as_str(), "flat");
    }

    #[tokio::test]
    async fn test_authenticate_without_token() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/v1/authenticate")
            .with_body(r#"{"status":"success","data":{}}"#)
            .create_async()
            .await;

        let err = client_for(&server).authenticate("jwt").await.unwrap_err();
        assert!(matches!(err, AuthError::MissingToken));
    }

    #[tokio::test]
    async fn test_wallets() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/v1/wallet")
            .match_header("authorization", "Bearer okto-token")
            .with_body(
                r#"{"status":"success","data":{"wallets":[{"network_name":"APTOS","address":"0xa11ce","success":true}]}}"#,
            )
            .create_async()
            .await;

        let wallets = client_for(&server)
            .wallets(&session("okto-token"))
            .await
            .unwrap();
        assert_eq!(
            wallets,
            vec![OktoWallet {
                network_name: "APTOS".to_string(),
                address: "0xa11ce".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_rejected_id_token() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/v1/authenticate")
            .with_status(401)
            .with_body(r#"{"status":"error","error":{"message":"invalid id_token"},"message":"Unauthorized"}"#)
            .create_async()
            .await;

        match client_for(&server).authenticate("jwt").await.unwrap_err() {
            AuthError::Provider { provider, status, message } => {
                assert_eq!(provider, "Okto");
                assert_eq!(status, 401);
                assert_eq!(message, "Unauthorized");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
