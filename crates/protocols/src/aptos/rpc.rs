//! REST client for an Aptos fullnode (`/v1` API).

use super::RpcError;
use super::types::{
    AccountData, AccountResource, Event, GasEstimation, LedgerInfo, PendingTransaction,
    SubmitTransactionRequest, Transaction, UserTransactionRequest, value_to_string,
};
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use tradebot_domain::entities::token::same_type_tag;

/// Default mainnet fullnode.
pub const DEFAULT_NODE_URL: &str = "https://fullnode.mainnet.aptoslabs.com/v1";

/// Configuration for the node client.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Base URL including the `/v1` prefix.
    pub url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_NODE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Creation numbers of a `CoinStore`'s event handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoinEventHandles {
    /// Deposit events handle.
    pub deposit: u64,
    /// Withdraw events handle.
    pub withdraw: u64,
}

/// Aptos fullnode client.
#[derive(Debug, Clone)]
pub struct AptosClient {
    client: Client,
    base_url: String,
}

impl AptosClient {
    /// Creates a client with its own connection pool.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &NodeConfig) -> Result<Self, RpcError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self::with_client(client, config.url.clone()))
    }

    /// Creates a client sharing an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Ledger summary.
    pub async fn ledger_info(&self) -> Result<LedgerInfo, RpcError> {
        self.get_json("/").await
    }

    /// Account sequence number and authentication key.
    pub async fn account(&self, address: &str) -> Result<AccountData, RpcError> {
        self.get_json(&format!("/accounts/{address}")).await
    }

    /// Current gas unit price estimate.
    pub async fn estimate_gas_price(&self) -> Result<GasEstimation, RpcError> {
        self.get_json("/estimate_gas_price").await
    }

    /// Every resource stored under an account.
    pub async fn account_resources(
        &self,
        address: &str,
    ) -> Result<Vec<AccountResource>, RpcError> {
        self.get_json(&format!("/accounts/{address}/resources")).await
    }

    /// One resource by type tag, `None` when the account does not hold it.
    pub async fn account_resource(
        &self,
        address: &str,
        resource_type: &str,
    ) -> Result<Option<AccountResource>, RpcError> {
        let resources = self.account_resources(address).await?;
        Ok(resources
            .into_iter()
            .find(|r| same_type_tag(&r.resource_type, resource_type)))
    }

    /// Balance held in `CoinStore<coin_type>`, `None` if not registered.
    pub async fn coin_balance(
        &self,
        address: &str,
        coin_type: &str,
    ) -> Result<Option<u64>, RpcError> {
        let store = format!("0x1::coin::CoinStore<{coin_type}>");
        let Some(resource) = self.account_resource(address, &store).await? else {
            return Ok(None);
        };
        let value = resource
            .data
            .pointer("/coin/value")
            .map(value_to_string)
            .ok_or_else(|| RpcError::Decode(format!("{store} has no coin.value")))?;
        value
            .parse()
            .map(Some)
            .map_err(|_| RpcError::Decode(format!("{store} coin.value is not a u64")))
    }

    /// Deposit and withdraw handle creation numbers of `CoinStore<coin_type>`.
    pub async fn coin_event_handles(
        &self,
        address: &str,
        coin_type: &str,
    ) -> Result<CoinEventHandles, RpcError> {
        let store = format!("0x1::coin::CoinStore<{coin_type}>");
        let resource = self
            .account_resource(address, &store)
            .await?
            .ok_or_else(|| RpcError::MissingResource(store.clone()))?;

        let creation_number = |handle: &str| -> Result<u64, RpcError> {
            resource
                .data
                .pointer(&format!("/{handle}/guid/id/creation_num"))
                .map(value_to_string)
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| RpcError::Decode(format!("{store} has no {handle} creation number")))
        };

        Ok(CoinEventHandles {
            deposit: creation_number("deposit_events")?,
            withdraw: creation_number("withdraw_events")?,
        })
    }

    /// A page of events emitted through one handle.
    pub async fn events_by_creation_number(
        &self,
        address: &str,
        creation_number: u64,
        start: Option<u64>,
        limit: Option<u16>,
    ) -> Result<Vec<Event>, RpcError> {
        let mut path = format!("/accounts/{address}/events/{creation_number}");
        let mut query = Vec::new();
        if let Some(limit) = limit {
            query.push(format!("limit={limit}"));
        }
        if let Some(start) = start {
            query.push(format!("start={start}"));
        }
        if !query.is_empty() {
            path.push('?');
            path.push_str(&query.join("&"));
        }
        self.get_json(&path).await
    }

    /// Transaction by hash, `None` while the node has not seen it.
    pub async fn transaction_by_hash(&self, hash: &str) -> Result<Option<Transaction>, RpcError> {
        match self.get_json(&format!("/transactions/by_hash/{hash}")).await {
            Ok(txn) => Ok(Some(txn)),
            Err(RpcError::Api { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// BCS signing message for an unsigned transaction, computed by the node.
    pub async fn encode_submission(
        &self,
        request: &UserTransactionRequest,
    ) -> Result<Vec<u8>, RpcError> {
        let encoded: String = self
            .post_json("/transactions/encode_submission", request)
            .await?;
        let encoded = encoded.strip_prefix("0x").unwrap_or(&encoded);
        hex::decode(encoded).map_err(|e| RpcError::Decode(e.to_string()))
    }

    /// Broadcasts a signed transaction.
    pub async fn submit_transaction(
        &self,
        request: &SubmitTransactionRequest,
    ) -> Result<PendingTransaction, RpcError> {
        self.post_json("/transactions", request).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, RpcError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "GET");
        let response = self.client.get(&url).send().await?;
        Self::decode(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, RpcError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "POST");
        let response = self.client.post(&url).json(body).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, RpcError> {
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(RpcError::Api {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        serde_json::from_slice(&body).map_err(|e| RpcError::Decode(e.to_string()))
    }
}

/// Extracts `message` from the node's error body, falling back to the raw text.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| {
            let text = String::from_utf8_lossy(body);
            if text.trim().is_empty() {
                status.to_string()
            } else {
                text.into_owned()
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const ADDRESS: &str = "0xa11ce";

    fn client_for(server: &mockito::ServerGuard) -> AptosClient {
        AptosClient::with_client(Client::new(), server.url())
    }

    #[tokio::test]
    async fn test_account_and_gas_price() {
        let mut server = mockito::Server::new_async().await;
        let _account = server
            .mock("GET", "/accounts/0xa11ce")
            .with_body(r#"{"sequence_number":"42","authentication_key":"0xa11ce"}"#)
            .create_async()
            .await;
        let _gas = server
            .mock("GET", "/estimate_gas_price")
            .with_body(r#"{"gas_estimate":100,"prioritized_gas_estimate":150}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        assert_eq!(client.account(ADDRESS).await.unwrap().sequence_number, 42);
        let gas = client.estimate_gas_price().await.unwrap();
        assert_eq!(gas.gas_estimate, 100);
        assert_eq!(gas.prioritized_gas_estimate, Some(150));
    }

    #[tokio::test]
    async fn test_coin_balance_and_handles() {
        let mut server = mockito::Server::new_async().await;
        let resources = serde_json::json!([
            {
                "type": "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>",
                "data": {
                    "coin": { "value": "123456" },
                    "deposit_events": { "counter": "3", "guid": { "id": { "addr": ADDRESS, "creation_num": "2" } } },
                    "withdraw_events": { "counter": "1", "guid": { "id": { "addr": ADDRESS, "creation_num": "3" } } }
                }
            }
        ]);
        let _resources = server
            .mock("GET", "/accounts/0xa11ce/resources")
            .with_body(resources.to_string())
            .expect_at_least(1)
            .create_async()
            .await;

        let client = client_for(&server);
        let balance = client
            .coin_balance(ADDRESS, "0x1::aptos_coin::AptosCoin")
            .await
            .unwrap();
        assert_eq!(balance, Some(123_456));

        let missing = client.coin_balance(ADDRESS, "0x2::usdc::USDC").await.unwrap();
        assert_eq!(missing, None);

        let handles = client
            .coin_event_handles(ADDRESS, "0x1::aptos_coin::AptosCoin")
            .await
            .unwrap();
        assert_eq!(handles, CoinEventHandles { deposit: 2, withdraw: 3 });
    }

    #[tokio::test]
    async fn test_events_query() {
        let mut server = mockito::Server::new_async().await;
        let _events = server
            .mock("GET", "/accounts/0xa11ce/events/2")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("limit".into(), "10".into()),
                Matcher::UrlEncoded("start".into(), "0".into()),
            ]))
            .with_body(
                r#"[{"version":"9","guid":{"creation_number":"2","account_address":"0xa11ce"},"sequence_number":"0","type":"0x1::coin::DepositEvent","data":{"amount":"5"}}]"#,
            )
            .create_async()
            .await;

        let events = client_for(&server)
            .events_by_creation_number(ADDRESS, 2, Some(0), Some(10))
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].version, Some(9));
        assert_eq!(events[0].guid.creation_number, 2);
    }

    #[tokio::test]
    async fn test_transaction_not_found_is_none() {
        let mut server = mockito::Server::new_async().await;
        let _txn = server
            .mock("GET", "/transactions/by_hash/0xabc")
            .with_status(404)
            .with_body(r#"{"message":"Transaction not found by Transaction hash(0xabc)","error_code":"transaction_not_found"}"#)
            .create_async()
            .await;

        assert!(client_for(&server).transaction_by_hash("0xabc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_api_error_message() {
        let mut server = mockito::Server::new_async().await;
        let _account = server
            .mock("GET", "/accounts/0xa11ce")
            .with_status(400)
            .with_body(r#"{"message":"invalid address","error_code":"invalid_input"}"#)
            .create_async()
            .await;

        let err = client_for(&server).account(ADDRESS).await.unwrap_err();
        match err {
            RpcError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "invalid address");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
