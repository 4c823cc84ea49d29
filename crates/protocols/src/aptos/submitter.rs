//! Signs, submits and tracks transactions until the ledger finalizes them.

use super::RpcError;
use super::account::LocalAccount;
use super::rpc::AptosClient;
use super::types::{
    PendingTransaction, SubmitTransactionRequest, TransactionSignature, UserTransactionRequest,
};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use tradebot_domain::{TransactionPayload, TransactionResult, TransactionStatus};

/// Signature scheme tag for single-key ed25519 accounts.
const ED25519_SIGNATURE: &str = "ed25519_signature";

/// Submits payloads on behalf of one account.
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    /// Address transactions are sent from.
    fn sender(&self) -> &str;

    /// Signs and broadcasts a payload.
    async fn submit(&self, payload: &TransactionPayload) -> Result<PendingTransaction, RpcError>;

    /// Polls a transaction until it is executed or the finality timeout elapses.
    async fn wait_for_transaction(&self, hash: &str) -> Result<TransactionResult, RpcError>;

    /// Submits a payload and waits for its outcome.
    async fn submit_and_wait(
        &self,
        payload: &TransactionPayload,
    ) -> Result<TransactionResult, RpcError> {
        let pending = self.submit(payload).await?;
        self.wait_for_transaction(&pending.hash).await
    }
}

/// Gas and finality settings.
#[derive(Debug, Clone)]
pub struct SubmitConfig {
    /// Gas limit per transaction.
    pub max_gas_amount: u64,
    /// Fixed gas unit price; estimated from the node when unset.
    pub gas_unit_price: Option<u64>,
    /// Seconds until a submitted transaction expires.
    pub expiration_secs: u64,
    /// Seconds to wait for finality before giving up.
    pub finality_timeout_secs: u64,
    /// Delay between status polls.
    pub poll_interval_ms: u64,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            max_gas_amount: 10_000,
            gas_unit_price: None,
            expiration_secs: 600,
            finality_timeout_secs: 60,
            poll_interval_ms: 1_000,
        }
    }
}

/// Submitter backed by a fullnode and a local key.
///
/// Submissions from one submitter are serialized so concurrent callers never
/// reuse a sequence number. Finality polling runs outside the lock.
pub struct AptosSubmitter {
    client: Arc<AptosClient>,
    account: LocalAccount,
    config: SubmitConfig,
    /// Next sequence number to use, ahead of the node while transactions
    /// sit in the mempool. Cleared on a failed submission.
    next_sequence: Mutex<Option<u64>>,
}

impl AptosSubmitter {
    /// Creates a new submitter.
    #[must_use]
    pub fn new(client: Arc<AptosClient>, account: LocalAccount, config: SubmitConfig) -> Self {
        Self {
            client,
            account,
            config,
            next_sequence: Mutex::new(None),
        }
    }

    /// Underlying node client.
    #[must_use]
    pub fn client(&self) -> &Arc<AptosClient> {
        &self.client
    }

    async fn gas_unit_price(&self) -> Result<u64, RpcError> {
        match self.config.gas_unit_price {
            Some(price) => Ok(price),
            None => Ok(self.client.estimate_gas_price().await?.gas_estimate),
        }
    }

    async fn build_request(
        &self,
        payload: &TransactionPayload,
        sequence_number: u64,
    ) -> Result<UserTransactionRequest, RpcError> {
        let gas_unit_price = self.gas_unit_price().await?;
        let now = u64::try_from(Utc::now().timestamp()).unwrap_or_default();

        Ok(UserTransactionRequest {
            sender: self.account.address().to_string(),
            sequence_number: sequence_number.to_string(),
            max_gas_amount: self.config.max_gas_amount.to_string(),
            gas_unit_price: gas_unit_price.to_string(),
            expiration_timestamp_secs: (now + self.config.expiration_secs).to_string(),
            payload: payload.clone(),
        })
    }

    /// Encodes, signs and broadcasts with a fixed sequence number.
    async fn sign_and_submit(
        &self,
        payload: &TransactionPayload,
        sequence_number: u64,
    ) -> Result<PendingTransaction, RpcError> {
        let request = self.build_request(payload, sequence_number).await?;
        debug!(
            sender = %request.sender,
            sequence_number = %request.sequence_number,
            function = %payload.function,
            "Encoding transaction"
        );

        let message = self.client.encode_submission(&request).await?;
        let signed = SubmitTransactionRequest {
            request,
            signature: TransactionSignature {
                signature_type: ED25519_SIGNATURE.to_string(),
                public_key: self.account.public_key_hex(),
                signature: self.account.sign(&message),
            },
        };

        let pending = self.client.submit_transaction(&signed).await?;
        info!(hash = %pending.hash, function = %payload.function, "Transaction submitted");
        Ok(pending)
    }
}

#[async_trait]
impl TransactionSubmitter for AptosSubmitter {
    fn sender(&self) -> &str {
        self.account.address()
    }

    async fn submit(&self, payload: &TransactionPayload) -> Result<PendingTransaction, RpcError> {
        let mut next_sequence = self.next_sequence.lock().await;
        let on_chain = self
            .client
            .account(self.account.address())
            .await?
            .sequence_number;
        let sequence_number = (*next_sequence).map_or(on_chain, |local| local.max(on_chain));

        match self.sign_and_submit(payload, sequence_number).await {
            Ok(pending) => {
                *next_sequence = Some(sequence_number + 1);
                Ok(pending)
            }
            Err(e) => {
                *next_sequence = None;
                Err(e)
            }
        }
    }


    async fn wait_for_transaction(&self, hash: &str) -> Result<TransactionResult, RpcError> {
        let timeout = Duration::from_secs(self.config.finality_timeout_secs);
        let interval = Duration::from_millis(self.config.poll_interval_ms);

        let poll = async {
            loop {
                if let Some(txn) = self.client.transaction_by_hash(hash).await?
                    && !txn.is_pending()
                {
                    return Ok::<_, RpcError>(txn.to_result());
                }
                tokio::time::sleep(interval).await;
            }
        };

        let result = tokio::time::timeout(timeout, poll)
            .await
            .map_err(|_| {
                warn!(hash = %hash, timeout_secs = timeout.as_secs(), "Finality timeout");
                RpcError::Timeout {
                    hash: hash.to_string(),
                    secs: timeout.as_secs(),
                }
            })??;

        match result.status {
            TransactionStatus::Committed => {
                info!(hash = %hash, version = ?result.version, gas_used = ?result.gas_used, "Transaction committed");
                Ok(result)
            }
            _ => {
                let vm_status = result.vm_status.unwrap_or_else(|| "unknown".to_string());
                warn!(hash = %hash, vm_status = %vm_status, "Transaction aborted");
                Err(RpcError::Aborted {
                    hash: hash.to_string(),
                    vm_status,
                })
            }
        }
    }
}
