//! Aptos fullnode adapter.
//!
//! This module provides functionality to interact with an Aptos fullnode:
//! - Read accounts, resources, events and transactions
//! - Sign transactions with a local ed25519 key
//! - Submit entry-function payloads and wait for finality

/// Local signing account.
pub mod account;
/// REST client.
pub mod rpc;
/// Transaction submitter.
pub mod submitter;
/// Wire types.
pub mod types;

pub use account::LocalAccount;
pub use rpc::{AptosClient, CoinEventHandles, NodeConfig};
pub use submitter::{AptosSubmitter, SubmitConfig, TransactionSubmitter};
pub use types::{Event, PendingTransaction, Transaction, TransactionSummary};

use tradebot_domain::TradeError;

/// Errors from the fullnode or from local signing.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// Transport failure.
    #[error("Node request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The node rejected the request.
    #[error("Node returned HTTP {status}: {message}")]
    Api {
        /// HTTP status.
        status: u16,
        /// Error message reported by the node.
        message: String,
    },
    /// Response body did not match the expected shape.
    #[error("Malformed node response: {0}")]
    Decode(String),
    /// Unusable private key.
    #[error("Invalid private key: {0}")]
    InvalidKey(String),
    /// A resource the call depends on does not exist.
    #[error("Resource not found: {0}")]
    MissingResource(String),
    /// Finality was not observed in time.
    #[error("Transaction {hash} not finalized within {secs}s")]
    Timeout {
        /// Transaction hash.
        hash: String,
        /// Timeout that elapsed.
        secs: u64,
    },
    /// The transaction executed and aborted.
    #[error("Transaction {hash} failed: {vm_status}")]
    Aborted {
        /// Transaction hash.
        hash: String,
        /// VM status reported by the node.
        vm_status: String,
    },
}

impl From<RpcError> for TradeError {
    fn from(err: RpcError) -> Self {
        TradeError::SubmissionFailed(err.to_string())
    }
}
