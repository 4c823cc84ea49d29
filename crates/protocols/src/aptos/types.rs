//! Fullnode REST wire types.
//!
//! The node encodes 64-bit integers as decimal strings.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tradebot_domain::{TransactionPayload, TransactionResult, TransactionStatus};

/// `GET /` ledger summary.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerInfo {
    /// Chain id (1 = mainnet).
    pub chain_id: u8,
    /// Latest ledger version.
    #[serde(deserialize_with = "u64_from_str")]
    pub ledger_version: u64,
    /// Ledger timestamp in microseconds.
    #[serde(deserialize_with = "u64_from_str")]
    pub ledger_timestamp: u64,
}

/// `GET /accounts/{address}`
#[derive(Debug, Clone, Deserialize)]
pub struct AccountData {
    /// Next sequence number.
    #[serde(deserialize_with = "u64_from_str")]
    pub sequence_number: u64,
    /// Authentication key.
    pub authentication_key: String,
}

/// `GET /estimate_gas_price`
#[derive(Debug, Clone, Deserialize)]
pub struct GasEstimation {
    /// Current estimate, in octas per gas unit.
    pub gas_estimate: u64,
    /// Estimate for low-priority transactions.
    #[serde(default)]
    pub deprioritized_gas_estimate: Option<u64>,
    /// Estimate for high-priority transactions.
    #[serde(default)]
    pub prioritized_gas_estimate: Option<u64>,
}

/// One Move resource stored under an account.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountResource {
    /// Resource type tag.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Resource fields.
    pub data: Value,
}

/// Event handle id.
#[derive(Debug, Clone, Deserialize)]
pub struct EventGuid {
    /// Creation number of the handle.
    #[serde(deserialize_with = "u64_from_str")]
    pub creation_number: u64,
    /// Account owning the handle.
    pub account_address: String,
}

/// An emitted event.
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    /// Ledger version of the emitting transaction.
    #[serde(default, deserialize_with = "opt_u64_from_str")]
    pub version: Option<u64>,
    /// Handle id.
    pub guid: EventGuid,
    /// Position in the handle's stream.
    #[serde(deserialize_with = "u64_from_str")]
    pub sequence_number: u64,
    /// Event type tag.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Event fields.
    pub data: Value,
}

/// Unsigned transaction body, as sent to `encode_submission`.
#[derive(Debug, Clone, Serialize)]
pub struct UserTransactionRequest {
    /// Sender address.
    pub sender: String,
    /// Sender sequence number.
    pub sequence_number: String,
    /// Gas limit.
    pub max_gas_amount: String,
    /// Octas per gas unit.
    pub gas_unit_price: String,
    /// Expiry as a Unix timestamp.
    pub expiration_timestamp_secs: String,
    /// Entry function call.
    pub payload: TransactionPayload,
}

/// Ed25519 signature block of a submitted transaction.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionSignature {
    /// Always `ed25519_signature`.
    #[serde(rename = "type")]
    pub signature_type: String,
    /// `0x`-prefixed public key.
    pub public_key: String,
    /// `0x`-prefixed signature.
    pub signature: String,
}

/// Signed transaction body for `POST /transactions`.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitTransactionRequest {
    /// Unsigned fields.
    #[serde(flatten)]
    pub request: UserTransactionRequest,
    /// Signature over the encoded request.
    pub signature: TransactionSignature,
}

/// Node acknowledgement of a submission.
#[derive(Debug, Clone, Deserialize)]
pub struct PendingTransaction {
    /// Transaction hash.
    pub hash: String,
    /// Sender address.
    #[serde(default)]
    pub sender: Option<String>,
    /// Sender sequence number.
    #[serde(default, deserialize_with = "opt_u64_from_str")]
    pub sequence_number: Option<u64>,
}

/// `GET /transactions/by_hash/{hash}`, pending or executed.
#[derive(Debug, Clone, Deserialize)]
pub struct Transaction {
    /// `pending_transaction`, `user_transaction`, ...
    #[serde(rename = "type")]
    pub kind: String,
    /// Transaction hash.
    pub hash: String,
    /// Committed version.
    #[serde(default, deserialize_with = "opt_u64_from_str")]
    pub version: Option<u64>,
    /// Execution outcome.
    #[serde(default)]
    pub success: Option<bool>,
    /// VM status message.
    #[serde(default)]
    pub vm_status: Option<String>,
    /// Gas used.
    #[serde(default, deserialize_with = "opt_u64_from_str")]
    pub gas_used: Option<u64>,
    /// Sender address.
    #[serde(default)]
    pub sender: Option<String>,
    /// Raw payload.
    #[serde(default)]
    pub payload: Option<Value>,
    /// Emitted events.
    #[serde(default)]
    pub events: Vec<Event>,
}

impl Transaction {
    /// Whether the node has not executed the transaction yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.kind == "pending_transaction"
    }

    /// Finality view of the transaction.
    #[must_use]
    pub fn to_result(&self) -> TransactionResult {
        let status = match (self.is_pending(), self.success) {
            (true, _) => TransactionStatus::Pending,
            (false, Some(true)) => TransactionStatus::Committed,
            (false, _) => TransactionStatus::Failed,
        };
        TransactionResult {
            hash: self.hash.clone(),
            status,
            version: self.version,
            gas_used: self.gas_used,
            vm_status: self.vm_status.clone(),
        }
    }

    /// Decodes the payload when it is an entry function call.
    #[must_use]
    pub fn entry_function(&self) -> Option<TransactionPayload> {
        let payload = self.payload.as_ref()?;
        let function = payload.get("function")?.as_str()?;
        let strings = |key: &str| -> Vec<String> {
            payload
                .get(key)
                .and_then(Value::as_array)
                .map(|values| values.iter().map(value_to_string).collect())
                .unwrap_or_default()
        };
        Some(TransactionPayload::entry_function(
            function,
            strings("type_arguments"),
            strings("arguments"),
        ))
    }

    /// Human-oriented digest of an executed transaction.
    #[must_use]
    pub fn summary(&self) -> TransactionSummary {
        let call = self.entry_function();
        TransactionSummary {
            hash: self.hash.clone(),
            sender: self.sender.clone(),
            version: self.version,
            success: self.success,
            is_swap: call
                .as_ref()
                .is_some_and(|c| c.function_name().contains("swap")),
            function: call.as_ref().map(|c| c.function.clone()),
            type_arguments: call
                .as_ref()
                .map(|c| c.type_arguments.clone())
                .unwrap_or_default(),
            arguments: call.map(|c| c.arguments).unwrap_or_default(),
        }
    }
}

/// Digest of a transaction's call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionSummary {
    /// Transaction hash.
    pub hash: String,
    /// Sender address.
    pub sender: Option<String>,
    /// Committed version.
    pub version: Option<u64>,
    /// Execution outcome.
    pub success: Option<bool>,
    /// Whether the called function is a swap.
    pub is_swap: bool,
    /// Called function id.
    pub function: Option<String>,
    /// Type arguments of the call.
    pub type_arguments: Vec<String>,
    /// Arguments of the call.
    pub arguments: Vec<String>,
}

pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn u64_from_str<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

fn opt_u64_from_str<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    u64_from_str(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_committed_transaction() {
        let txn: Transaction = serde_json::from_value(serde_json::json!({
            "type": "user_transaction",
            "hash": "0xabc",
            "version": "1234",
            "success": true,
            "vm_status": "Executed successfully",
            "gas_used": "512",
            "sender": "0x1",
            "payload": {
                "type": "entry_function_payload",
                "function": "0x190d::scripts_v2::swap",
                "type_arguments": ["0x1::aptos_coin::AptosCoin", "0x2::usdc::USDC", "0x190d::curves::Uncorrelated"],
                "arguments": ["100000000", 9899]
            },
            "events": []
        }))
        .unwrap();

        let result = txn.to_result();
        assert_eq!(result.status, TransactionStatus::Committed);
        assert_eq!(result.version, Some(1234));
        assert_eq!(result.gas_used, Some(512));

        let summary = txn.summary();
        assert!(summary.is_swap);
        assert_eq!(summary.arguments, vec!["100000000", "9899"]);
        assert_eq!(summary.type_arguments.len(), 3);
    }

    #[test]
    fn test_pending_and_failed_transactions() {
        let pending: Transaction = serde_json::from_value(serde_json::json!({
            "type": "pending_transaction",
            "hash": "0xabc"
        }))
        .unwrap();
        assert!(pending.is_pending());
        assert_eq!(pending.to_result().status, TransactionStatus::Pending);

        let failed: Transaction = serde_json::from_value(serde_json::json!({
            "type": "user_transaction",
            "hash": "0xdef",
            "version": "7",
            "success": false,
            "vm_status": "Move abort in 0x190d::router: ERR_COIN_OUT_NUM_LESS_THAN_EXPECTED_MINIMUM(0x130)"
        }))
        .unwrap();
        assert_eq!(failed.to_result().status, TransactionStatus::Failed);
        assert!(!failed.summary().is_swap);
    }
}
