use serde::{Deserialize, Serialize};

/// Payload discriminator the ledger expects for entry function calls.
pub const ENTRY_FUNCTION_PAYLOAD: &str = "entry_function_payload";

/// Declarative description of an on-chain entry function call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPayload {
    #[serde(rename = "type")]
    pub payload_type: String,
    /// Fully qualified function id, `<address>::<module>::<function>`.
    pub function: String,
    pub type_arguments: Vec<String>,
    /// Numeric arguments as decimal strings.
    pub arguments: Vec<String>,
}

impl TransactionPayload {
    pub fn entry_function(
        function: impl Into<String>,
        type_arguments: Vec<String>,
        arguments: Vec<String>,
    ) -> Self {
        Self {
            payload_type: ENTRY_FUNCTION_PAYLOAD.to_string(),
            function: function.into(),
            type_arguments,
            arguments,
        }
    }

    /// Function name without the module path.
    pub fn function_name(&self) -> &str {
        self.function.rsplit("::").next().unwrap_or(&self.function)
    }
}

/// Finality status of a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    /// Accepted by the node, not yet executed.
    Pending,
    /// Executed and committed successfully.
    Committed,
    /// Executed and aborted on-chain.
    Failed,
}

/// Outcome of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResult {
    pub hash: String,
    pub status: TransactionStatus,
    /// Ledger version the transaction was committed at.
    pub version: Option<u64>,
    pub gas_used: Option<u64>,
    /// VM status message; set once executed.
    pub vm_status: Option<String>,
}

impl TransactionResult {
    pub fn pending(hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            status: TransactionStatus::Pending,
            version: None,
            gas_used: None,
            vm_status: None,
        }
    }

    pub fn is_final(&self) -> bool {
        self.status != TransactionStatus::Pending
    }

    pub fn is_success(&self) -> bool {
        self.status == TransactionStatus::Committed
    }
}
