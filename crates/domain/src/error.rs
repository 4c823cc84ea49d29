use thiserror::Error;

/// Failure kinds surfaced to whoever asked for a trade, quote or login.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TradeError {
    /// No registered pool holds both tokens.
    #[error("Liquidity pool not found for {from} / {to}")]
    PoolNotFound { from: String, to: String },
    /// The pool cannot absorb the requested input.
    #[error("Insufficient reserves in the pool for the swap: requested {requested}, available {available}")]
    InsufficientReserves { requested: String, available: String },
    /// Chat input that does not parse into a known command.
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
    /// Signing, broadcast, on-chain abort or finality timeout.
    #[error("Transaction submission failed: {0}")]
    SubmissionFailed(String),
    /// OAuth or wallet-service login failed.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),
    /// A human amount that has no raw-unit representation.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    /// The pool registry could not be read.
    #[error("Liquidity registry unavailable: {0}")]
    RegistryUnavailable(String),
}

impl TradeError {
    /// Short machine-friendly name of the failure kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PoolNotFound { .. } => "pool_not_found",
            Self::InsufficientReserves { .. } => "insufficient_reserves",
            Self::InvalidCommand(_) => "invalid_command",
            Self::SubmissionFailed(_) => "submission_failed",
            Self::AuthenticationFailed(_) => "authentication_failed",
            Self::InvalidAmount(_) => "invalid_amount",
            Self::RegistryUnavailable(_) => "registry_unavailable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_are_human_readable() {
        let err = TradeError::PoolNotFound {
            from: "0x1::aptos_coin::AptosCoin".to_string(),
            to: "0x1::fake::Coin".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Liquidity pool not found for 0x1::aptos_coin::AptosCoin / 0x1::fake::Coin"
        );
        assert_eq!(err.kind(), "pool_not_found");

        let err = TradeError::InvalidCommand("amount must be a number".to_string());
        assert_eq!(err.to_string(), "Invalid command: amount must be a number");
    }
}
