//! Liquidity registry access.
//!
//! The registry is the only source of pool reserves. Every lookup goes to
//! the network; nothing is cached between calls.

mod liquidswap;
mod record;

pub use liquidswap::{LiquidswapRegistry, RegistryConfig};
pub use record::{CoinRecord, PoolRecord};

use async_trait::async_trait;
use tradebot_domain::entities::{AlignedReserves, PoolReserves};
use tradebot_domain::{Curve, TradeError};

/// Registry errors.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// No registered pool holds the requested pair.
    #[error("Liquidity pool not found for {from} / {to}")]
    PoolNotFound {
        /// Input token type tag.
        from: String,
        /// Output token type tag.
        to: String,
    },
    /// Transport failure.
    #[error("Registry request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-success HTTP status.
    #[error("Registry returned HTTP {0}")]
    Status(u16),
    /// Response body did not match the expected shape.
    #[error("Malformed registry response: {0}")]
    Decode(String),
}

impl From<RegistryError> for TradeError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::PoolNotFound { from, to } => TradeError::PoolNotFound { from, to },
            other => TradeError::RegistryUnavailable(other.to_string()),
        }
    }
}

/// A registry pool matched against a requested pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolMatch {
    /// The pool in its registry orientation (X, Y).
    pub pool: PoolReserves,
    /// The same reserves oriented along the trade.
    pub aligned: AlignedReserves,
}

/// Source of registered pool records.
#[async_trait]
pub trait LiquidityRegistry: Send + Sync {
    /// Fetches every registered pool.
    async fn registered_pools(&self) -> Result<Vec<PoolRecord>, RegistryError>;

    /// Fetches a fresh snapshot and returns the pool trading `from` against
    /// `to` on `curve`, with reserves aligned to the requested sides.
    async fn pool_reserves(
        &self,
        from: &str,
        to: &str,
        curve: Curve,
    ) -> Result<PoolMatch, RegistryError> {
        let records = self.registered_pools().await?;
        find_pool(&records, from, to, curve)
    }
}

/// Finds the pool trading `from` against `to`, in either order.
///
/// Records that declare a different curve are skipped; records without a
/// curve are accepted.
pub fn find_pool(
    records: &[PoolRecord],
    from: &str,
    to: &str,
    curve: Curve,
) -> Result<PoolMatch, RegistryError> {
    records
        .iter()
        .filter(|record| record.curve_matches(curve))
        .map(PoolRecord::to_reserves)
        .find_map(|pool| {
            pool.align(from, to)
                .map(|aligned| PoolMatch { pool, aligned })
        })
        .ok_or_else(|| RegistryError::PoolNotFound {
            from: from.to_string(),
            to: to.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitive_types::U256;

    const APT: &str = "0x1::aptos_coin::AptosCoin";
    const USDC: &str = "0x5e156f1207d0ebfa19a9eeff00d62a282278fb8719f4fab3a586a0a2c0fffbea::coin::T";

    fn records() -> Vec<PoolRecord> {
        serde_json::from_str(&serde_json::json!([
            {
                "coinX": { "type": "0x1::other::Coin", "reserve": "1", "decimals": 6 },
                "coinY": { "type": USDC, "reserve": "2", "decimals": 6 }
            },
            {
                "coinX": { "type": APT, "reserve": "10000", "decimals": 8 },
                "coinY": { "type": USDC, "reserve": 9950, "decimals": 6 },
                "curve": "0x190d44266241744264b964a37b8f09863167a12d3e70cda39376cfb4e3561e12::curves::Uncorrelated"
            }
        ]).to_string())
        .unwrap()
    }

    #[test]
    fn test_find_pool_both_directions() {
        let records = records();

        let forward = find_pool(&records, APT, USDC, Curve::Uncorrelated).unwrap();
        assert_eq!(forward.aligned.reserve_in, U256::from(10_000u64));
        assert_eq!(forward.aligned.reserve_out, U256::from(9_950u64));

        let backward = find_pool(&records, USDC, APT, Curve::Uncorrelated).unwrap();
        assert_eq!(backward.aligned.reserve_in, U256::from(9_950u64));
        assert_eq!(backward.aligned.reserve_out, U256::from(10_000u64));
        assert_eq!(backward.pool, forward.pool);
    }

    #[test]
    fn test_find_pool_not_found() {
        let err = find_pool(&records(), APT, "0x1::missing::Coin", Curve::Uncorrelated).unwrap_err();
        assert!(matches!(err, RegistryError::PoolNotFound { .. }));

        let trade: TradeError = err.into();
        assert!(matches!(trade, TradeError::PoolNotFound { .. }));
    }

    #[test]
    fn test_find_pool_filters_curve() {
        let err = find_pool(&records(), APT, USDC, Curve::Stable).unwrap_err();
        assert!(matches!(err, RegistryError::PoolNotFound { .. }));
    }
}
