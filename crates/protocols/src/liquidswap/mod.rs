//! Liquidswap protocol adapter.
//!
//! This module provides functionality to interact with Liquidswap pools:
//! - Build swap and liquidity entry-function payloads
//! - Derive curve and LP coin type tags
//! - Decode swap events

/// Swap event decoding.
pub mod events;
/// Entry-function payload builder.
pub mod payload;

pub use events::SwapDetails;
pub use payload::{
    AddLiquidityParams, Operation, PayloadBuilder, RemoveLiquidityParams, SwapParams,
};

use tradebot_domain::Curve;

/// Account holding the Liquidswap v0 modules (mainnet).
pub const MODULES_ACCOUNT: &str =
    "0x190d44266241744264b964a37b8f09863167a12d3e70cda39376cfb4e3561e12";

/// Resource account that owns the LP coin types (mainnet).
pub const RESOURCE_ACCOUNT: &str =
    "0x5a97986a9d031c4567e15b797be516910cfcb4156312482efc6a19c0a30c948";

/// Router module used for every user-facing entry function.
pub const SCRIPTS_MODULE: &str = "scripts_v2";

/// Framework function that opens a `CoinStore` for a coin type.
pub const REGISTER_COIN_FUNCTION: &str = "0x1::managed_coin::register";

/// Deployment addresses and default curve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiquidswapConfig {
    /// Account holding the router and curve modules.
    pub modules_account: String,
    /// Resource account owning the LP coins.
    pub resource_account: String,
    /// Curve used for every operation.
    pub curve: Curve,
}

impl Default for LiquidswapConfig {
    fn default() -> Self {
        Self {
            modules_account: MODULES_ACCOUNT.to_string(),
            resource_account: RESOURCE_ACCOUNT.to_string(),
            curve: Curve::Uncorrelated,
        }
    }
}

impl LiquidswapConfig {
    /// `<modules>::curves::<Curve>`
    #[must_use]
    pub fn curve_type(&self) -> String {
        format!("{}::curves::{}", self.modules_account, self.curve)
    }

    /// `<resource>::lp_coin::LP<X, Y, <curve>>`
    #[must_use]
    pub fn lp_coin_type(&self, coin_x: &str, coin_y: &str) -> String {
        format!(
            "{}::lp_coin::LP<{}, {}, {}>",
            self.resource_account,
            coin_x,
            coin_y,
            self.curve_type()
        )
    }

    /// `<modules>::scripts_v2::<function>`
    #[must_use]
    pub fn script_function(&self, function: &str) -> String {
        format!("{}::{}::{}", self.modules_account, SCRIPTS_MODULE, function)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tags() {
        let config = LiquidswapConfig::default();
        assert_eq!(
            config.curve_type(),
            "0x190d44266241744264b964a37b8f09863167a12d3e70cda39376cfb4e3561e12::curves::Uncorrelated"
        );
        assert_eq!(
            config.lp_coin_type("0x1::aptos_coin::AptosCoin", "0x2::usdc::USDC"),
            "0x5a97986a9d031c4567e15b797be516910cfcb4156312482efc6a19c0a30c948::lp_coin::LP<0x1::aptos_coin::AptosCoin, 0x2::usdc::USDC, 0x190d44266241744264b964a37b8f09863167a12d3e70cda39376cfb4e3561e12::curves::Uncorrelated>"
        );
    }
}
