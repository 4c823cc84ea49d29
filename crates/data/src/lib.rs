//! Market data access for the trade bot.
//!
//! This crate reads pool state from the Liquidswap liquidity registry:
//! - Registered pool records with both reserves
//! - Order-insensitive lookup of a trading pair
//! - Reserve alignment along the direction of a trade

/// Liquidity registry clients.
pub mod registry;

pub use registry::{
    CoinRecord, LiquidityRegistry, LiquidswapRegistry, PoolMatch, PoolRecord, RegistryConfig,
    RegistryError, find_pool,
};
