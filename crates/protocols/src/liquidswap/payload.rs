//! Entry-function payload builder for Liquidswap.
//!
//! Pure functions: every operation maps to one `TransactionPayload` with
//! type arguments `[X, Y, Curve]` and decimal-string arguments.

use super::{LiquidswapConfig, REGISTER_COIN_FUNCTION};
use primitive_types::U256;
use tradebot_domain::{OperationKind, TransactionPayload};

/// Parameters for a swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapParams {
    /// Coin sold.
    pub from: String,
    /// Coin bought.
    pub to: String,
    /// Exact input in raw units.
    pub amount_in: U256,
    /// Minimum accepted output in raw units.
    pub min_amount_out: U256,
}

/// Parameters for adding liquidity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddLiquidityParams {
    /// X coin of the pool.
    pub coin_x: String,
    /// Y coin of the pool.
    pub coin_y: String,
    /// Desired X deposit.
    pub amount_x: U256,
    /// Minimum X actually deposited.
    pub min_amount_x: U256,
    /// Desired Y deposit.
    pub amount_y: U256,
    /// Minimum Y actually deposited.
    pub min_amount_y: U256,
}

/// Parameters for removing liquidity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveLiquidityParams {
    /// X coin of the pool.
    pub coin_x: String,
    /// Y coin of the pool.
    pub coin_y: String,
    /// LP coins to burn.
    pub lp_amount: U256,
    /// Minimum X returned.
    pub min_amount_x: U256,
    /// Minimum Y returned.
    pub min_amount_y: U256,
}

/// An operation the builder can express.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Swap an exact input.
    Swap(SwapParams),
    /// Deposit both sides of a pool.
    AddLiquidity(AddLiquidityParams),
    /// Burn LP coins.
    RemoveLiquidity(RemoveLiquidityParams),
    /// Open a `CoinStore` for a coin type.
    RegisterCoin {
        /// Coin type tag.
        coin_type: String,
    },
}

impl Operation {
    /// Kind of the operation.
    #[must_use]
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Swap(_) => OperationKind::Swap,
            Self::AddLiquidity(_) => OperationKind::AddLiquidity,
            Self::RemoveLiquidity(_) => OperationKind::RemoveLiquidity,
            Self::RegisterCoin { .. } => OperationKind::RegisterCoin,
        }
    }
}

/// Builds Liquidswap payloads for one deployment.
#[derive(Debug, Clone, Default)]
pub struct PayloadBuilder {
    config: LiquidswapConfig,
}

impl PayloadBuilder {
    /// Creates a builder for the given deployment.
    #[must_use]
    pub fn new(config: LiquidswapConfig) -> Self {
        Self { config }
    }

    /// Deployment this builder targets.
    #[must_use]
    pub fn config(&self) -> &LiquidswapConfig {
        &self.config
    }

    /// Maps an operation to its payload.
    #[must_use]
    pub fn build(&self, operation: &Operation) -> TransactionPayload {
        match operation {
            Operation::Swap(params) => self.swap(params),
            Operation::AddLiquidity(params) => self.add_liquidity(params),
            Operation::RemoveLiquidity(params) => self.remove_liquidity(params),
            Operation::RegisterCoin { coin_type } => Self::register_coin(coin_type),
        }
    }

    /// `scripts_v2::swap<From, To, Curve>(coin_val, coin_out_min_val)`
    #[must_use]
    pub fn swap(&self, params: &SwapParams) -> TransactionPayload {
        TransactionPayload::entry_function(
            self.config.script_function(OperationKind::Swap.as_str()),
            self.type_arguments(&params.from, &params.to),
            vec![params.amount_in.to_string(), params.min_amount_out.to_string()],
        )
    }

    /// `scripts_v2::add_liquidity<X, Y, Curve>(x, x_min, y, y_min)`
    #[must_use]
    pub fn add_liquidity(&self, params: &AddLiquidityParams) -> TransactionPayload {
        TransactionPayload::entry_function(
            self.config
                .script_function(OperationKind::AddLiquidity.as_str()),
            self.type_arguments(&params.coin_x, &params.coin_y),
            vec![
                params.amount_x.to_string(),
                params.min_amount_x.to_string(),
                params.amount_y.to_string(),
                params.min_amount_y.to_string(),
            ],
        )
    }

    /// `scripts_v2::remove_liquidity<X, Y, Curve>(lp_val, min_x_out, min_y_out)`
    #[must_use]
    pub fn remove_liquidity(&self, params: &RemoveLiquidityParams) -> TransactionPayload {
        TransactionPayload::entry_function(
            self.config
                .script_function(OperationKind::RemoveLiquidity.as_str()),
            self.type_arguments(&params.coin_x, &params.coin_y),
            vec![
                params.lp_amount.to_string(),
                params.min_amount_x.to_string(),
                params.min_amount_y.to_string(),
            ],
        )
    }

    /// `0x1::managed_coin::register<Coin>()`
    #[must_use]
    pub fn register_coin(coin_type: &str) -> TransactionPayload {
        TransactionPayload::entry_function(
            REGISTER_COIN_FUNCTION,
            vec![coin_type.to_string()],
            Vec::new(),
        )
    }

    fn type_arguments(&self, coin_x: &str, coin_y: &str) -> Vec<String> {
        vec![
            coin_x.to_string(),
            coin_y.to_string(),
            self.config.curve_type(),
        ]
    }
}
