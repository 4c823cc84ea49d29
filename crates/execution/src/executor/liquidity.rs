//! Liquidity pipelines.

use super::SwapExecutor;
use primitive_types::U256;
use rust_decimal::Decimal;
use tracing::info;
use tradebot_domain::{
    Amount, OperationKind, PoolReserves, TradeError, TransactionPayload, TransactionResult,
};
use tradebot_protocols::liquidswap::{AddLiquidityParams, RemoveLiquidityParams};

/// Deposit into a pool, amounts in whole tokens. The pair may be given in
/// either order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddLiquidityRequest {
    pub coin_a: String,
    pub coin_b: String,
    pub amount_a: Decimal,
    pub amount_b: Decimal,
}

/// Burn LP coins, all amounts in raw units. Minimums follow `coin_a`/`coin_b`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveLiquidityRequest {
    pub coin_a: String,
    pub coin_b: String,
    pub lp_amount: U256,
    pub min_amount_a: U256,
    pub min_amount_b: U256,
}

/// Outcome of a liquidity operation; `result` is `None` in dry run mode.
#[derive(Debug, Clone)]
pub struct LiquidityReceipt {
    pub kind: OperationKind,
    /// Pool in registry order.
    pub pool: PoolReserves,
    pub payload: TransactionPayload,
    pub result: Option<TransactionResult>,
}

impl SwapExecutor {
    /// Deposits both sides of a pool. Each minimum is the desired amount
    /// less the configured slippage.
    pub async fn add_liquidity(
        &self,
        request: &AddLiquidityRequest,
    ) -> Result<LiquidityReceipt, TradeError> {
        let found = self.fetch_pool(&request.coin_a, &request.coin_b).await?;
        let pool = found.pool;

        let (amount_x, amount_y) = if pool.coin_x.is(&request.coin_a) {
            (request.amount_a, request.amount_b)
        } else {
            (request.amount_b, request.amount_a)
        };
        let raw_x = positive_raw(amount_x, pool.coin_x.decimals)?;
        let raw_y = positive_raw(amount_y, pool.coin_y.decimals)?;

        let payload = self.builder.add_liquidity(&AddLiquidityParams {
            coin_x: pool.coin_x.type_tag.clone(),
            coin_y: pool.coin_y.type_tag.clone(),
            amount_x: raw_x,
            min_amount_x: self.config.slippage.apply(raw_x),
            amount_y: raw_y,
            min_amount_y: self.config.slippage.apply(raw_y),
        });

        info!(
            coin_x = %pool.coin_x,
            coin_y = %pool.coin_y,
            amount_x = %raw_x,
            amount_y = %raw_y,
            "Adding liquidity"
        );

        let result = self.submit(OperationKind::AddLiquidity, &payload).await?;
        Ok(LiquidityReceipt {
            kind: OperationKind::AddLiquidity,
            pool,
            payload,
            result,
        })
    }

    /// Burns LP coins for the underlying pair.
    pub async fn remove_liquidity(
        &self,
        request: &RemoveLiquidityRequest,
    ) -> Result<LiquidityReceipt, TradeError> {
        if request.lp_amount.is_zero() {
            return Err(TradeError::InvalidAmount(
                "LP amount must be greater than zero".to_string(),
            ));
        }

        let found = self.fetch_pool(&request.coin_a, &request.coin_b).await?;
        let pool = found.pool;

        let (min_amount_x, min_amount_y) = if pool.coin_x.is(&request.coin_a) {
            (request.min_amount_a, request.min_amount_b)
        } else {
            (request.min_amount_b, request.min_amount_a)
        };

        let payload = self.builder.remove_liquidity(&RemoveLiquidityParams {
            coin_x: pool.coin_x.type_tag.clone(),
            coin_y: pool.coin_y.type_tag.clone(),
            lp_amount: request.lp_amount,
            min_amount_x,
            min_amount_y,
        });

        info!(
            coin_x = %pool.coin_x,
            coin_y = %pool.coin_y,
            lp_amount = %request.lp_amount,
            "Removing liquidity"
        );

        let result = self.submit(OperationKind::RemoveLiquidity, &payload).await?;
        Ok(LiquidityReceipt {
            kind: OperationKind::RemoveLiquidity,
            pool,
            payload,
            result,
        })
    }
}

fn positive_raw(amount: Decimal, decimals: u8) -> Result<U256, TradeError> {
    let raw = Amount::from_decimal(amount, decimals)?;
    if raw.is_zero() {
        return Err(TradeError::InvalidAmount(format!(
            "{amount} must be greater than zero"
        )));
    }
    Ok(raw.raw)
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::super::{ExecutorConfig, SwapExecutor};
    use super::*;
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use tradebot_protocols::PayloadBuilder;

    fn executor(submitter: Arc<RecordingSubmitter>) -> SwapExecutor {
        SwapExecutor::new(
            Arc::new(StaticRegistry::apt_usdc()),
            submitter,
            PayloadBuilder::default(),
            ExecutorConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_add_liquidity_in_pool_order() {
        let submitter = Arc::new(RecordingSubmitter::new(Outcome::Commit));
        let exec = executor(submitter.clone());

        // pair given as (USDC, APT); the pool is (APT, USDC)
        let receipt = exec
            .add_liquidity(&AddLiquidityRequest {
                coin_a: USDC.to_string(),
                coin_b: APT.to_string(),
                amount_a: dec!(2),
                amount_b: dec!(1),
            })
            .await
            .unwrap();

        assert_eq!(receipt.payload.type_arguments[0], APT);
        assert_eq!(receipt.payload.type_arguments[1], USDC);
        // 1 APT = 1e8, 0.5% off = 99500000; 2 USDC = 2e6, 0.5% off = 1990000
        assert_eq!(
            receipt.payload.arguments,
            vec!["100000000", "99500000", "2000000", "1990000"]
        );
        assert!(receipt.result.is_some());
        assert_eq!(submitter.submitted().len(), 1);
    }

    #[tokio::test]
    async fn test_add_liquidity_rejects_zero() {
        let submitter = Arc::new(RecordingSubmitter::new(Outcome::Commit));
        let exec = executor(submitter.clone());

        let err = exec
            .add_liquidity(&AddLiquidityRequest {
                coin_a: APT.to_string(),
                coin_b: USDC.to_string(),
                amount_a: dec!(1),
                amount_b: dec!(0),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, TradeError::InvalidAmount(_)));
        assert!(submitter.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_remove_liquidity_carries_caller_minimums() {
        let exec = executor(Arc::new(RecordingSubmitter::new(Outcome::Commit)));

        let receipt = exec
            .remove_liquidity(&RemoveLiquidityRequest {
                coin_a: USDC.to_string(),
                coin_b: APT.to_string(),
                lp_amount: U256::from(6_847u64),
                min_amount_a: U256::from(20u64),
                min_amount_b: U256::from(10u64),
            })
            .await
            .unwrap();

        assert_eq!(receipt.kind, OperationKind::RemoveLiquidity);
        assert!(receipt.payload.function.ends_with("::scripts_v2::remove_liquidity"));
        // minimums swapped into (APT, USDC) order
        assert_eq!(receipt.payload.arguments, vec!["6847", "10", "20"]);
    }

    #[tokio::test]
    async fn test_remove_liquidity_rejects_zero_lp() {
        let exec = executor(Arc::new(RecordingSubmitter::new(Outcome::Commit)));

        let err = exec
            .remove_liquidity(&RemoveLiquidityRequest {
                coin_a: APT.to_string(),
                coin_b: USDC.to_string(),
                lp_amount: U256::zero(),
                min_amount_a: U256::zero(),
                min_amount_b: U256::zero(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, TradeError::InvalidAmount(_)));
    }
}
