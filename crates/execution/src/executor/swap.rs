//! Swap pipeline.

use super::SwapExecutor;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;
use tradebot_domain::{
    AlignedReserves, Amount, OperationKind, PoolReserves, SwapQuote, TradeError, TransactionPayload,
    TransactionResult,
};
use tradebot_protocols::liquidswap::SwapParams;

/// A swap request in human units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapRequest {
    /// Coin sold.
    pub from: String,
    /// Coin bought.
    pub to: String,
    /// Amount sold, in whole tokens.
    pub amount: Decimal,
}

/// Everything computed for a swap before it is submitted.
#[derive(Debug, Clone, Serialize)]
pub struct SwapPlan {
    /// Pool in registry order.
    #[serde(skip)]
    pub pool: PoolReserves,
    /// Reserves oriented along the trade.
    #[serde(skip)]
    pub reserves: AlignedReserves,
    /// Priced trade.
    pub quote: SwapQuote,
    /// Entry-function call.
    pub payload: TransactionPayload,
}

impl SwapPlan {
    /// Expected output in whole tokens of the bought coin.
    pub fn expected_out(&self) -> Option<Decimal> {
        Amount::new(self.quote.amount_out, self.reserves.token_out.decimals)
            .to_decimal()
    }

    /// Minimum output in whole tokens of the bought coin.
    pub fn minimum_out(&self) -> Option<Decimal> {
        Amount::new(self.quote.min_amount_out, self.reserves.token_out.decimals)
            .to_decimal()
    }
}

/// Outcome of a swap; `result` is `None` in dry run mode.
#[derive(Debug, Clone)]
pub struct SwapReceipt {
    /// Plan that was executed.
    pub plan: SwapPlan,
    /// Finalized transaction.
    pub result: Option<TransactionResult>,
}

impl SwapExecutor {
    /// Prices a swap against fresh reserves and builds its payload.
    ///
    /// Fails with `InsufficientReserves` before any payload is built when
    /// the pool cannot cover the amount.
    pub async fn quote(&self, request: &SwapRequest) -> Result<SwapPlan, TradeError> {
        let found = self.fetch_pool(&request.from, &request.to).await?;
        let quote = SwapQuote::for_reserves(&found.aligned, request.amount, self.config.slippage)?;

        let payload = self.builder.swap(&SwapParams {
            from: found.aligned.token_in.type_tag.clone(),
            to: found.aligned.token_out.type_tag.clone(),
            amount_in: quote.amount_in_raw,
            min_amount_out: quote.min_amount_out,
        });

        info!(
            from = %found.aligned.token_in,
            to = %found.aligned.token_out,
            amount_in = %quote.amount_in_raw,
            amount_out = %quote.amount_out,
            min_amount_out = %quote.min_amount_out,
            "Swap quoted"
        );

        Ok(SwapPlan {
            pool: found.pool,
            reserves: found.aligned,
            quote,
            payload,
        })
    }

    /// Quotes, submits and waits for the swap to finalize.
    pub async fn swap(&self, request: &SwapRequest) -> Result<SwapReceipt, TradeError> {
        let plan = self.quote(request).await?;
        let result = self.submit(OperationKind::Swap, &plan.payload).await?;
        Ok(SwapReceipt { plan, result })
    }
}
