//! Trade pipeline: fetch reserves, quote, build, submit, await finality.

mod liquidity;
mod swap;

pub use liquidity::{AddLiquidityRequest, LiquidityReceipt, RemoveLiquidityRequest};
pub use swap::{SwapPlan, SwapReceipt, SwapRequest};

use std::sync::Arc;
use tracing::{debug, info};
use tradebot_data::{LiquidityRegistry, PoolMatch};
use tradebot_domain::{OperationKind, Slippage, TradeError, TransactionPayload, TransactionResult};
use tradebot_protocols::{PayloadBuilder, TransactionSubmitter};

/// Configuration for trade execution.
#[derive(Debug, Clone, Default)]
pub struct ExecutorConfig {
    /// Slippage tolerance applied to every minimum output.
    pub slippage: Slippage,
    /// Dry run mode - build payloads but don't submit.
    pub dry_run: bool,
}

/// Runs swaps and liquidity operations for one account.
///
/// Every call re-reads the registry; nothing is cached between calls.
pub struct SwapExecutor {
    /// Pool registry.
    registry: Arc<dyn LiquidityRegistry>,
    /// Ledger submitter; `None` for a quote-only executor.
    submitter: Option<Arc<dyn TransactionSubmitter>>,
    /// Payload builder for the configured deployment.
    builder: PayloadBuilder,
    /// Configuration.
    config: ExecutorConfig,
}

impl SwapExecutor {
    /// Creates a new executor.
    pub fn new(
        registry: Arc<dyn LiquidityRegistry>,
        submitter: Arc<dyn TransactionSubmitter>,
        builder: PayloadBuilder,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            registry,
            submitter: Some(submitter),
            builder,
            config,
        }
    }

    /// Creates an executor without a signing account.
    ///
    /// Quotes and dry runs work; anything that would submit fails with
    /// `SubmissionFailed`.
    pub fn read_only(
        registry: Arc<dyn LiquidityRegistry>,
        builder: PayloadBuilder,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            registry,
            submitter: None,
            builder,
            config,
        }
    }

    /// Enables or disables dry run mode.
    pub fn set_dry_run(&mut self, dry_run: bool) {
        self.config.dry_run = dry_run;
    }

    /// Gets the configuration.
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Gets the payload builder.
    pub fn builder(&self) -> &PayloadBuilder {
        &self.builder
    }

    /// Address transactions are sent from, if a signer is configured.
    pub fn sender(&self) -> Option<&str> {
        self.submitter.as_deref().map(|s| s.sender())
    }

    /// LP coin type of the pool trading `coin_a` against `coin_b`, in the
    /// pool's own X/Y order.
    pub async fn lp_coin_type(&self, coin_a: &str, coin_b: &str) -> Result<String, TradeError> {
        let found = self.fetch_pool(coin_a, coin_b).await?;
        Ok(self
            .builder
            .config()
            .lp_coin_type(&found.pool.coin_x.type_tag, &found.pool.coin_y.type_tag))
    }

    /// Opens a `CoinStore` for `coin_type` on the sender's account.
    pub async fn register_coin(
        &self,
        coin_type: &str,
    ) -> Result<Option<TransactionResult>, TradeError> {
        let payload = PayloadBuilder::register_coin(coin_type);
        self.submit(OperationKind::RegisterCoin, &payload).await
    }

    async fn fetch_pool(&self, from: &str, to: &str) -> Result<PoolMatch, TradeError> {
        let curve = self.builder.config().curve;
        let found = self.registry.pool_reserves(from, to, curve).await?;
        debug!(
            coin_x = %found.pool.coin_x,
            coin_y = %found.pool.coin_y,
            reserve_x = %found.pool.reserve_x,
            reserve_y = %found.pool.reserve_y,
            "Fetched pool reserves"
        );
        Ok(found)
    }

    /// Submits and waits, or skips submission in dry run mode.
    async fn submit(
        &self,
        kind: OperationKind,
        payload: &TransactionPayload,
    ) -> Result<Option<TransactionResult>, TradeError> {
        debug!(
            function = %payload.function,
            type_arguments = ?payload.type_arguments,
            arguments = ?payload.arguments,
            "Built payload"
        );

        if self.config.dry_run {
            info!(operation = kind.as_str(), "Dry run, skipping submission");
            return Ok(None);
        }

        let Some(submitter) = &self.submitter else {
            return Err(TradeError::SubmissionFailed(
                "no signing account configured".to_string(),
            ));
        };

        let result = submitter.submit_and_wait(payload).await?;
        info!(
            operation = kind.as_str(),
            hash = %result.hash,
            version = ?result.version,
            "Transaction finalized"
        );
        Ok(Some(result))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory registry and submitter.

    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tradebot_data::{LiquidityRegistry, PoolRecord, RegistryError};
    use tradebot_domain::{TransactionPayload, TransactionResult, TransactionStatus};
    use tradebot_protocols::aptos::PendingTransaction;
    use tradebot_protocols::{RpcError, TransactionSubmitter};

    pub const APT: &str = "0x1::aptos_coin::AptosCoin";
    pub const USDC: &str =
        "0x5e156f1207d0ebfa19a9eeff00d62a282278fb8719f4fab3a586a0a2c0fffbea::coin::T";

    pub struct StaticRegistry {
        pub records: Vec<PoolRecord>,
        pub calls: AtomicUsize,
    }

    impl StaticRegistry {
        /// APT/USDC pool with x=10000 (8 decimals), y=9950 (6 decimals).
        pub fn apt_usdc() -> Self {
            let records = serde_json::from_str(&serde_json::json!([{
                "coinX": { "type": APT, "reserve": "10000", "decimals": 8 },
                "coinY": { "type": USDC, "reserve": "9950", "decimals": 6 }
            }]).to_string())
            .unwrap();
            Self {
                records,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LiquidityRegistry for StaticRegistry {
        async fn registered_pools(&self) -> Result<Vec<PoolRecord>, RegistryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.records.clone())
        }
    }

    pub enum Outcome {
        Commit,
        Abort,
    }

    pub struct RecordingSubmitter {
        pub payloads: Mutex<Vec<TransactionPayload>>,
        pub outcome: Outcome,
    }

    impl RecordingSubmitter {
        pub fn new(outcome: Outcome) -> Self {
            Self {
                payloads: Mutex::new(Vec::new()),
                outcome,
            }
        }

        pub fn submitted(&self) -> Vec<TransactionPayload> {
            self.payloads.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TransactionSubmitter for RecordingSubmitter {
        fn sender(&self) -> &str {
            "0xa11ce"
        }

        async fn submit(
            &self,
            payload: &TransactionPayload,
        ) -> Result<PendingTransaction, RpcError> {
            self.payloads.lock().unwrap().push(payload.clone());
            Ok(PendingTransaction {
                hash: "0xfeed".to_string(),
                sender: Some(self.sender().to_string()),
                sequence_number: Some(0),
            })
        }

        async fn wait_for_transaction(&self, hash: &str) -> Result<TransactionResult, RpcError> {
            match self.outcome {
                Outcome::Commit => Ok(TransactionResult {
                    hash: hash.to_string(),
                    status: TransactionStatus::Committed,
                    version: Some(42),
                    gas_used: Some(7),
                    vm_status: Some("Executed successfully".to_string()),
                }),
                Outcome::Abort => Err(RpcError::Aborted {
                    hash: hash.to_string(),
                    vm_status: "Move abort".to_string(),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use std::sync::atomic::Ordering;
    use tradebot_domain::TransactionStatus;

    fn executor(
        registry: Arc<StaticRegistry>,
        submitter: Arc<RecordingSubmitter>,
        dry_run: bool,
    ) -> SwapExecutor {
        SwapExecutor::new(
            registry,
            submitter,
            PayloadBuilder::default(),
            ExecutorConfig {
                dry_run,
                ..ExecutorConfig::default()
            },
        )
    }

    #[tokio::test]
    async fn test_register_coin_submits() {
        let submitter = Arc::new(RecordingSubmitter::new(Outcome::Commit));
        let exec = executor(Arc::new(StaticRegistry::apt_usdc()), submitter.clone(), false);

        let result = exec.register_coin(USDC).await.unwrap().unwrap();
        assert_eq!(result.status, TransactionStatus::Committed);

        let sent = submitter.submitted();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].function, "0x1::managed_coin::register");
    }

    #[tokio::test]
    async fn test_dry_run_never_submits() {
        let submitter = Arc::new(RecordingSubmitter::new(Outcome::Commit));
        let exec = executor(Arc::new(StaticRegistry::apt_usdc()), submitter.clone(), true);

        assert!(exec.register_coin(USDC).await.unwrap().is_none());
        assert!(submitter.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_lp_coin_type_uses_pool_order() {
        let registry = Arc::new(StaticRegistry::apt_usdc());
        let exec = executor(
            registry.clone(),
            Arc::new(RecordingSubmitter::new(Outcome::Commit)),
            false,
        );

        let forward = exec.lp_coin_type(APT, USDC).await.unwrap();
        let reversed = exec.lp_coin_type(USDC, APT).await.unwrap();
        assert_eq!(forward, reversed);
        assert!(forward.contains(&format!("LP<{APT}, {USDC}, ")));
        assert_eq!(registry.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_abort_is_submission_failure() {
        let exec = executor(
            Arc::new(StaticRegistry::apt_usdc()),
            Arc::new(RecordingSubmitter::new(Outcome::Abort)),
            false,
        );

        let err = exec.register_coin(USDC).await.unwrap_err();
        assert!(matches!(err, TradeError::SubmissionFailed(_)));
    }

    #[tokio::test]
    async fn test_read_only_refuses_to_submit() {
        let exec = SwapExecutor::read_only(
            Arc::new(StaticRegistry::apt_usdc()),
            PayloadBuilder::default(),
            ExecutorConfig::default(),
        );

        assert!(exec.sender().is_none());
        let err = exec.register_coin(USDC).await.unwrap_err();
        assert!(matches!(err, TradeError::SubmissionFailed(msg) if msg.contains("signing account")));
    }

    #[tokio::test]
    async fn test_read_only_dry_run_skips_submission() {
        let exec = SwapExecutor::read_only(
            Arc::new(StaticRegistry::apt_usdc()),
            PayloadBuilder::default(),
            ExecutorConfig {
                dry_run: true,
                ..ExecutorConfig::default()
            },
        );

        assert!(exec.register_coin(USDC).await.unwrap().is_none());
    }
}
