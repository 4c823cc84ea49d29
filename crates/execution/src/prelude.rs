//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use tradebot_execution::prelude::*;
//! ```

// Executor
pub use crate::executor::{
    AddLiquidityRequest, ExecutorConfig, LiquidityReceipt, RemoveLiquidityRequest, SwapExecutor,
    SwapPlan, SwapReceipt, SwapRequest,
};
