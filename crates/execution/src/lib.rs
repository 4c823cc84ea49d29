//! Trade execution engine.
//!
//! This crate ties the pool registry, the quote calculator, the payload
//! builder and the ledger submitter together:
//! - Swap quoting against fresh reserves (dry run)
//! - Swap execution with finality tracking
//! - Adding and removing liquidity
//! - Coin registration

/// Prelude module for convenient imports.
pub mod prelude;

/// Swap and liquidity executor.
pub mod executor;
