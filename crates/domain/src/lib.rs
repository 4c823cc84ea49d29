//! Core trading types for the Liquidswap trade bot.
//!
//! Everything in this crate is pure: token identifiers, pool reserve
//! snapshots, raw amounts, slippage, the constant-product quote and the
//! transaction value types shared by the ledger and front-end crates.

pub mod entities;
pub mod enums;
pub mod error;
pub mod math;
pub mod value_objects;

pub use entities::{AlignedReserves, PoolReserves, Token};
pub use enums::{Curve, OperationKind};
pub use error::TradeError;
pub use value_objects::{
    Amount, Slippage, SwapQuote, TransactionPayload, TransactionResult, TransactionStatus,
};
