//! Ledger and DEX protocol adapters.
//!
//! - `aptos`: fullnode REST client, local signing account, transaction submitter
//! - `liquidswap`: entry-function payloads, LP coin types, swap event decoding

pub mod aptos;
pub mod liquidswap;

pub use aptos::{
    AptosClient, AptosSubmitter, LocalAccount, NodeConfig, RpcError, SubmitConfig,
    TransactionSubmitter,
};
pub use liquidswap::{LiquidswapConfig, Operation, PayloadBuilder};
