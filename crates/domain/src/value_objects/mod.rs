pub mod amount;
pub mod slippage;
pub mod swap_quote;
pub mod transaction;

pub use amount::Amount;
pub use slippage::Slippage;
pub use swap_quote::SwapQuote;
pub use transaction::{TransactionPayload, TransactionResult, TransactionStatus};
