pub mod pool;
pub mod token;

// Re-export for easier access
pub use pool::{AlignedReserves, PoolReserves};
pub use token::Token;
