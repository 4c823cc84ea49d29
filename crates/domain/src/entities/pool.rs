use crate::entities::token::Token;
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Point-in-time balances of a two-sided pool, as read from the registry.
///
/// A snapshot is stale as soon as it is read; callers fetch a new one for
/// every quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolReserves {
    pub coin_x: Token,
    pub coin_y: Token,
    pub reserve_x: U256,
    pub reserve_y: U256,
}

impl PoolReserves {
    pub fn new(coin_x: Token, reserve_x: U256, coin_y: Token, reserve_y: U256) -> Self {
        Self {
            coin_x,
            coin_y,
            reserve_x,
            reserve_y,
        }
    }

    /// True when the pool trades `a` against `b`, in either order.
    pub fn matches(&self, a: &str, b: &str) -> bool {
        (self.coin_x.is(a) && self.coin_y.is(b)) || (self.coin_x.is(b) && self.coin_y.is(a))
    }

    /// Orients the pool so that `reserve_in` belongs to `from` and
    /// `reserve_out` to `to`. Returns `None` if the pool does not hold the pair.
    pub fn align(&self, from: &str, to: &str) -> Option<AlignedReserves> {
        if self.coin_x.is(from) && self.coin_y.is(to) {
            Some(AlignedReserves {
                token_in: self.coin_x.clone(),
                token_out: self.coin_y.clone(),
                reserve_in: self.reserve_x,
                reserve_out: self.reserve_y,
            })
        } else if self.coin_y.is(from) && self.coin_x.is(to) {
            Some(AlignedReserves {
                token_in: self.coin_y.clone(),
                token_out: self.coin_x.clone(),
                reserve_in: self.reserve_y,
                reserve_out: self.reserve_x,
            })
        } else {
            None
        }
    }
}

/// Pool reserves oriented along the direction of a trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedReserves {
    pub token_in: Token,
    pub token_out: Token,
    pub reserve_in: U256,
    pub reserve_out: U256,
}

#[cfg(test)]
mod tests {
    use super::*;

    const APT: &str = "0x1::aptos_coin::AptosCoin";
    const USDC: &str = "0x5e156f1207d0ebfa19a9eeff00d62a282278fb8719f4fab3a586a0a2c0fffbea::coin::T";

    fn pool() -> PoolReserves {
        PoolReserves::new(
            Token::new(APT, 8),
            U256::from(10_000u64),
            Token::new(USDC, 6),
            U256::from(9_950u64),
        )
    }

    #[test]
    fn test_align_is_order_insensitive() {
        let pool = pool();

        let forward = pool.align(APT, USDC).unwrap();
        assert_eq!(forward.reserve_in, U256::from(10_000u64));
        assert_eq!(forward.reserve_out, U256::from(9_950u64));
        assert_eq!(forward.token_in.decimals, 8);

        let backward = pool.align(USDC, APT).unwrap();
        assert_eq!(backward.reserve_in, U256::from(9_950u64));
        assert_eq!(backward.reserve_out, U256::from(10_000u64));
        assert_eq!(backward.token_in.decimals, 6);
    }

    #[test]
    fn test_align_unknown_pair() {
        let pool = pool();
        assert!(pool.align(APT, "0x1::other::Coin").is_none());
        assert!(pool.align(APT, APT).is_none());
        assert!(!pool.matches(USDC, USDC));
        assert!(pool.matches(USDC, APT));
    }
}
