use crate::entities::pool::AlignedReserves;
use crate::error::TradeError;
use crate::math::constant_product::calculate_out_amount;
use crate::value_objects::amount::Amount;
use crate::value_objects::slippage::Slippage;
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Outcome of pricing a swap against one reserve snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapQuote {
    /// Requested input in human units.
    pub amount_in: Decimal,
    /// Requested input in raw units.
    pub amount_in_raw: U256,
    /// Constant-product output before slippage, in raw units.
    pub amount_out: U256,
    /// Smallest output the swap may accept.
    pub min_amount_out: U256,
    pub slippage: Slippage,
}

impl SwapQuote {
    /// Prices `amount` of the input token against `x_reserve`/`y_reserve`.
    ///
    /// The reserve guard compares the human amount with `x_reserve`, and
    /// both reserves must be non-empty.
    pub fn compute(
        x_reserve: U256,
        y_reserve: U256,
        amount: Decimal,
        decimals: u8,
        slippage: Slippage,
    ) -> Result<Self, TradeError> {
        if amount <= Decimal::ZERO {
            return Err(TradeError::InvalidAmount(format!(
                "{amount} must be greater than zero"
            )));
        }
        if exceeds_reserve(amount, x_reserve) || x_reserve.is_zero() || y_reserve.is_zero() {
            return Err(TradeError::InsufficientReserves {
                requested: amount.to_string(),
                available: x_reserve.to_string(),
            });
        }

        let amount_in_raw = Amount::from_decimal(amount, decimals)?.raw;
        let amount_out = calculate_out_amount(amount_in_raw, x_reserve, y_reserve)?;
        let min_amount_out = slippage.apply(amount_out);

        Ok(Self {
            amount_in: amount,
            amount_in_raw,
            amount_out,
            min_amount_out,
            slippage,
        })
    }

    /// Prices a swap along already-oriented reserves, using the input
    /// token's own precision.
    pub fn for_reserves(
        reserves: &AlignedReserves,
        amount: Decimal,
        slippage: Slippage,
    ) -> Result<Self, TradeError> {
        Self::compute(
            reserves.reserve_in,
            reserves.reserve_out,
            amount,
            reserves.token_in.decimals,
            slippage,
        )
    }
}

/// `amount > reserve` without converting the reserve into a `Decimal`.
fn exceeds_reserve(amount: Decimal, reserve: U256) -> bool {
    let mantissa = U256::from(amount.mantissa().unsigned_abs());
    let scale = super::amount::pow10(amount.scale()).unwrap_or_else(U256::one);
    match reserve.checked_mul(scale) {
        Some(scaled_reserve) => mantissa > scaled_reserve,
        // the reserve dwarfs any Decimal
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::token::Token;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reference_quote() {
        let quote = SwapQuote::compute(
            U256::from(10_000u64),
            U256::from(9_950u64),
            dec!(1),
            8,
            Slippage::new(dec!(0.005)).unwrap(),
        )
        .unwrap();

        assert_eq!(quote.amount_in_raw, U256::from(100_000_000u64));
        // floor(9950 * 100000000 / 100010000)
        assert_eq!(quote.amount_out, U256::from(9_949u64));
        // floor(9949 * 0.995)
        assert_eq!(quote.min_amount_out, U256::from(9_899u64));
    }

    #[test]
    fn test_amount_above_reserve() {
        let err = SwapQuote::compute(
            U256::from(10u64),
            U256::from(10u64),
            dec!(10.5),
            8,
            Slippage::default(),
        )
        .unwrap_err();
        assert!(matches!(err, TradeError::InsufficientReserves { .. }));
    }

    #[test]
    fn test_empty_pool() {
        let err = SwapQuote::compute(U256::from(5u64), U256::zero(), dec!(1), 0, Slippage::default())
            .unwrap_err();
        assert!(matches!(err, TradeError::InsufficientReserves { .. }));
    }

    #[test]
    fn test_zero_amount() {
        let err = SwapQuote::compute(U256::from(5u64), U256::from(5u64), dec!(0), 0, Slippage::default())
            .unwrap_err();
        assert!(matches!(err, TradeError::InvalidAmount(_)));
    }

    #[test]
    fn test_for_reserves_uses_input_decimals() {
        let reserves = AlignedReserves {
            token_in: Token::new("0x1::usdc::USDC", 6),
            token_out: Token::new("0x1::aptos_coin::AptosCoin", 8),
            reserve_in: U256::from(5_000_000_000u64),
            reserve_out: U256::from(1_000_000_000u64),
        };
        let quote = SwapQuote::for_reserves(&reserves, dec!(2.5), Slippage::default()).unwrap();
        assert_eq!(quote.amount_in_raw, U256::from(2_500_000u64));
        // 1e9 * 2.5e6 / (5e9 + 2.5e6) = 499750.12...
        assert_eq!(quote.amount_out, U256::from(499_750u64));
    }

    proptest! {
        #[test]
        fn prop_quote_invariants(
            (x, amount) in (1u64..=u64::MAX).prop_flat_map(|x| (Just(x), 1u64..=x)),
            y in 1u64..=u64::MAX,
            decimals in 0u8..=18,
            bps in 0u32..10_000,
        ) {
            let quote = SwapQuote::compute(
                U256::from(x),
                U256::from(y),
                Decimal::from(amount),
                decimals,
                Slippage::from_bps(bps).unwrap(),
            ).unwrap();
            prop_assert!(quote.amount_out < U256::from(y));
            prop_assert!(quote.min_amount_out <= quote.amount_out);
        }
    }
}
