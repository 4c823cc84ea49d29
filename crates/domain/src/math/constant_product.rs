use crate::error::TradeError;
use primitive_types::{U256, U512};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Calculates the output amount for a given input amount in a constant product pool (x * y = k).
///
/// formula: dy = y * dx / (x + dx), floored. No fee term.
pub fn calculate_out_amount(
    amount_in: U256,
    reserve_in: U256,
    reserve_out: U256,
) -> Result<U256, TradeError> {
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(TradeError::InsufficientReserves {
            requested: amount_in.to_string(),
            available: reserve_in.to_string(),
        });
    }
    if amount_in.is_zero() {
        return Ok(U256::zero());
    }

    let numerator: U512 = reserve_out.full_mul(amount_in);
    let denominator = U512::from(reserve_in) + U512::from(amount_in);

    // dx / (x + dx) < 1, so the quotient is below reserve_out
    U256::try_from(numerator / denominator).map_err(|_| TradeError::InsufficientReserves {
        requested: amount_in.to_string(),
        available: reserve_in.to_string(),
    })
}

/// Calculates the spot price of token_in in terms of token_out, in human units.
/// Price = (reserve_out / 10^dec_out) / (reserve_in / 10^dec_in)
///
/// Returns `None` for an empty pool or reserves too large for `Decimal`.
pub fn calculate_spot_price(
    reserve_in: U256,
    decimals_in: u8,
    reserve_out: U256,
    decimals_out: u8,
) -> Option<Decimal> {
    let r_in = Decimal::from_str(&reserve_in.to_string()).ok()?;
    let r_out = Decimal::from_str(&reserve_out.to_string()).ok()?;
    if r_in.is_zero() {
        return None;
    }

    let price = r_out.checked_div(r_in)?;
    let shift = i32::from(decimals_in) - i32::from(decimals_out);
    let factor = Decimal::from(10u64.checked_pow(shift.unsigned_abs())?);
    let adjusted = if shift >= 0 {
        price.checked_mul(factor)?
    } else {
        price.checked_div(factor)?
    };
    Some(adjusted.normalize())
}
