use crate::error::TradeError;
use crate::value_objects::amount::pow10;
use primitive_types::{U256, U512};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Slippage tolerance as a fraction in `[0, 1)`; `0.005` is 0.5%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slippage(Decimal);

impl Slippage {
    pub fn new(fraction: Decimal) -> Result<Self, TradeError> {
        if fraction.is_sign_negative() || fraction >= Decimal::ONE {
            return Err(TradeError::InvalidAmount(format!(
                "slippage {fraction} must be in [0, 1)"
            )));
        }
        Ok(Self(fraction.normalize()))
    }

    pub fn from_bps(bps: u32) -> Result<Self, TradeError> {
        Self::new(Decimal::from(bps) / Decimal::from(10000))
    }

    pub fn to_bps(&self) -> u32 {
        (self.0 * Decimal::from(10000)).to_u32().unwrap_or(0)
    }

    pub fn fraction(&self) -> Decimal {
        self.0
    }

    /// `floor(amount * (1 - slippage))`, computed over integers.
    pub fn apply(&self, amount: U256) -> U256 {
        let keep = Decimal::ONE - self.0;
        let numerator = U256::from(keep.mantissa().unsigned_abs());
        // scale is at most 28, well inside U256
        let divisor = pow10(keep.scale()).unwrap_or_else(U256::one);

        let scaled: U512 = amount.full_mul(numerator) / U512::from(divisor);
        // keep <= 1, so the result never exceeds `amount`
        U256::try_from(scaled).unwrap_or(amount)
    }
}

impl Default for Slippage {
    /// 0.5%
    fn default() -> Self {
        Self(Decimal::new(5, 3))
    }
}

impl fmt::Display for Slippage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", (self.0 * Decimal::from(100)).normalize())
    }
}
