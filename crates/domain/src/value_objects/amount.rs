use crate::error::TradeError;
use primitive_types::U256;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A token quantity in raw on-chain units together with the token's
/// decimal precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amount {
    pub raw: U256,
    pub decimals: u8,
}

impl Amount {
    pub fn new(raw: U256, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    /// Scales a human amount (`1.5` APT) into raw units (`150000000`).
    ///
    /// Exact: an amount with more fractional digits than the token carries is
    /// rejected instead of being rounded.
    pub fn from_decimal(d: Decimal, decimals: u8) -> Result<Self, TradeError> {
        if d.is_sign_negative() && !d.is_zero() {
            return Err(TradeError::InvalidAmount(format!("{d} is negative")));
        }

        let mantissa = U256::from(d.mantissa().unsigned_abs());
        let scale = d.scale();
        let overflow = || TradeError::InvalidAmount(format!("{d} overflows raw units"));

        let numerator = mantissa
            .checked_mul(pow10(u32::from(decimals)).ok_or_else(overflow)?)
            .ok_or_else(overflow)?;
        let divisor = pow10(scale).ok_or_else(overflow)?;

        if !(numerator % divisor).is_zero() {
            return Err(TradeError::InvalidAmount(format!(
                "{d} has more than {decimals} decimal places"
            )));
        }

        Ok(Self {
            raw: numerator / divisor,
            decimals,
        })
    }

    /// Converts back to a human amount. `None` when the raw value does not fit
    /// into a `Decimal`.
    pub fn to_decimal(&self) -> Option<Decimal> {
        if self.raw > U256::from(u128::MAX) {
            return None;
        }
        let raw = i128::try_from(self.raw.as_u128()).ok()?;
        Decimal::try_from_i128_with_scale(raw, u32::from(self.decimals)).ok()
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.raw.to_string();
        let decimals = usize::from(self.decimals);
        if decimals == 0 {
            return f.write_str(&digits);
        }

        let padded = format!("{digits:0>width$}", width = decimals + 1);
        let (int_part, frac_part) = padded.split_at(padded.len() - decimals);
        let frac_part = frac_part.trim_end_matches('0');
        if frac_part.is_empty() {
            f.write_str(int_part)
        } else {
            write!(f, "{int_part}.{frac_part}")
        }
    }
}

/// `10^exp` as a `U256`, or `None` past 10^77.
pub fn pow10(exp: u32) -> Option<U256> {
    let mut value = U256::one();
    for _ in 0..exp {
        value = value.checked_mul(U256::from(10u8))?;
    }
    Some(value)
}
