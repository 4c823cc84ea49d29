//! Wire records of the registry's `/pools/registered` endpoint.

use primitive_types::U256;
use serde::{Deserialize, Deserializer};
use serde_json::value::RawValue;
use tradebot_domain::entities::{PoolReserves, Token};
use tradebot_domain::Curve;

/// One side of a registered pool.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CoinRecord {
    /// Coin type tag.
    #[serde(rename = "type")]
    pub type_tag: String,
    /// Reserve in raw units.
    #[serde(deserialize_with = "deserialize_reserve")]
    pub reserve: U256,
    /// Decimal precision.
    pub decimals: u8,
}

/// A registered pool.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolRecord {
    /// X side.
    pub coin_x: CoinRecord,
    /// Y side.
    pub coin_y: CoinRecord,
    /// Curve type tag, when the registry reports it.
    #[serde(default)]
    pub curve: Option<String>,
}

impl PoolRecord {
    /// Converts the record into a domain reserve snapshot.
    #[must_use]
    pub fn to_reserves(&self) -> PoolReserves {
        PoolReserves::new(
            Token::new(&self.coin_x.type_tag, self.coin_x.decimals),
            self.coin_x.reserve,
            Token::new(&self.coin_y.type_tag, self.coin_y.decimals),
            self.coin_y.reserve,
        )
    }

    /// Whether the record is usable for `curve`.
    #[must_use]
    pub fn curve_matches(&self, curve: Curve) -> bool {
        match &self.curve {
            Some(tag) => tag
                .rsplit("::")
                .next()
                .is_some_and(|name| name.eq_ignore_ascii_case(curve.as_str())),
            None => true,
        }
    }
}

/// Reserves arrive either as JSON integers or as decimal strings. The raw
/// token is parsed directly so integers wider than `u64` stay exact.
fn deserialize_reserve<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Box::<RawValue>::deserialize(deserializer)?;
    parse_reserve(raw.get()).map_err(serde::de::Error::custom)
}

fn parse_reserve(raw: &str) -> Result<U256, String> {
    let raw = raw.trim();
    let digits = match raw.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        Some(text) => text.trim(),
        None => raw,
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("invalid reserve {raw}"));
    }
    U256::from_dec_str(digits).map_err(|e| format!("invalid reserve {raw}: {e}"))
}
