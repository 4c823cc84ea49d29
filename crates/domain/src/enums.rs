use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Liquidswap pricing curve a pool is registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Curve {
    /// Constant product, x * y = k.
    #[default]
    Uncorrelated,
    /// Stableswap curve for pegged assets.
    Stable,
}

impl Curve {
    /// Struct name of the curve inside the `curves` module.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uncorrelated => "Uncorrelated",
            Self::Stable => "Stable",
        }
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Curve {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "uncorrelated" => Ok(Self::Uncorrelated),
            "stable" => Ok(Self::Stable),
            other => Err(format!("unknown curve: {other}")),
        }
    }
}

/// Kind of on-chain call a payload describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    Swap,
    AddLiquidity,
    RemoveLiquidity,
    RegisterCoin,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Swap => "swap",
            Self::AddLiquidity => "add_liquidity",
            Self::RemoveLiquidity => "remove_liquidity",
            Self::RegisterCoin => "register",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_parsing() {
        assert_eq!("uncorrelated".parse::<Curve>(), Ok(Curve::Uncorrelated));
        assert_eq!("Stable".parse::<Curve>(), Ok(Curve::Stable));
        assert!("weighted".parse::<Curve>().is_err());
        assert_eq!(Curve::default().to_string(), "Uncorrelated");
    }
}
