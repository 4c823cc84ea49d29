use serde::{Deserialize, Serialize};
use std::fmt;

/// A fungible asset on the ledger, named by its Move type tag
/// (e.g. `0x1::aptos_coin::AptosCoin`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub type_tag: String,
    pub decimals: u8,
}

impl Token {
    pub fn new(type_tag: impl Into<String>, decimals: u8) -> Self {
        Self {
            type_tag: type_tag.into(),
            decimals,
        }
    }

    /// Last path segment of the type tag, used as a display symbol.
    pub fn symbol(&self) -> &str {
        let head = self.type_tag.split('<').next().unwrap_or(&self.type_tag);
        head.rsplit("::").next().unwrap_or(head)
    }

    /// Whether `type_tag` names this token, ignoring address case and
    /// leading zeros.
    pub fn is(&self, type_tag: &str) -> bool {
        same_type_tag(&self.type_tag, type_tag)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.type_tag)
    }
}

/// Compares two type tags after normalizing every embedded account address.
pub fn same_type_tag(a: &str, b: &str) -> bool {
    normalize_type_tag(a) == normalize_type_tag(b)
}

/// Lowercases `0x` addresses and strips their leading zeros, so that
/// `0x05a9::lp_coin::LP` and `0x5A9::lp_coin::LP` compare equal.
pub fn normalize_type_tag(tag: &str) -> String {
    let mut out = String::with_capacity(tag.len());
    let mut rest = tag.trim();

    while let Some(pos) = rest.find("0x") {
        let boundary = pos == 0 || !rest.as_bytes()[pos - 1].is_ascii_alphanumeric();
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 2..];
        let hex_len = after
            .bytes()
            .take_while(|b| b.is_ascii_hexdigit())
            .count();

        if !boundary || hex_len == 0 {
            out.push_str("0x");
            rest = after;
            continue;
        }

        let digits = after[..hex_len].trim_start_matches('0').to_ascii_lowercase();
        out.push_str("0x");
        out.push_str(if digits.is_empty() { "0" } else { &digits });
        rest = &after[hex_len..];
    }
    out.push_str(rest);
    out.retain(|c| !c.is_whitespace());
    out
}
