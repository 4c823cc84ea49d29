//! Swap details carried by ledger events.

use crate::aptos::Event;
use crate::aptos::types::value_to_string;
use serde::Serialize;
use serde_json::Value;

/// Swap fields read from one event.
///
/// Router-style events carry `coin_in`/`coin_out`/`amount_in`/`amount_out`
/// directly. Pool `SwapEvent<X, Y, Curve>` events carry `x_in`/`x_out`/
/// `y_in`/`y_out` and the direction is read from which side was paid in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwapDetails {
    pub transaction_version: Option<u64>,
    pub sequence_number: u64,
    pub event_type: String,
    pub coin_in: Option<String>,
    pub coin_out: Option<String>,
    pub amount_in: Option<String>,
    pub amount_out: Option<String>,
    pub sender: Option<String>,
}

impl SwapDetails {
    /// Extracts swap fields from an event. Missing fields stay `None`.
    pub fn from_event(event: &Event) -> Self {
        let field = |name: &str| event.data.get(name).filter(|v| !v.is_null()).map(value_to_string);

        let mut details = Self {
            transaction_version: event.version,
            sequence_number: event.sequence_number,
            event_type: event.event_type.clone(),
            coin_in: field("coin_in"),
            coin_out: field("coin_out"),
            amount_in: field("amount_in"),
            amount_out: field("amount_out"),
            sender: field("sender"),
        };

        if details.amount_in.is_none() {
            details.fill_from_pool_event(&event.event_type, &event.data);
        }
        details
    }

    /// Whether the event carried any swap data.
    pub fn is_swap(&self) -> bool {
        self.amount_in.is_some() || self.amount_out.is_some()
    }

    fn fill_from_pool_event(&mut self, event_type: &str, data: &Value) {
        let amount = |name: &str| -> Option<u128> {
            data.get(name).map(value_to_string).and_then(|s| s.parse().ok())
        };
        let (Some(x_in), Some(x_out), Some(y_in), Some(y_out)) =
            (amount("x_in"), amount("x_out"), amount("y_in"), amount("y_out"))
        else {
            return;
        };

        let generics = type_arguments(event_type);
        let coin_x = generics.first().cloned();
        let coin_y = generics.get(1).cloned();

        if x_in > 0 {
            self.coin_in = coin_x;
            self.coin_out = coin_y;
            self.amount_in = Some(x_in.to_string());
            self.amount_out = Some(y_out.to_string());
        } else {
            self.coin_in = coin_y;
            self.coin_out = coin_x;
            self.amount_in = Some(y_in.to_string());
            self.amount_out = Some(x_out.to_string());
        }
    }
}

/// Top-level generic arguments of a type tag: `A::b::C<X, Y<Z>>` gives `[X, Y<Z>]`.
fn type_arguments(tag: &str) -> Vec<String> {
    let Some(open) = tag.find('<') else {
        return Vec::new();
    };
    let Some(inner) = tag[open + 1..].strip_suffix('>') else {
        return Vec::new();
    };

    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                args.push(inner[start..i].trim().to_string());
                start = i + 1;
            }
            _ => {}
        }
    }
    let last = inner[start..].trim();
    if !last.is_empty() {
        args.push(last.to_string());
    }
    args
}
