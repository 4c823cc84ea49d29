//! Chat command parsing.

use rust_decimal::Decimal;
use std::str::FromStr;
use tradebot_domain::TradeError;

const SWAP_USAGE: &str = "usage: /swap <from> <to> <amount>";

/// A parsed chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/start`
    Start,
    /// `/connect [code]`
    Connect { code: Option<String> },
    /// `/swap <from> <to> <amount>`
    Swap {
        from: String,
        to: String,
        amount: Decimal,
    },
    /// `/echo <text>`
    Echo(String),
    /// Anything that is not a command.
    Text(String),
}

impl Command {
    /// Parses a message. Fails with `InvalidCommand` for unknown commands
    /// and malformed arguments.
    pub fn parse(text: &str) -> Result<Self, TradeError> {
        let text = text.trim();
        if !text.starts_with('/') {
            return Ok(Self::Text(text.to_string()));
        }

        let (head, rest) = match text.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (text, ""),
        };
        // `/swap@GariTradeBot` in group chats
        let name = head.split('@').next().unwrap_or(head);

        match name {
            "/start" => Ok(Self::Start),
            "/connect" => Ok(Self::Connect {
                code: (!rest.is_empty()).then(|| rest.to_string()),
            }),
            "/swap" => parse_swap(rest),
            "/echo" if rest.is_empty() => Err(TradeError::InvalidCommand(
                "usage: /echo <text>".to_string(),
            )),
            "/echo" => Ok(Self::Echo(rest.to_string())),
            other => Err(TradeError::InvalidCommand(format!("unknown command {other}"))),
        }
    }
}

fn parse_swap(args: &str) -> Result<Command, TradeError> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    let [from, to, amount] = parts.as_slice() else {
        return Err(TradeError::InvalidCommand(SWAP_USAGE.to_string()));
    };

    let amount = Decimal::from_str(amount).map_err(|_| {
        TradeError::InvalidCommand(format!("'{amount}' is not a number; {SWAP_USAGE}"))
    })?;
    if amount <= Decimal::ZERO {
        return Err(TradeError::InvalidCommand(format!(
            "amount must be greater than zero, got {amount}"
        )));
    }
    if from.eq_ignore_ascii_case(to) {
        return Err(TradeError::InvalidCommand(
            "cannot swap a token for itself".to_string(),
        ));
    }

    Ok(Command::Swap {
        from: (*from).to_string(),
        to: (*to).to_string(),
        amount,
    })
}
