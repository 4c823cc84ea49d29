//! Maps chat commands to the trade pipeline and the wallet login flow.

use crate::command::Command;
use crate::login::PendingLogins;
use crate::telegram::ChatTransport;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, warn};
use tradebot_domain::TradeError;
use tradebot_domain::entities::token::Token;
use tradebot_execution::prelude::*;
use tradebot_wallet::WalletConnector;

/// Greeting sent for `/start`.
pub const WELCOME: &str = "Welcome to GariTradeBot! Use /connect to connect your wallet.";

/// Chat-friendly names for coin type tags.
#[derive(Debug, Clone)]
pub struct TokenAliases(HashMap<String, String>);

impl TokenAliases {
    /// Empty alias table.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Adds or replaces an alias, matched case-insensitively.
    pub fn insert(&mut self, symbol: &str, type_tag: impl Into<String>) {
        self.0.insert(symbol.to_ascii_uppercase(), type_tag.into());
    }

    /// Type tag for `name`; names that are not aliases pass through.
    pub fn resolve(&self, name: &str) -> String {
        self.0
            .get(&name.to_ascii_uppercase())
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }
}

impl Default for TokenAliases {
    /// APT and LayerZero USDC on mainnet.
    fn default() -> Self {
        let mut aliases = Self::empty();
        aliases.insert("APT", "0x1::aptos_coin::AptosCoin");
        aliases.insert(
            "USDC",
            "0x5e156f1207d0ebfa19a9eeff00d62a282278fb8719f4fab3a586a0a2c0fffbea::coin::T",
        );
        aliases
    }
}

/// Turns chat messages into replies.
///
/// Every command runs the pipeline from scratch. The only state kept
/// between messages is the set of pending `/connect` logins.
pub struct Dispatcher {
    executor: Arc<SwapExecutor>,
    connector: Arc<dyn WalletConnector>,
    aliases: TokenAliases,
    logins: PendingLogins,
}

impl Dispatcher {
    /// Creates a new dispatcher.
    pub fn new(
        executor: Arc<SwapExecutor>,
        connector: Arc<dyn WalletConnector>,
        aliases: TokenAliases,
    ) -> Self {
        Self {
            executor,
            connector,
            aliases,
            logins: PendingLogins::default(),
        }
    }

    /// Reply for one message from `chat_id`. Failures become the reply text.
    pub async fn handle(&self, chat_id: i64, text: &str) -> String {
        let command = match Command::parse(text) {
            Ok(command) => command,
            Err(e) => {
                info!(chat_id = chat_id, error = %e, "Rejected command");
                return e.to_string();
            }
        };

        match command {
            Command::Start => WELCOME.to_string(),
            Command::Connect { code: None } => self.login_prompt(chat_id).await,
            Command::Connect { code: Some(code) } => self.complete_login(&code).await,
            Command::Swap { from, to, amount } => {
                let request = SwapRequest {
                    from: self.aliases.resolve(&from),
                    to: self.aliases.resolve(&to),
                    amount,
                };
                match self.executor.swap(&request).await {
                    Ok(receipt) => format_receipt(&receipt),
                    Err(e) => {
                        warn!(chat_id = chat_id, kind = e.kind(), error = %e, "Swap failed");
                        format!("Error during swap: {e}")
                    }
                }
            }
            Command::Echo(text) => text,
            Command::Text(text) => format!("You said: {text}"),
        }
    }

    /// Handles a message and sends the reply. Send failures are logged.
    pub async fn respond(&self, transport: &dyn ChatTransport, chat_id: i64, text: &str) {
        let reply = self.handle(chat_id, text).await;
        if let Err(e) = transport.send_message(chat_id, &reply).await {
            error!(chat_id = chat_id, error = %e, "Failed to send reply");
        }
    }

    /// Finishes a wallet login with an OAuth authorization code.
    pub async fn complete_login(&self, code: &str) -> String {
        match self.connector.connect(code).await {
            Ok(connected) if connected.wallets.is_empty() => {
                "Wallet connected, but no wallets were returned.".to_string()
            }
            Ok(connected) => {
                let wallets: Vec<String> = connected
                    .wallets
                    .iter()
                    .map(|w| format!("{} {}", w.network_name, w.address))
                    .collect();
                format!("Wallet connected: {}", wallets.join(", "))
            }
            Err(e) => {
                let e = TradeError::from(e);
                warn!(error = %e, "Wallet login failed");
                format!("Error connecting wallet: {e}")
            }
        }
    }

    /// Chat a login `state` was issued to. Each state is redeemable once.
    pub async fn redeem_login(&self, state: &str) -> Option<i64> {
        self.logins.redeem(state).await
    }

    async fn login_prompt(&self, chat_id: i64) -> String {
        let state = self.logins.issue(chat_id).await;
        match self.connector.authorization_url(&state) {
            Ok(url) => format!(
                "Authorize GariTradeBot by visiting:\n{url}\n\nYou will get a message here once your wallet is connected."
            ),
            Err(e) => format!("Error connecting wallet: {}", TradeError::from(e)),
        }
    }
}

fn format_receipt(receipt: &SwapReceipt) -> String {
    let plan = &receipt.plan;
    let from = Token::symbol(&plan.reserves.token_in);
    let to = Token::symbol(&plan.reserves.token_out);
    let expected = plan
        .expected_out()
        .map_or_else(|| plan.quote.amount_out.to_string(), |d| d.normalize().to_string());
    let minimum = plan
        .minimum_out()
        .map_or_else(|| plan.quote.min_amount_out.to_string(), |d| d.normalize().to_string());

    match &receipt.result {
        Some(result) => format!(
            "Swap successful: {} {from} -> ~{expected} {to} (minimum {minimum})\nTransaction: {}{}",
            plan.quote.amount_in,
            result.hash,
            result
                .version
                .map(|v| format!(" (version {v})"))
                .unwrap_or_default(),
        ),
        None => format!(
            "Quote: {} {from} -> ~{expected} {to} (minimum {minimum}). Dry run, nothing was submitted.",
            plan.quote.amount_in
        ),
    }
}
