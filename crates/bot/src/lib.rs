//! Chat front end.
//!
//! This crate provides the Telegram side of the bot:
//! - Command parsing (`/start`, `/connect`, `/swap`, `/echo`)
//! - Dispatching commands to the trade pipeline and wallet login
//! - Bot API transport and a long-polling runner

/// Command parsing.
pub mod command;
/// Command dispatcher.
pub mod dispatcher;
/// Pending OAuth logins.
pub mod login;
/// Long-polling runner.
pub mod runner;
/// Telegram Bot API client.
pub mod telegram;

pub use command::Command;
pub use dispatcher::{Dispatcher, TokenAliases, WELCOME};
pub use login::PendingLogins;
pub use runner::{BotRunner, RunnerConfig, dispatch_update};
pub use telegram::{ChatTransport, Message, TelegramClient, TransportError, Update};
