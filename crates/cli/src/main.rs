//! Command Line Interface for the Liquidswap trade bot.
mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::AppConfig;
use dotenv::dotenv;
use primitive_types::U256;
use reqwest::Client;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tradebot_api::{ApiServer, AppState, WebhookAuth};
use tradebot_bot::{BotRunner, ChatTransport, Dispatcher, RunnerConfig, TelegramClient, TokenAliases};
use tradebot_data::{LiquidityRegistry, LiquidswapRegistry};
use tradebot_domain::TransactionResult;
use tradebot_execution::prelude::*;
use tradebot_protocols::liquidswap::SwapDetails;
use tradebot_protocols::{AptosClient, AptosSubmitter, PayloadBuilder};
use tradebot_wallet::{GoogleOAuthClient, OktoClient, OktoConnector};

#[derive(Parser)]
#[command(name = "tradebot")]
#[command(about = "Telegram trade bot for Liquidswap pools on Aptos", long_about = None)]
struct Cli {
    /// Build payloads but don't submit them
    #[arg(long, global = true, env = "TRADEBOT_DRY_RUN")]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer Telegram messages by long polling
    Bot,
    /// Serve the Telegram webhook and the OAuth callback
    Serve {
        /// Listen address, overrides SERVER_BIND_ADDRESS
        #[arg(long)]
        bind: Option<String>,
    },
    /// Price a swap without submitting it
    Quote {
        /// Coin sold (type tag or APT/USDC)
        from: String,
        /// Coin bought (type tag or APT/USDC)
        to: String,
        /// Amount sold, in whole tokens
        amount: Decimal,
    },
    /// Swap on Liquidswap and wait for finality
    Swap {
        /// Coin sold (type tag or APT/USDC)
        from: String,
        /// Coin bought (type tag or APT/USDC)
        to: String,
        /// Amount sold, in whole tokens
        amount: Decimal,
    },
    /// Deposit both sides of a pool
    AddLiquidity {
        coin_a: String,
        coin_b: String,
        /// Amount of `coin_a`, in whole tokens
        amount_a: Decimal,
        /// Amount of `coin_b`, in whole tokens
        amount_b: Decimal,
    },
    /// Burn LP coins for the underlying coins
    RemoveLiquidity {
        coin_a: String,
        coin_b: String,
        /// LP coins to burn, raw units
        #[arg(value_parser = parse_u256)]
        lp_amount: U256,
        /// Minimum `coin_a` received, raw units
        #[arg(long, default_value = "0", value_parser = parse_u256)]
        min_a: U256,
        /// Minimum `coin_b` received, raw units
        #[arg(long, default_value = "0", value_parser = parse_u256)]
        min_b: U256,
    },
    /// Open a CoinStore for a coin on the signing account
    RegisterCoin {
        /// Coin type tag (or APT/USDC)
        coin_type: String,
    },
    /// Show the LP coin balance of an account for a pool
    LpBalance {
        coin_a: String,
        coin_b: String,
        /// Account to inspect; defaults to the signing account
        #[arg(long)]
        address: Option<String>,
    },
    /// Summarise a transaction
    Tx {
        /// Transaction hash
        hash: String,
    },
    /// List swap details from a CoinStore's event stream
    Events {
        /// Coin type tag (or APT/USDC)
        coin_type: String,
        /// Account to inspect; defaults to the signing account
        #[arg(long)]
        address: Option<String>,
        /// Read withdraw events instead of deposit events
        #[arg(long)]
        withdraw: bool,
        /// First sequence number to read
        #[arg(long)]
        start: Option<u64>,
        /// Page size
        #[arg(short, long, default_value_t = 25)]
        limit: u16,
    },
    /// Show the node's gas price estimate
    GasPrice,
    /// Print the Google consent URL
    AuthUrl {
        /// Opaque state echoed back with the code; the webhook server only
        /// accepts states issued by `/connect`, so paste the code into
        /// `/connect <code>` instead
        #[arg(default_value = "cli")]
        state: String,
    },
}

fn parse_u256(s: &str) -> Result<U256, String> {
    U256::from_dec_str(s).map_err(|e| format!("invalid integer {s}: {e:?}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    let aliases = TokenAliases::default();

    match cli.command {
        Commands::Bot => {
            let http = http_client()?;
            let dispatcher = dispatcher(&config, &http, cli.dry_run, aliases)?;
            let telegram = Arc::new(TelegramClient::new(
                http,
                &config.telegram_api_url,
                config.telegram_token()?,
            ));
            BotRunner::new(telegram, dispatcher, RunnerConfig::default())
                .run()
                .await;
        }
        Commands::Serve { bind } => {
            let http = http_client()?;
            let dispatcher = dispatcher(&config, &http, cli.dry_run, aliases)?;
            let telegram: Arc<dyn ChatTransport> = Arc::new(TelegramClient::new(
                http,
                &config.telegram_api_url,
                config.telegram_token()?,
            ));
            let auth = match config.webhook_secret() {
                Some(secret) => WebhookAuth::with_secret(secret),
                None => WebhookAuth::disabled(),
            };

            let mut server_config = config.server.clone();
            if let Some(bind) = bind {
                server_config.bind_address = bind;
            }
            ApiServer::new(server_config, AppState::new(dispatcher, telegram, auth))
                .run()
                .await?;
        }
        Commands::Quote { from, to, amount } => {
            let executor = quote_executor(&config)?;
            let request = SwapRequest {
                from: aliases.resolve(&from),
                to: aliases.resolve(&to),
                amount,
            };

            println!("🔍 Fetching reserves for {from} -> {to}...");
            let plan = executor.quote(&request).await?;
            print_plan(&plan, &from, &to);
            println!("{}", serde_json::to_string_pretty(&plan.payload)?);
        }
        Commands::Swap { from, to, amount } => {
            let executor = executor(&config, cli.dry_run)?;
            let request = SwapRequest {
                from: aliases.resolve(&from),
                to: aliases.resolve(&to),
                amount,
            };

            println!("🔄 Swapping {amount} {from} for {to}...");
            let receipt = executor.swap(&request).await?;
            print_plan(&receipt.plan, &from, &to);
            print_result(receipt.result.as_ref());
        }
        Commands::AddLiquidity {
            coin_a,
            coin_b,
            amount_a,
            amount_b,
        } => {
            let executor = executor(&config, cli.dry_run)?;
            let receipt = executor
                .add_liquidity(&AddLiquidityRequest {
                    coin_a: aliases.resolve(&coin_a),
                    coin_b: aliases.resolve(&coin_b),
                    amount_a,
                    amount_b,
                })
                .await?;
            print_liquidity(&receipt)?;
        }
        Commands::RemoveLiquidity {
            coin_a,
            coin_b,
            lp_amount,
            min_a,
            min_b,
        } => {
            let executor = executor(&config, cli.dry_run)?;
            let receipt = executor
                .remove_liquidity(&RemoveLiquidityRequest {
                    coin_a: aliases.resolve(&coin_a),
                    coin_b: aliases.resolve(&coin_b),
                    lp_amount,
                    min_amount_a: min_a,
                    min_amount_b: min_b,
                })
                .await?;
            print_liquidity(&receipt)?;
        }
        Commands::RegisterCoin { coin_type } => {
            let executor = executor(&config, cli.dry_run)?;
            let coin_type = aliases.resolve(&coin_type);
            println!(
                "📝 Registering {coin_type} for {}...",
                executor.sender().unwrap_or_default()
            );
            let result = executor.register_coin(&coin_type).await?;
            print_result(result.as_ref());
        }
        Commands::LpBalance {
            coin_a,
            coin_b,
            address,
        } => {
            let client = AptosClient::new(&config.node)?;
            let registry = LiquidswapRegistry::new(config.registry.clone())?;
            let address = account_address(&config, address)?;

            let found = registry
                .pool_reserves(
                    &aliases.resolve(&coin_a),
                    &aliases.resolve(&coin_b),
                    config.liquidswap.curve,
                )
                .await?;
            let lp_coin = config
                .liquidswap
                .lp_coin_type(&found.pool.coin_x.type_tag, &found.pool.coin_y.type_tag);

            println!("LP coin: {lp_coin}");
            match client.coin_balance(&address, &lp_coin).await? {
                Some(balance) => println!("Balance of {address}: {balance}"),
                None => println!("{address} has no CoinStore for this LP coin"),
            }
        }
        Commands::Tx { hash } => {
            let client = AptosClient::new(&config.node)?;
            match client.transaction_by_hash(&hash).await? {
                Some(transaction) => {
                    println!("{}", serde_json::to_string_pretty(&transaction.summary())?)
                }
                None => println!("❌ Transaction {hash} not found"),
            }
        }
        Commands::Events {
            coin_type,
            address,
            withdraw,
            start,
            limit,
        } => {
            let client = AptosClient::new(&config.node)?;
            let address = account_address(&config, address)?;
            let coin_type = aliases.resolve(&coin_type);

            let handles = client.coin_event_handles(&address, &coin_type).await?;
            let creation_number = if withdraw {
                handles.withdraw
            } else {
                handles.deposit
            };
            info!(
                address = %address,
                creation_number = creation_number,
                "Reading coin events"
            );

            let events = client
                .events_by_creation_number(&address, creation_number, start, Some(limit))
                .await?;
            let details: Vec<SwapDetails> = events.iter().map(SwapDetails::from_event).collect();
            println!("✅ Fetched {} events", details.len());
            println!("{}", serde_json::to_string_pretty(&details)?);
        }
        Commands::GasPrice => {
            let client = AptosClient::new(&config.node)?;
            let estimate = client.estimate_gas_price().await?;
            println!("Gas estimate: {} octas/unit", estimate.gas_estimate);
            if let Some(low) = estimate.deprioritized_gas_estimate {
                println!("Deprioritized: {low}");
            }
            if let Some(high) = estimate.prioritized_gas_estimate {
                println!("Prioritized: {high}");
            }
        }
        Commands::AuthUrl { state } => {
            let google = GoogleOAuthClient::new(http_client()?, config.google()?);
            println!("{}", google.authorization_url(&state)?);
        }
    }

    Ok(())
}

/// Client shared by the Telegram, Google and Okto integrations.
fn http_client() -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .context("Failed to build HTTP client")
}

fn executor(config: &AppConfig, dry_run: bool) -> Result<SwapExecutor> {
    let client = Arc::new(AptosClient::new(&config.node)?);
    let registry = Arc::new(LiquidswapRegistry::new(config.registry.clone())?);
    let submitter = Arc::new(AptosSubmitter::new(
        client,
        config.account()?,
        config.submit.clone(),
    ));

    let executor = SwapExecutor::new(
        registry,
        submitter,
        PayloadBuilder::new(config.liquidswap.clone()),
        ExecutorConfig {
            slippage: config.slippage,
            dry_run,
        },
    );
    info!(
        sender = executor.sender().unwrap_or_default(),
        slippage = %config.slippage.fraction(),
        dry_run = dry_run,
        "Executor ready"
    );
    Ok(executor)
}

/// Executor for pricing only; needs neither a key nor the node.
fn quote_executor(config: &AppConfig) -> Result<SwapExecutor> {
    let registry = Arc::new(LiquidswapRegistry::new(config.registry.clone())?);
    Ok(SwapExecutor::read_only(
        registry,
        PayloadBuilder::new(config.liquidswap.clone()),
        ExecutorConfig {
            slippage: config.slippage,
            dry_run: true,
        },
    ))
}

fn dispatcher(
    config: &AppConfig,
    http: &Client,
    dry_run: bool,
    aliases: TokenAliases,
) -> Result<Arc<Dispatcher>> {
    let connector = OktoConnector::new(
        GoogleOAuthClient::new(http.clone(), config.google()?),
        OktoClient::new(http.clone(), config.okto()?),
    );
    Ok(Arc::new(Dispatcher::new(
        Arc::new(executor(config, dry_run)?),
        Arc::new(connector),
        aliases,
    )))
}

fn account_address(config: &AppConfig, address: Option<String>) -> Result<String> {
    match address {
        Some(address) => Ok(address),
        None => Ok(config.account()?.address().to_string()),
    }
}

fn print_plan(plan: &SwapPlan, from: &str, to: &str) {
    let fmt = |d: Option<Decimal>| d.map(|d| d.normalize().to_string()).unwrap_or_default();

    println!("{:<16} | {} / {}", "Pool", plan.pool.coin_x, plan.pool.coin_y);
    println!("{:<16} | {} / {}", "Reserves", plan.pool.reserve_x, plan.pool.reserve_y);
    println!("{}", "-".repeat(70));
    println!("{:<16} | {} {}", "Amount in", plan.quote.amount_in, from);
    println!("{:<16} | {} {}", "Expected out", fmt(plan.expected_out()), to);
    println!("{:<16} | {} {}", "Minimum out", fmt(plan.minimum_out()), to);
    println!("{:<16} | {}", "Slippage", plan.quote.slippage.fraction());
}

fn print_result(result: Option<&TransactionResult>) {
    match result {
        Some(result) => {
            println!("✅ Transaction {} {:?}", result.hash, result.status);
            if let Some(version) = result.version {
                println!("   version {version}, gas used {}", result.gas_used.unwrap_or_default());
            }
        }
        None => println!("Dry run, nothing was submitted."),
    }
}

fn print_liquidity(receipt: &LiquidityReceipt) -> Result<()> {
    println!(
        "{:?} on {} / {}",
        receipt.kind, receipt.pool.coin_x, receipt.pool.coin_y
    );
    println!("{}", serde_json::to_string_pretty(&receipt.payload)?);
    print_result(receipt.result.as_ref());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_needs_no_private_key() {
        let config = AppConfig::from_lookup(|_| None).unwrap();

        let quoter = quote_executor(&config).unwrap();
        assert!(quoter.sender().is_none());
        assert!(quoter.config().dry_run);

        let err = executor(&config, false).err().unwrap();
        assert!(err.to_string().contains("APTOS_PRIVATE_KEY"));
    }

}
