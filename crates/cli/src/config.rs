//! Environment configuration.

use anyhow::{Context, Result, anyhow, bail};
use rust_decimal::Decimal;
use std::fmt::Display;
use std::str::FromStr;
use tradebot_api::ServerConfig;
use tradebot_bot::telegram::DEFAULT_TELEGRAM_URL;
use tradebot_data::RegistryConfig;
use tradebot_domain::{Curve, Slippage};
use tradebot_protocols::{LiquidswapConfig, LocalAccount, NodeConfig, SubmitConfig};
use tradebot_wallet::{GoogleOAuthConfig, OktoConfig};
use tradebot_wallet::google::DEFAULT_REDIRECT_URI;
use tradebot_wallet::okto::DEFAULT_OKTO_URL;
use zeroize::Zeroizing;

/// Everything the binary reads from the environment.
///
/// Secrets are optional here; commands that need one fail when they ask for it.
pub struct AppConfig {
    pub node: NodeConfig,
    pub submit: SubmitConfig,
    pub registry: RegistryConfig,
    pub liquidswap: LiquidswapConfig,
    pub slippage: Slippage,
    pub server: ServerConfig,
    pub telegram_api_url: String,
    pub google_redirect_uri: String,
    pub okto_api_url: String,
    private_key: Option<Zeroizing<String>>,
    account_address: Option<String>,
    telegram_token: Option<Zeroizing<String>>,
    google_client_id: Option<String>,
    google_client_secret: Option<Zeroizing<String>>,
    okto_api_key: Option<Zeroizing<String>>,
    webhook_secret: Option<Zeroizing<String>>,
}

impl AppConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let secret = |name: &str| get(name).map(Zeroizing::new);

        let node = NodeConfig {
            url: get("APTOS_NODE_URL").unwrap_or_else(|| NodeConfig::default().url),
            ..NodeConfig::default()
        };

        let defaults = SubmitConfig::default();
        let submit = SubmitConfig {
            max_gas_amount: parse_or(&get, "APTOS_MAX_GAS_AMOUNT", defaults.max_gas_amount)?,
            gas_unit_price: parse_opt(&get, "APTOS_GAS_UNIT_PRICE")?,
            expiration_secs: parse_or(&get, "APTOS_TXN_EXPIRATION_SECS", defaults.expiration_secs)?,
            finality_timeout_secs: parse_or(
                &get,
                "APTOS_FINALITY_TIMEOUT_SECS",
                defaults.finality_timeout_secs,
            )?,
            poll_interval_ms: parse_or(&get, "APTOS_POLL_INTERVAL_MS", defaults.poll_interval_ms)?,
        };

        let registry = RegistryConfig {
            base_url: get("LIQUIDSWAP_REGISTRY_URL")
                .unwrap_or_else(|| RegistryConfig::default().base_url),
            ..RegistryConfig::default()
        };

        let defaults = LiquidswapConfig::default();
        let curve = match get("LIQUIDSWAP_CURVE") {
            Some(raw) => Curve::from_str(&raw).map_err(|e| anyhow!("LIQUIDSWAP_CURVE: {e}"))?,
            None => defaults.curve,
        };
        let liquidswap = LiquidswapConfig {
            modules_account: get("LIQUIDSWAP_MODULES_ACCOUNT").unwrap_or(defaults.modules_account),
            resource_account: get("LIQUIDSWAP_RESOURCE_ACCOUNT")
                .unwrap_or(defaults.resource_account),
            curve,
        };

        let slippage = match parse_opt::<Decimal, _>(&get, "SWAP_SLIPPAGE")? {
            Some(fraction) => Slippage::new(fraction).context("SWAP_SLIPPAGE")?,
            None => Slippage::default(),
        };

        let server = ServerConfig {
            bind_address: get("SERVER_BIND_ADDRESS")
                .unwrap_or_else(|| ServerConfig::default().bind_address),
            ..ServerConfig::default()
        };

        Ok(Self {
            node,
            submit,
            registry,
            liquidswap,
            slippage,
            server,
            telegram_api_url: get("TELEGRAM_API_URL")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_URL.to_string()),
            google_redirect_uri: get("GOOGLE_REDIRECT_URI")
                .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
            okto_api_url: get("OKTO_API_URL").unwrap_or_else(|| DEFAULT_OKTO_URL.to_string()),
            private_key: secret("APTOS_PRIVATE_KEY"),
            account_address: get("APTOS_ACCOUNT_ADDRESS"),
            telegram_token: secret("TELEGRAM_BOT_TOKEN"),
            google_client_id: get("GOOGLE_CLIENT_ID"),
            google_client_secret: secret("GOOGLE_CLIENT_SECRET"),
            okto_api_key: secret("OKTO_API_KEY"),
            webhook_secret: secret("WEBHOOK_SECRET_TOKEN"),
        })
    }

    /// Signing account from `APTOS_PRIVATE_KEY`, with the address override
    /// applied.
    pub fn account(&self) -> Result<LocalAccount> {
        let key = self
            .private_key
            .as_ref()
            .context("APTOS_PRIVATE_KEY must be set in .env or environment")?;
        let account = LocalAccount::from_private_key_hex(key).context("APTOS_PRIVATE_KEY")?;
        Ok(match &self.account_address {
            Some(address) => account.with_address(address.clone()),
            None => account,
        })
    }

    pub fn telegram_token(&self) -> Result<&str> {
        self.telegram_token
            .as_deref()
            .map(String::as_str)
            .context("TELEGRAM_BOT_TOKEN must be set in .env or environment")
    }

    pub fn google(&self) -> Result<GoogleOAuthConfig> {
        let (Some(id), Some(secret)) = (&self.google_client_id, &self.google_client_secret) else {
            bail!("GOOGLE_CLIENT_ID and GOOGLE_CLIENT_SECRET must be set in .env or environment");
        };
        Ok(GoogleOAuthConfig::new(id.clone(), secret.as_str())
            .with_redirect_uri(self.google_redirect_uri.clone()))
    }

    pub fn okto(&self) -> Result<OktoConfig> {
        let key = self
            .okto_api_key
            .as_ref()
            .context("OKTO_API_KEY must be set in .env or environment")?;
        let mut config = OktoConfig::new(key.as_str());
        config.base_url = self.okto_api_url.clone();
        Ok(config)
    }

    /// Shared secret for webhook deliveries, if configured.
    pub fn webhook_secret(&self) -> Option<&str> {
        self.webhook_secret.as_deref().map(String::as_str)
    }
}

fn parse_opt<T, G>(get: &G, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
    G: Fn(&str) -> Option<String>,
{
    get(name)
        .map(|raw| raw.parse::<T>().map_err(|e| anyhow!("{name}={raw}: {e}")))
        .transpose()
}

fn parse_or<T, G>(get: &G, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
    G: Fn(&str) -> Option<String>,
{
    Ok(parse_opt(get, name)?.unwrap_or(default))
}
