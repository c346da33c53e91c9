//! Configuration management for the token airdrop submitter
//!
//! Loads configuration from TOML files with environment variable substitution.
//! The private key itself never lives in the file: `wallet.private_key_env`
//! names the environment variable it is read from.

use crate::chain::{Network, WaitOptions};
use crate::tx::DEFAULT_ENTRY_POINT;
use crate::types::EntryPoint;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use zeroize::Zeroizing;

/// Environment variable pointing at the config file
pub const CONFIG_PATH_ENV: &str = "TOKEN_AIRDROP_CONFIG";

/// Longest accepted `submission.expiration_secs`
pub const MAX_EXPIRATION_SECS: u64 = 3_600;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub network: NetworkConfig,
    #[serde(default)]
    pub contract: ContractConfig,
    pub airdrop: AirdropConfig,
    #[serde(default)]
    pub submission: SubmissionConfig,
    #[serde(default)]
    pub wallet: WalletConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    pub name: Network,
    /// Overrides the fullnode URL implied by `name`
    pub rest_url: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContractConfig {
    pub entry_point: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AirdropConfig {
    pub recipient: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SubmissionConfig {
    pub max_gas_amount: u64,
    /// Fetched from the network's gas estimate when unset
    pub gas_unit_price: Option<u64>,
    pub expiration_secs: u64,
    pub submit_timeout_secs: u64,
    pub wait_timeout_secs: u64,
    /// First delay between finality lookups
    pub poll_interval_ms: u64,
    pub poll_backoff_multiplier: f64,
    pub max_poll_interval_ms: u64,
    pub check_success: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WalletConfig {
    pub private_key_env: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub json: bool,
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
        }
    }
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            max_gas_amount: 200_000,
            gas_unit_price: None,
            expiration_secs: 20,
            submit_timeout_secs: 30,
            wait_timeout_secs: 20,
            poll_interval_ms: 200,
            poll_backoff_multiplier: 1.5,
            max_poll_interval_ms: 5_000,
            check_success: true,
        }
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            private_key_env: "AIRDROP_PRIVATE_KEY".to_string(),
        }
    }
}

impl SubmissionConfig {
    pub fn submit_timeout(&self) -> Duration {
        Duration::from_secs(self.submit_timeout_secs)
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    pub fn wait_options(&self) -> WaitOptions {
        WaitOptions {
            timeout: self.wait_timeout(),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            backoff_multiplier: self.poll_backoff_multiplier,
            max_poll_interval: Duration::from_millis(self.max_poll_interval_ms),
        }
    }
}

impl Settings {
    /// Load settings from the file named by `TOKEN_AIRDROP_CONFIG`
    pub fn load() -> Result<Self> {
        let config_path = env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config/default.toml"));

        Self::load_from(&config_path)
    }

    /// Load settings from a specific file
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        Self::parse(&config_str)
    }

    fn parse(config_str: &str) -> Result<Self> {
        // Substitute environment variables
        let config_str = substitute_env_vars(config_str)?;

        let settings: Settings =
            toml::from_str(&config_str).with_context(|| "Failed to parse configuration")?;

        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        self.entry_point()?;

        if self.airdrop.recipient.trim().is_empty() {
            anyhow::bail!("airdrop.recipient must be set");
        }
        let submission = &self.submission;
        if submission.max_gas_amount == 0 {
            anyhow::bail!("submission.max_gas_amount must be greater than zero");
        }
        if submission.expiration_secs == 0 || submission.expiration_secs > MAX_EXPIRATION_SECS {
            anyhow::bail!(
                "submission.expiration_secs must be between 1 and {}",
                MAX_EXPIRATION_SECS
            );
        }
        if submission.submit_timeout_secs == 0 {
            anyhow::bail!("submission.submit_timeout_secs must be greater than zero");
        }
        if submission.wait_timeout_secs == 0 {
            anyhow::bail!("submission.wait_timeout_secs must be greater than zero");
        }
        if submission.poll_interval_ms == 0 {
            anyhow::bail!("submission.poll_interval_ms must be greater than zero");
        }
        if submission.max_poll_interval_ms < submission.poll_interval_ms {
            anyhow::bail!("submission.max_poll_interval_ms must not be below poll_interval_ms");
        }
        if !submission.poll_backoff_multiplier.is_finite()
            || submission.poll_backoff_multiplier < 1.0
        {
            anyhow::bail!("submission.poll_backoff_multiplier must be at least 1.0");
        }
        if self.network.name == Network::Mainnet && self.network.rest_url.is_some() {
            tracing::warn!("network.rest_url overrides the mainnet fullnode");
        }

        Ok(())
    }

    /// Parsed entry point to call
    pub fn entry_point(&self) -> Result<EntryPoint> {
        self.contract
            .entry_point
            .parse()
            .with_context(|| "Invalid contract.entry_point")
    }

    /// Fullnode REST base URL
    pub fn rest_url(&self) -> String {
        self.network
            .rest_url
            .clone()
            .unwrap_or_else(|| self.network.name.default_rest_url().to_string())
    }

    /// Read the sender's private key from the configured environment variable
    pub fn private_key(&self) -> Result<Zeroizing<String>> {
        let var = &self.wallet.private_key_env;
        env::var(var)
            .map(Zeroizing::new)
            .with_context(|| format!("Private key not found in environment variable {}", var))
    }
}

/// Substitute environment variables in the format ${VAR_NAME}
fn substitute_env_vars(input: &str) -> Result<String> {
    let mut result = input.to_string();
    let re = regex::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")?;

    for cap in re.captures_iter(input) {
        let var_name = &cap[1];
        let var_value = env::var(var_name).unwrap_or_default();
        result = result.replace(&cap[0], &var_value);
    }

    Ok(result)
}
