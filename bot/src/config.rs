//! Bot configuration with TOML file support.
//!
//! Secrets (the record cipher secret and the bot's private key) are never
//! part of this file; the daemon reads them from the environment.

use std::path::Path;
use std::time::Duration;

use nastip_types::{ChainId, UserId};
use nastip_utils::LogFormat;
use serde::{Deserialize, Serialize};

use crate::BotError;

/// Configuration for a tipping bot instance.
///
/// Can be loaded from a TOML file via [`BotConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BotConfig {
    /// Chain transactions are signed for.
    #[serde(default = "default_chain_id")]
    pub chain_id: ChainId,

    /// Base URL of the node's HTTP API.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Base58 address of the key storage contract.
    #[serde(default = "default_contract_address")]
    pub contract_address: String,

    /// The bot's handle on the social network, without the `@`.
    #[serde(default = "default_bot_handle")]
    pub bot_handle: String,

    /// The bot's own user ID; its posts are ignored.
    #[serde(default = "default_bot_user_id")]
    pub bot_user_id: UserId,

    /// Gas price for every transaction, in wei.
    #[serde(default = "default_gas_price")]
    pub gas_price: u64,

    /// Gas limit for every transaction.
    #[serde(default = "default_gas_limit")]
    pub gas_limit: u64,

    /// How long a tip waits for "yes" before defaulting to "no".
    #[serde(default = "default_confirmation_timeout_secs")]
    pub confirmation_timeout_secs: u64,

    /// How long a freshly registered user is locked against re-generation.
    #[serde(default = "default_generation_window_secs")]
    pub generation_window_secs: u64,

    /// Total timeout of one RPC request.
    #[serde(default = "default_rpc_timeout_secs")]
    pub rpc_timeout_secs: u64,

    /// Connect timeout of one RPC request.
    #[serde(default = "default_rpc_connect_timeout_secs")]
    pub rpc_connect_timeout_secs: u64,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_chain_id() -> ChainId {
    ChainId::MAINNET
}

fn default_rpc_url() -> String {
    "https://mainnet.nebulas.io".to_string()
}

fn default_contract_address() -> String {
    "n1kWMooMHDAnLQXe6pLdZ6xDRBXCVJHuPcJ".to_string()
}

fn default_bot_handle() -> String {
    "NebBot".to_string()
}

fn default_bot_user_id() -> UserId {
    UserId(997_554_387_227_684_865)
}

fn default_gas_price() -> u64 {
    1_000_000
}

fn default_gas_limit() -> u64 {
    2_000_000
}

fn default_confirmation_timeout_secs() -> u64 {
    300
}

fn default_generation_window_secs() -> u64 {
    90
}

fn default_rpc_timeout_secs() -> u64 {
    30
}

fn default_rpc_connect_timeout_secs() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl BotConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, BotError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| BotError::Config(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, BotError> {
        toml::from_str(s).map_err(|e| BotError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, BotError> {
        toml::to_string_pretty(self).map_err(|e| BotError::Config(e.to_string()))
    }

    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs)
    }

    pub fn generation_window(&self) -> Duration {
        Duration::from_secs(self.generation_window_secs)
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }

    pub fn rpc_connect_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_connect_timeout_secs)
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            chain_id: default_chain_id(),
            rpc_url: default_rpc_url(),
            contract_address: default_contract_address(),
            bot_handle: default_bot_handle(),
            bot_user_id: default_bot_user_id(),
            gas_price: default_gas_price(),
            gas_limit: default_gas_limit(),
            confirmation_timeout_secs: default_confirmation_timeout_secs(),
            generation_window_secs: default_generation_window_secs(),
            rpc_timeout_secs: default_rpc_timeout_secs(),
            rpc_connect_timeout_secs: default_rpc_connect_timeout_secs(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}
