//! nastip daemon: runs the tipping bot.
//!
//! Inbound events are read as JSON lines from stdin and outbound messages
//! are written as JSON lines to stdout; logs go to stderr.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use nastip_bot::{event_stream, BotConfig, LineTransport, ShutdownController, TipBot};
use nastip_crypto::KeyCipher;
use nastip_rpc::HttpNodeClient;
use nastip_types::{ChainId, UserId};
use nastip_utils::LogFormat;
use nastip_vault::Account;

#[derive(Parser)]
#[command(name = "nastip", about = "NAS tipping bot")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "NASTIP_CONFIG")]
    config: Option<PathBuf>,

    /// Chain ID: "mainnet", "testnet" or a number.
    #[arg(long, env = "NASTIP_CHAIN_ID")]
    chain_id: Option<ChainId>,

    /// Node RPC base URL.
    #[arg(long, env = "NASTIP_RPC_URL")]
    rpc_url: Option<String>,

    /// Key storage contract address.
    #[arg(long, env = "NASTIP_CONTRACT")]
    contract: Option<String>,

    /// The bot's handle, without the `@`.
    #[arg(long, env = "NASTIP_BOT_HANDLE")]
    bot_handle: Option<String>,

    /// The bot's user ID.
    #[arg(long, env = "NASTIP_BOT_USER_ID")]
    bot_user_id: Option<UserId>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "NASTIP_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "NASTIP_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the bot.
    Run {
        /// 16-byte secret for the stored key records.
        #[arg(long, env = "NASTIP_SECRET", hide_env_values = true)]
        secret: String,

        /// Hex private key of the bot account that owns the contract.
        #[arg(long, env = "NASTIP_BOT_KEY", hide_env_values = true)]
        bot_key: String,
    },
    /// Print the effective configuration as TOML.
    PrintConfig,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<BotConfig> {
        let mut config = match &self.config {
            Some(path) => BotConfig::from_toml_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => BotConfig::default(),
        };

        if let Some(chain_id) = self.chain_id {
            config.chain_id = chain_id;
            if self.rpc_url.is_none() && self.config.is_none() {
                if let Some(url) = chain_id.default_rpc_url() {
                    config.rpc_url = url.to_string();
                }
            }
        }
        if let Some(url) = &self.rpc_url {
            config.rpc_url = url.clone();
        }
        if let Some(contract) = &self.contract {
            config.contract_address = contract.clone();
        }
        if let Some(handle) = &self.bot_handle {
            config.bot_handle = handle.trim_start_matches('@').to_string();
        }
        if let Some(id) = self.bot_user_id {
            config.bot_user_id = id;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;

    match cli.command {
        Command::PrintConfig => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
        Command::Run { secret, bot_key } => {
            nastip_utils::init_tracing(config.log_format, &config.log_level)?;
            run(config, &secret, &bot_key).await
        }
    }
}

async fn run(config: BotConfig, secret: &str, bot_key: &str) -> anyhow::Result<()> {
    let cipher = KeyCipher::new(secret.as_bytes()).context("invalid NASTIP_SECRET")?;
    let bot_account = Account::from_hex(bot_key).context("invalid NASTIP_BOT_KEY")?;

    let node = Arc::new(
        HttpNodeClient::new(
            &config.rpc_url,
            config.rpc_timeout(),
            config.rpc_connect_timeout(),
        )
        .context("building RPC client")?,
    );
    let transport = Arc::new(LineTransport::new(tokio::io::stdout()));
    let bot = TipBot::new(&config, node, cipher, bot_account, transport)?;

    let shutdown = Arc::new(ShutdownController::new());
    let signals = {
        let shutdown = Arc::clone(&shutdown);
        tokio::spawn(async move { shutdown.wait_for_signal().await })
    };

    tracing::info!(
        chain = %config.chain_id,
        rpc = %config.rpc_url,
        handle = %config.bot_handle,
        "starting nastip"
    );
    let events = event_stream(tokio::io::BufReader::new(tokio::io::stdin()));
    let result = bot.run(events, &shutdown).await;
    signals.abort();

    result?;
    tracing::info!("nastip exited cleanly");
    Ok(())
}
