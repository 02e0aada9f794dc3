//! Wires the bot's components together from a [`BotConfig`].

use std::sync::Arc;

use futures_util::Stream;
use nastip_crypto::{parse_address, KeyCipher};
use nastip_rpc::NodeRpc;
use nastip_utils::format_duration;
use nastip_vault::{Account, Vault, VaultConfig};

use crate::config::BotConfig;
use crate::confirmation::{Confirmations, InMemoryIntentStore, IntentStore};
use crate::dispatcher::Dispatcher;
use crate::error::BotError;
use crate::shutdown::ShutdownController;
use crate::tipper::Tipper;
use crate::transport::{Event, Transport, TransportError};

pub struct TipBot {
    dispatcher: Dispatcher,
    confirmations: Arc<Confirmations>,
    vault: Arc<Vault>,
}

impl TipBot {
    pub fn new(
        config: &BotConfig,
        node: Arc<dyn NodeRpc>,
        cipher: KeyCipher,
        bot_account: Account,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, BotError> {
        Self::with_store(
            config,
            node,
            cipher,
            bot_account,
            transport,
            Arc::new(InMemoryIntentStore::new()),
        )
    }

    pub fn with_store(
        config: &BotConfig,
        node: Arc<dyn NodeRpc>,
        cipher: KeyCipher,
        bot_account: Account,
        transport: Arc<dyn Transport>,
        store: Arc<dyn IntentStore>,
    ) -> Result<Self, BotError> {
        let contract = parse_address(&config.contract_address).map_err(BotError::InvalidAddress)?;
        let vault_config = VaultConfig {
            chain_id: config.chain_id,
            contract,
            gas_price: u128::from(config.gas_price),
            gas_limit: u128::from(config.gas_limit),
            generation_window: config.generation_window(),
        };
        let vault = Arc::new(Vault::new(node, cipher, bot_account, vault_config)?);

        let confirmations = Arc::new(Confirmations::new(
            store,
            Arc::clone(&transport),
            config.confirmation_timeout(),
        ));
        let tipper = Arc::new(Tipper::new(Arc::clone(&vault), Arc::clone(&transport)));
        let dispatcher = Dispatcher::new(
            config.bot_handle.clone(),
            config.bot_user_id,
            Arc::clone(&confirmations),
            tipper,
            transport,
        );

        tracing::info!(
            chain = %config.chain_id,
            bot_address = %vault.bot_address(),
            contract = %contract,
            confirmation_timeout = %format_duration(config.confirmation_timeout()),
            "tip bot ready"
        );
        Ok(Self {
            dispatcher,
            confirmations,
            vault,
        })
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn confirmations(&self) -> &Arc<Confirmations> {
        &self.confirmations
    }

    pub fn vault(&self) -> &Arc<Vault> {
        &self.vault
    }

    /// Drain `events` until they end, fail, or `shutdown` fires.
    ///
    /// A requested shutdown returns `Ok`; everything else is an error.
    pub async fn run<S>(&self, events: S, shutdown: &ShutdownController) -> Result<(), BotError>
    where
        S: Stream<Item = Result<Event, TransportError>>,
    {
        tokio::select! {
            result = self.dispatcher.run(events) => result,
            _ = shutdown.stopped() => {
                let pending = self.confirmations.store().len().await;
                tracing::info!(pending, "dispatcher stopped");
                Ok(())
            }
        }
    }
}
