//! Account resolution and registration.

use std::sync::Arc;
use std::time::Duration;

use nastip_crypto::KeyCipher;
use nastip_rpc::{NodeRpc, SubmitReceipt};
use nastip_transactions::{Transaction, DEFAULT_GAS_PRICE};
use nastip_types::{Address, ChainId, NasAmount, UserId};

use crate::account::Account;
use crate::contract::{decode_stored_record, KeyContract};
use crate::error::VaultError;
use crate::generation_lock::GenerationLock;
use crate::keystore::EncryptedKeyRecord;

/// Default window during which a user's fresh registration is assumed to be
/// in flight.
pub const DEFAULT_GENERATION_WINDOW: Duration = Duration::from_secs(90);

#[derive(Clone, Debug)]
pub struct VaultConfig {
    pub chain_id: ChainId,
    pub contract: Address,
    pub gas_price: u128,
    pub gas_limit: u128,
    pub generation_window: Duration,
}

impl VaultConfig {
    pub fn new(chain_id: ChainId, contract: Address) -> Self {
        Self {
            chain_id,
            contract,
            gas_price: DEFAULT_GAS_PRICE,
            gas_limit: 2_000_000,
            generation_window: DEFAULT_GENERATION_WINDOW,
        }
    }
}

/// A user's account together with the on-chain nonce read when it was
/// resolved. The next transaction from it must use `nonce + 1`.
#[derive(Debug)]
pub struct ResolvedAccount {
    pub account: Account,
    pub nonce: u64,
    pub created: bool,
}

pub struct Vault {
    node: Arc<dyn NodeRpc>,
    cipher: KeyCipher,
    bot: Account,
    contract: KeyContract,
    config: VaultConfig,
    generation: GenerationLock,
}

impl Vault {
    pub fn new(
        node: Arc<dyn NodeRpc>,
        cipher: KeyCipher,
        bot: Account,
        config: VaultConfig,
    ) -> Result<Self, VaultError> {
        let contract = KeyContract::new(config.contract)?;
        let generation = GenerationLock::new(config.generation_window);
        Ok(Self {
            node,
            cipher,
            bot,
            contract,
            config,
            generation,
        })
    }

    pub fn bot_address(&self) -> &Address {
        self.bot.address()
    }

    pub fn chain_id(&self) -> ChainId {
        self.config.chain_id
    }

    pub fn gas_price(&self) -> u128 {
        self.config.gas_price
    }

    pub fn gas_limit(&self) -> u128 {
        self.config.gas_limit
    }

    pub fn node(&self) -> &Arc<dyn NodeRpc> {
        &self.node
    }

    pub fn generation_lock(&self) -> &GenerationLock {
        &self.generation
    }

    /// Look up `user`'s account, generating and registering one if the
    /// user has none yet.
    ///
    /// `requester` is the user whose action triggered the lookup; it only
    /// appears in logs. The generation lock is keyed by `user`, so lookups
    /// for one user from different requesters still register one account.
    pub async fn resolve_account(
        &self,
        user: UserId,
        requester: UserId,
    ) -> Result<ResolvedAccount, VaultError> {
        match self.fetch_record(user).await? {
            Some(record) => {
                let account = record.open(&self.cipher)?;
                let state = self.node.account_state(account.address()).await?;
                tracing::debug!(%user, address = %account.address(), nonce = state.nonce, "account resolved");
                Ok(ResolvedAccount {
                    account,
                    nonce: state.nonce,
                    created: false,
                })
            }
            None => {
                tracing::info!(%user, %requester, "no account on record, generating");
                self.generate(user).await
            }
        }
    }

    /// Look up an existing account without generating one.
    pub async fn existing_account(&self, user: UserId) -> Result<Account, VaultError> {
        let record = self
            .fetch_record(user)
            .await?
            .ok_or(VaultError::NotRegistered(user))?;
        Ok(record.open(&self.cipher)?)
    }

    /// The user's address and current on-chain balance.
    pub async fn account_balance(&self, user: UserId) -> Result<(Address, NasAmount), VaultError> {
        let account = self.existing_account(user).await?;
        let state = self.node.account_state(account.address()).await?;
        Ok((*account.address(), state.balance))
    }

    async fn fetch_record(&self, user: UserId) -> Result<Option<EncryptedKeyRecord>, VaultError> {
        let request = self.contract.get_account_request(
            self.bot.address(),
            user,
            self.config.gas_price,
            self.config.gas_limit,
        )?;
        let result = self.node.call(&request).await?;
        decode_stored_record(&result.result)
    }

    async fn generate(&self, user: UserId) -> Result<ResolvedAccount, VaultError> {
        if !self.generation.try_acquire(user).await {
            return Err(VaultError::GenerationInProgress(user));
        }

        let account = Account::generate();
        let record = EncryptedKeyRecord::seal(&self.cipher, account.private_key());
        match self.register(user, &record).await {
            Ok(receipt) => {
                tracing::info!(%user, address = %account.address(), tx_hash = %receipt.tx_hash, "account registered");
                Ok(ResolvedAccount {
                    account,
                    nonce: 0,
                    created: true,
                })
            }
            Err(e) => {
                tracing::warn!(%user, error = %e, "account registration failed");
                self.generation.release(user).await;
                Err(e)
            }
        }
    }

    /// Store `record` in `user`'s slot with a signed `setAccount` call from
    /// the bot account.
    async fn register(
        &self,
        user: UserId,
        record: &EncryptedKeyRecord,
    ) -> Result<SubmitReceipt, VaultError> {
        let state = self.node.account_state(self.bot.address()).await?;
        let payload = self.contract.set_account_payload(user, record)?;

        let mut tx = Transaction::new(
            self.config.chain_id,
            *self.bot.address(),
            *self.contract.address(),
            NasAmount::ZERO,
            state.nonce + 1,
            payload,
            self.config.gas_price,
            self.config.gas_limit,
        )?;
        tx.sign(self.bot.private_key())?;
        tx.verify_integrity(self.config.chain_id)?;

        Ok(self.node.send_raw_transaction(&tx.to_raw()).await?)
    }
}
