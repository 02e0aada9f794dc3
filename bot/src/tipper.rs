//! Executes transfers once they are approved.

use std::sync::Arc;

use nastip_rpc::SubmitReceipt;
use nastip_transactions::{Payload, Transaction};
use nastip_types::{Address, NasAmount, UserId};
use nastip_vault::{ResolvedAccount, Vault};

use crate::confirmation::PendingIntent;
use crate::error::BotError;
use crate::replies;
use crate::transport::Transport;

pub struct Tipper {
    vault: Arc<Vault>,
    transport: Arc<dyn Transport>,
}

impl Tipper {
    pub fn new(vault: Arc<Vault>, transport: Arc<dyn Transport>) -> Self {
        Self { vault, transport }
    }

    pub fn vault(&self) -> &Arc<Vault> {
        &self.vault
    }

    /// Send `amount` from `sender`'s custodial account to `to`.
    pub async fn transfer(
        &self,
        sender: UserId,
        to: Address,
        amount: NasAmount,
    ) -> Result<SubmitReceipt, BotError> {
        let from = self.vault.resolve_account(sender, sender).await?;
        self.submit(&from, to, amount).await
    }

    /// Move a confirmed tip between the two users' accounts, creating either
    /// account if it does not exist yet.
    pub async fn tip(&self, intent: &PendingIntent) -> Result<SubmitReceipt, BotError> {
        let from = self
            .vault
            .resolve_account(intent.sender_id, intent.sender_id)
            .await?;
        let to = self
            .vault
            .resolve_account(intent.recipient_id, intent.sender_id)
            .await?;
        self.submit(&from, *to.account.address(), intent.amount)
            .await
    }

    /// Carry out a confirmed tip and report the outcome to everyone involved.
    pub async fn run_confirmed(&self, intent: PendingIntent) {
        let sender = intent.sender_id;
        self.direct(sender, replies::STARTING).await;

        match self.tip(&intent).await {
            Ok(receipt) => {
                tracing::info!(
                    %sender,
                    recipient = %intent.recipient_id,
                    amount = %intent.amount,
                    tx_hash = %receipt.tx_hash,
                    "tip submitted"
                );
                let explorer = self.vault.chain_id().explorer_url();
                self.direct(sender, &replies::transaction_sent(&receipt.tx_hash, explorer))
                    .await;

                let ack = replies::public_ack(
                    &intent.sender_handle,
                    intent.amount,
                    &intent.recipient_handle,
                    &receipt.tx_hash,
                );
                if let Err(e) = self.transport.post_public(&ack, Some(intent.message_id)).await {
                    tracing::warn!(%sender, error = %e, "failed to post acknowledgment");
                }

                self.direct(
                    intent.recipient_id,
                    &replies::tip_received(&intent.sender_handle, intent.amount, &receipt.tx_hash),
                )
                .await;
            }
            Err(e) => {
                tracing::warn!(%sender, intent_id = intent.id, error = %e, "tip failed");
                self.direct(sender, &replies::transaction_failed(&e)).await;
            }
        }
    }

    /// Carry out a `transfer` command and report the outcome to its sender.
    pub async fn run_transfer(&self, sender: UserId, to: Address, amount: NasAmount) {
        match self.transfer(sender, to, amount).await {
            Ok(receipt) => {
                tracing::info!(%sender, %to, %amount, tx_hash = %receipt.tx_hash, "transfer submitted");
                let explorer = self.vault.chain_id().explorer_url();
                self.direct(sender, &replies::transaction_sent(&receipt.tx_hash, explorer))
                    .await;
            }
            Err(e) => {
                tracing::warn!(%sender, %to, error = %e, "transfer failed");
                self.direct(sender, &replies::transaction_failed(&e)).await;
            }
        }
    }

    async fn submit(
        &self,
        from: &ResolvedAccount,
        to: Address,
        amount: NasAmount,
    ) -> Result<SubmitReceipt, BotError> {
        let chain_id = self.vault.chain_id();
        let mut tx = Transaction::new(
            chain_id,
            *from.account.address(),
            to,
            amount,
            from.nonce + 1,
            Payload::transfer(),
            self.vault.gas_price(),
            self.vault.gas_limit(),
        )?;
        tx.sign(from.account.private_key())?;
        tx.verify_integrity(chain_id)?;

        Ok(self.vault.node().send_raw_transaction(&tx.to_raw()).await?)
    }

    async fn direct(&self, user: UserId, text: &str) {
        if let Err(e) = self.transport.send_direct(user, text).await {
            tracing::warn!(%user, error = %e, "failed to send direct message");
        }
    }
}
