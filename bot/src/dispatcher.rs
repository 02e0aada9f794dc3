//! Routes inbound social events.
//!
//! Events are handled strictly in arrival order on the draining task.
//! Anything that only touches the intent store happens inline, so a "yes"
//! always sees the mention that preceded it. Anything that touches the
//! network (chain lookups, submissions, replies) is spawned.

use std::sync::Arc;

use futures_util::{pin_mut, Stream, StreamExt};
use nastip_types::UserId;
use nastip_vault::VaultError;
use tokio::task::JoinHandle;

use crate::commands::{parse_command, parse_confirmation, Command};
use crate::confirmation::{Confirmations, Resolution, TipRequest};
use crate::error::BotError;
use crate::mention::parse_mention;
use crate::replies;
use crate::tipper::Tipper;
use crate::transport::{Event, EventKind, Transport, TransportError};

pub struct Dispatcher {
    bot_handle: String,
    bot_user_id: UserId,
    confirmations: Arc<Confirmations>,
    tipper: Arc<Tipper>,
    transport: Arc<dyn Transport>,
}

impl Dispatcher {
    pub fn new(
        bot_handle: impl Into<String>,
        bot_user_id: UserId,
        confirmations: Arc<Confirmations>,
        tipper: Arc<Tipper>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            bot_handle: bot_handle.into(),
            bot_user_id,
            confirmations,
            tipper,
            transport,
        }
    }

    /// Drain `events` until the stream fails or ends. Both are fatal.
    ///
    /// An event that fails to decode is logged and skipped.
    pub async fn run<S>(&self, events: S) -> Result<(), BotError>
    where
        S: Stream<Item = Result<Event, TransportError>>,
    {
        pin_mut!(events);
        tracing::info!(bot = %self.bot_handle, "dispatcher started");
        while let Some(item) = events.next().await {
            let event = match item {
                Ok(event) => event,
                Err(TransportError::Decode(error)) => {
                    tracing::warn!(%error, "skipping malformed event");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            // Spawned work is detached and reports its own failures.
            self.handle(event).await;
        }
        Err(BotError::StreamEnded)
    }

    /// Handle one event. Returns the spawned side-effect task, if any.
    pub async fn handle(&self, event: Event) -> Option<JoinHandle<()>> {
        if event.sender_id == self.bot_user_id {
            return None;
        }
        match event.kind {
            EventKind::Mention => self.handle_mention(event).await,
            EventKind::DirectMessage => self.handle_direct(event).await,
        }
    }

    async fn handle_mention(&self, event: Event) -> Option<JoinHandle<()>> {
        let (Some(recipient_id), Some(recipient_handle), Some(reply_to)) = (
            event.recipient_id,
            event.recipient_handle,
            event.reply_to_message_id,
        ) else {
            return None;
        };
        if reply_to.is_none() || recipient_id == event.sender_id || recipient_id == self.bot_user_id
        {
            return None;
        }

        let amount = match parse_mention(&event.text, &self.bot_handle) {
            Ok(amount) => amount,
            Err(e) => {
                tracing::debug!(message_id = %event.message_id, error = %e, "ignoring mention");
                return None;
            }
        };

        let proposal = self
            .confirmations
            .propose(TipRequest {
                message_id: event.message_id,
                sender_id: event.sender_id,
                sender_handle: event.sender_handle,
                recipient_id,
                recipient_handle,
                amount,
            })
            .await;
        Some(proposal.into_task())
    }

    async fn handle_direct(&self, event: Event) -> Option<JoinHandle<()>> {
        let sender = event.sender_id;

        if let Some(response) = parse_confirmation(&event.text) {
            return match self.confirmations.resolve(sender, response).await {
                Resolution::Confirmed(intent) => {
                    let tipper = Arc::clone(&self.tipper);
                    Some(tokio::spawn(async move { tipper.run_confirmed(intent).await }))
                }
                Resolution::Canceled(_) => Some(self.reply(sender, replies::CANCELED.to_string())),
                Resolution::Unmatched => None,
            };
        }

        let command = match parse_command(&event.text) {
            Ok(command) => command,
            Err(e) => {
                tracing::info!(%sender, error = %e, "rejected command");
                return Some(self.reply(sender, replies::command_failed(&e)));
            }
        };
        tracing::debug!(%sender, ?command, "command");

        let task = match command {
            Command::Help | Command::Unknown => self.reply(sender, replies::HELP.to_string()),
            Command::TransferUsage => self.reply(sender, replies::TRANSFER_USAGE.to_string()),
            Command::Address => {
                let tipper = Arc::clone(&self.tipper);
                let transport = Arc::clone(&self.transport);
                tokio::spawn(async move {
                    let text = match tipper.vault().resolve_account(sender, sender).await {
                        Ok(resolved) => replies::your_address(resolved.account.address()),
                        Err(e) => {
                            tracing::warn!(%sender, error = %e, "address lookup failed");
                            replies::command_failed(&BotError::from(e))
                        }
                    };
                    send_direct(transport.as_ref(), sender, &text).await;
                })
            }
            Command::Balance => {
                let tipper = Arc::clone(&self.tipper);
                let transport = Arc::clone(&self.transport);
                tokio::spawn(async move {
                    let text = match tipper.vault().account_balance(sender).await {
                        Ok((address, balance)) => replies::your_balance(&address, balance),
                        Err(VaultError::NotRegistered(_)) => replies::NO_ACCOUNT.to_string(),
                        Err(e) => {
                            tracing::warn!(%sender, error = %e, "balance lookup failed");
                            replies::command_failed(&BotError::from(e))
                        }
                    };
                    send_direct(transport.as_ref(), sender, &text).await;
                })
            }
            Command::Transfer { to, amount } => {
                let tipper = Arc::clone(&self.tipper);
                tokio::spawn(async move { tipper.run_transfer(sender, to, amount).await })
            }
        };
        Some(task)
    }

    fn reply(&self, user: UserId, text: String) -> JoinHandle<()> {
        let transport = Arc::clone(&self.transport);
        tokio::spawn(async move { send_direct(transport.as_ref(), user, &text).await })
    }
}

async fn send_direct(transport: &dyn Transport, user: UserId, text: &str) {
    if let Err(e) = transport.send_direct(user, text).await {
        tracing::warn!(%user, error = %e, "failed to send direct message");
    }
}
