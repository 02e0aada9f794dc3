//! Social-network transport seam.
//!
//! The bot never talks to a social network directly. Inbound activity
//! arrives as a stream of [`Event`]s and outbound messages go through the
//! [`Transport`] trait, so any adapter (the JSON-lines sidecar, a test
//! double) can drive it.

use std::sync::Mutex;

use async_trait::async_trait;
use nastip_types::{MessageId, UserId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A public post mentioning the bot.
    Mention,
    /// A private message addressed to the bot.
    DirectMessage,
}

/// One inbound social-network event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    pub message_id: MessageId,
    pub sender_id: UserId,
    pub sender_handle: String,
    /// Author of the post this mention replies to.
    #[serde(default)]
    pub recipient_id: Option<UserId>,
    #[serde(default)]
    pub recipient_handle: Option<String>,
    pub text: String,
    #[serde(default)]
    pub reply_to_message_id: Option<MessageId>,
}

impl Event {
    pub fn direct_message(sender_id: UserId, sender_handle: &str, text: &str) -> Self {
        Self {
            kind: EventKind::DirectMessage,
            message_id: MessageId(0),
            sender_id,
            sender_handle: sender_handle.to_string(),
            recipient_id: None,
            recipient_handle: None,
            text: text.to_string(),
            reply_to_message_id: None,
        }
    }

    /// A public mention replying to `recipient`'s post `reply_to`.
    pub fn mention(
        message_id: MessageId,
        sender: (UserId, &str),
        recipient: (UserId, &str),
        reply_to: MessageId,
        text: &str,
    ) -> Self {
        Self {
            kind: EventKind::Mention,
            message_id,
            sender_id: sender.0,
            sender_handle: sender.1.to_string(),
            recipient_id: Some(recipient.0),
            recipient_handle: Some(recipient.1.to_string()),
            text: text.to_string(),
            reply_to_message_id: Some(reply_to),
        }
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed event: {0}")]
    Decode(String),

    #[error("transport closed")]
    Closed,
}

/// Outbound half of the social network.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a private message to `user`.
    async fn send_direct(&self, user: UserId, text: &str) -> Result<(), TransportError>;

    /// Publish a post, optionally as a reply to `in_reply_to`.
    async fn post_public(
        &self,
        text: &str,
        in_reply_to: Option<MessageId>,
    ) -> Result<(), TransportError>;
}

/// A message the bot sent, as recorded by [`NullTransport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outbound {
    Direct { user: UserId, text: String },
    Public { text: String, in_reply_to: Option<MessageId> },
}

/// In-memory transport that records every outbound message.
#[derive(Default)]
pub struct NullTransport {
    sent: Mutex<Vec<Outbound>>,
    fail_all: Mutex<bool>,
}

impl NullTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send fail with [`TransportError::Closed`].
    pub fn fail_all(&self, fail: bool) {
        *self.fail_all.lock().unwrap() = fail;
    }

    pub fn sent(&self) -> Vec<Outbound> {
        self.sent.lock().unwrap().clone()
    }

    /// Texts of all direct messages sent to `user`, oldest first.
    pub fn directs_to(&self, user: UserId) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter_map(|m| match m {
                Outbound::Direct { user: u, text } if *u == user => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn public_posts(&self) -> Vec<(String, Option<MessageId>)> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter_map(|m| match m {
                Outbound::Public { text, in_reply_to } => Some((text.clone(), *in_reply_to)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, message: Outbound) -> Result<(), TransportError> {
        if *self.fail_all.lock().unwrap() {
            return Err(TransportError::Closed);
        }
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

#[async_trait]
impl Transport for NullTransport {
    async fn send_direct(&self, user: UserId, text: &str) -> Result<(), TransportError> {
        self.record(Outbound::Direct {
            user,
            text: text.to_string(),
        })
    }

    async fn post_public(
        &self,
        text: &str,
        in_reply_to: Option<MessageId>,
    ) -> Result<(), TransportError> {
        self.record(Outbound::Public {
            text: text.to_string(),
            in_reply_to,
        })
    }
}
