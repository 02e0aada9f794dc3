//! The tipping bot.
//!
//! Users tip each other by mentioning the bot (`@NebBot send 2.5 NAS` in
//! reply to someone's post) and confirming by DM. They manage their
//! custodial account with DM commands (`address`, `balance`,
//! `transfer <address> <amount>`).
//!
//! - [`dispatcher`]: routes inbound events in order
//! - [`confirmation`]: pending intents and their expiry
//! - [`tipper`]: builds, signs and submits transfers
//! - [`transport`] / [`line_transport`]: the social-network seam
//! - [`service::TipBot`]: wires it all from a [`BotConfig`]

pub mod commands;
pub mod config;
pub mod confirmation;
pub mod dispatcher;
pub mod error;
pub mod line_transport;
pub mod mention;
pub mod replies;
pub mod service;
pub mod shutdown;
pub mod tipper;
pub mod transport;

pub use config::BotConfig;
pub use confirmation::{Confirmations, InMemoryIntentStore, IntentStore, PendingIntent};
pub use dispatcher::Dispatcher;
pub use error::BotError;
pub use line_transport::{event_stream, LineTransport};
pub use service::TipBot;
pub use shutdown::ShutdownController;
pub use tipper::Tipper;
pub use transport::{Event, EventKind, NullTransport, Transport, TransportError};
