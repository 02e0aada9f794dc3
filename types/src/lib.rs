//! Fundamental types for the nastip tipping bot.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! addresses, hashes, NAS amounts, keys, social identifiers, chain IDs and timestamps.

pub mod address;
pub mod amount;
pub mod error;
pub mod hash;
pub mod ids;
pub mod keys;
pub mod network;
pub mod time;

pub use address::{Address, AddressKind};
pub use amount::NasAmount;
pub use error::TypesError;
pub use hash::TxHash;
pub use ids::{MessageId, UserId};
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use network::ChainId;
pub use time::Timestamp;
