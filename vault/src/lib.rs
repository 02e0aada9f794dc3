//! Custodial address and key vault.
//!
//! Every social user owns one Nebulas account whose private key the bot
//! holds. Keys are never stored locally: each one is encrypted with the
//! record cipher and kept in a storage contract, one slot per user ID.
//!
//! - [`Vault::resolve_account`] looks a user's key up, or generates and
//!   registers a fresh one the first time the user is seen
//! - [`GenerationLock`] stops two concurrent lookups from registering two
//!   different keys for the same user
//! - [`contract`] builds the `getAccount`/`setAccount` calls and decodes the
//!   stored slot

pub mod account;
pub mod contract;
pub mod error;
pub mod generation_lock;
pub mod keystore;
pub mod vault;

pub use account::Account;
pub use contract::KeyContract;
pub use error::VaultError;
pub use generation_lock::GenerationLock;
pub use keystore::EncryptedKeyRecord;
pub use vault::{ResolvedAccount, Vault, VaultConfig};
