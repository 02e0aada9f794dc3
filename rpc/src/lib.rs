//! Client side of the Nebulas node's JSON RPC API.
//!
//! Only the three endpoints the bot needs are modelled:
//!
//! - `POST /v1/user/accountstate`: balance and nonce of an address
//! - `POST /v1/user/call`: read-only contract call (simulated, never mined)
//! - `POST /v1/user/rawtransaction`: submit a signed transaction
//!
//! [`NodeRpc`] is the seam the rest of the workspace depends on;
//! [`HttpNodeClient`] is the production implementation.

pub mod client;
pub mod error;
pub mod types;

use async_trait::async_trait;
use nastip_transactions::RawTransaction;
use nastip_types::Address;

pub use client::HttpNodeClient;
pub use error::RpcError;
pub use types::{AccountState, CallRequest, CallResult, SubmitReceipt};

/// Operations the bot performs against a Nebulas node.
#[async_trait]
pub trait NodeRpc: Send + Sync {
    /// Current balance and nonce of `address`.
    async fn account_state(&self, address: &Address) -> Result<AccountState, RpcError>;

    /// Simulate a contract call and return its result without mining it.
    async fn call(&self, request: &CallRequest) -> Result<CallResult, RpcError>;

    /// Submit a signed transaction.
    async fn send_raw_transaction(&self, raw: &RawTransaction) -> Result<SubmitReceipt, RpcError>;
}
