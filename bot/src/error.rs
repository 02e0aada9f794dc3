use nastip_rpc::RpcError;
use nastip_transactions::TransactionError;
use nastip_types::TypesError;
use nastip_vault::VaultError;
use thiserror::Error;

use crate::transport::TransportError;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("{0}")]
    Vault(#[from] VaultError),

    #[error("{0}")]
    Transaction(#[from] TransactionError),

    #[error("{0}")]
    Rpc(#[from] RpcError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("invalid address: {0}")]
    InvalidAddress(TypesError),

    #[error("invalid amount: {0}")]
    InvalidAmount(TypesError),

    #[error("amount must be greater than zero")]
    ZeroAmount,

    #[error("config error: {0}")]
    Config(String),

    #[error("event stream ended")]
    StreamEnded,
}

impl BotError {
    /// Whether the user can simply repeat the action that failed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Vault(e) => e.is_retryable(),
            Self::Rpc(e) => e.is_transient(),
            _ => false,
        }
    }
}
