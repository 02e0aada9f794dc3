use nastip_crypto::CryptoError;
use nastip_rpc::RpcError;
use nastip_transactions::TransactionError;
use nastip_types::{Address, UserId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("user {0} has no registered account")]
    NotRegistered(UserId),

    #[error("an address is already being generated for user {0}, please retry shortly")]
    GenerationInProgress(UserId),

    #[error("{0} is not a contract address")]
    NotAContract(Address),

    #[error("malformed account record: {0}")]
    Decode(String),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

impl VaultError {
    /// Whether the same request may succeed if the user repeats it.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::GenerationInProgress(_) => true,
            Self::Rpc(e) => e.is_transient(),
            _ => false,
        }
    }
}
