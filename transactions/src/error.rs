use nastip_crypto::CryptoError;
use nastip_types::{Address, ChainId, TypesError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("invalid gas price {0}, should be in (0, 10^12]")]
    InvalidGasPrice(u128),

    #[error("invalid gas limit {0}, should be in (0, 5*10^10]")]
    InvalidGasLimit(u128),

    #[error("payload is {len} bytes, max is {max}")]
    PayloadTooLarge { len: usize, max: usize },

    #[error("invalid payload type: {0:?}")]
    InvalidPayloadType(String),

    #[error("invalid function of call payload: {0:?}")]
    InvalidFunction(String),

    #[error("call arguments must be a JSON array: {0}")]
    InvalidArgs(String),

    #[error("invalid transaction chain id: expected {expected}, got {got}")]
    InvalidChainId { expected: ChainId, got: ChainId },

    #[error("invalid transaction hash")]
    InvalidHash,

    #[error("invalid transaction signer: expected {expected}, recovered {got}")]
    InvalidSigner { expected: Address, got: Address },

    #[error("transaction is not signed")]
    Unsigned,

    #[error("wire decode failed: {0}")]
    Decode(String),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Address(#[from] TypesError),
}
