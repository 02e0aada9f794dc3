use nastip_types::TypesError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid private key")]
    InvalidPrivateKey,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("could not recover signer from signature")]
    Recovery,

    #[error("unsupported signature algorithm {0}")]
    UnsupportedAlgorithm(u32),

    #[error("record secret must be {expected} bytes, got {got}")]
    SecretLength { expected: usize, got: usize },

    #[error("unexpected ciphertext length: expected {expected} hex chars, got {got}")]
    CiphertextLength { expected: usize, got: usize },

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error(transparent)]
    Address(#[from] TypesError),
}
