//! Error type for parsing and validating fundamental values.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("invalid amount {0:?}: expected a positive decimal number")]
    InvalidAmount(String),

    #[error("amount {0:?} has more than 18 decimal places")]
    AmountPrecision(String),

    #[error("amount {0:?} is too large")]
    AmountOverflow(String),

    #[error("address: invalid address format")]
    InvalidAddressFormat,

    #[error("address: invalid address type {0:#04x}")]
    InvalidAddressType(u8),

    #[error("address: invalid address checksum")]
    InvalidAddressChecksum,

    #[error("invalid identifier {0:?}")]
    InvalidId(String),

    #[error("unknown network {0:?}")]
    UnknownNetwork(String),
}
