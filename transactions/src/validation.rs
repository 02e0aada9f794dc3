//! Protocol bounds enforced before a transaction is built or accepted off
//! the wire. Values outside the bounds are rejected, never clamped.

use crate::error::TransactionError;

/// Maximum gas price: 10^12 wei.
pub const MAX_GAS_PRICE: u128 = 1_000_000_000_000;

/// Maximum gas limit: 5 * 10^10.
pub const MAX_GAS_LIMIT: u128 = 50_000_000_000;

/// Default gas price used by the node: 10^6 wei.
pub const DEFAULT_GAS_PRICE: u128 = 1_000_000;

/// Minimum gas consumed by any transaction.
pub const MIN_GAS_PER_TX: u128 = 20_000;

/// Maximum payload length in bytes (128 KiB).
pub const MAX_PAYLOAD_LEN: usize = 128 * 1024;

pub fn validate_gas_price(gas_price: u128) -> Result<(), TransactionError> {
    if gas_price == 0 || gas_price > MAX_GAS_PRICE {
        return Err(TransactionError::InvalidGasPrice(gas_price));
    }
    Ok(())
}

pub fn validate_gas_limit(gas_limit: u128) -> Result<(), TransactionError> {
    if gas_limit == 0 || gas_limit > MAX_GAS_LIMIT {
        return Err(TransactionError::InvalidGasLimit(gas_limit));
    }
    Ok(())
}

pub fn validate_payload_len(len: usize) -> Result<(), TransactionError> {
    if len > MAX_PAYLOAD_LEN {
        return Err(TransactionError::PayloadTooLarge {
            len,
            max: MAX_PAYLOAD_LEN,
        });
    }
    Ok(())
}

/// Contract function names must match `^[a-zA-Z$][A-Za-z0-9_$]*$`.
pub fn validate_function_name(name: &str) -> Result<(), TransactionError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    };
    if !valid {
        return Err(TransactionError::InvalidFunction(name.to_string()));
    }
    Ok(())
}
