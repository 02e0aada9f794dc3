//! The key storage contract.
//!
//! The contract keeps one slot per user ID and only answers to the bot's
//! own address:
//!
//! - `getAccount(id)` returns the stored record, or nothing
//! - `setAccount(id, record)` overwrites the slot
//!
//! Reads go through a simulated call (`/v1/user/call`); writes are signed
//! transactions from the bot account.

use nastip_rpc::CallRequest;
use nastip_transactions::{CallPayload, Payload, TransactionError};
use nastip_types::{Address, AddressKind, NasAmount, UserId};
use serde::Deserialize;

use crate::error::VaultError;
use crate::keystore::EncryptedKeyRecord;

pub const GET_ACCOUNT: &str = "getAccount";
pub const SET_ACCOUNT: &str = "setAccount";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyContract {
    address: Address,
}

impl KeyContract {
    pub fn new(address: Address) -> Result<Self, VaultError> {
        if address.kind() != AddressKind::Contract {
            return Err(VaultError::NotAContract(address));
        }
        Ok(Self { address })
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Simulated `getAccount(user)` call sent from the bot.
    pub fn get_account_request(
        &self,
        bot: &Address,
        user: UserId,
        gas_price: u128,
        gas_limit: u128,
    ) -> Result<CallRequest, TransactionError> {
        let id = user.to_string();
        Ok(CallRequest {
            from: *bot,
            to: self.address,
            value: NasAmount::ZERO,
            nonce: 0,
            gas_price,
            gas_limit,
            contract: CallPayload::with_string_args(GET_ACCOUNT, &[&id])?,
        })
    }

    /// Payload of the `setAccount(user, record)` transaction.
    pub fn set_account_payload(
        &self,
        user: UserId,
        record: &EncryptedKeyRecord,
    ) -> Result<Payload, TransactionError> {
        let id = user.to_string();
        let call = CallPayload::with_string_args(SET_ACCOUNT, &[&id, record.as_str()])?;
        Ok(Payload::Call(call))
    }
}

/// Shapes the `getAccount` result has been seen in.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredSlot {
    Bare(Option<String>),
    Wrapped { account: serde_json::Value },
}

/// Decode the JSON-encoded return value of `getAccount`.
///
/// Empty output, `null`, an empty string and `{"account": null}` all mean
/// the user has no record. Anything else that is not a string record is a
/// decode error.
pub fn decode_stored_record(result: &str) -> Result<Option<EncryptedKeyRecord>, VaultError> {
    let trimmed = result.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let slot: StoredSlot =
        serde_json::from_str(trimmed).map_err(|e| VaultError::Decode(format!("{e}: {trimmed}")))?;

    let text = match slot {
        StoredSlot::Bare(text) => text,
        StoredSlot::Wrapped { account } => match account {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s),
            other => {
                return Err(VaultError::Decode(format!(
                    "account field must be a string, got {other}"
                )))
            }
        },
    };
    Ok(text
        .filter(|s| !s.is_empty())
        .map(EncryptedKeyRecord::from_stored))
}
