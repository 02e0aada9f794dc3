//! Request and response bodies.
//!
//! Responses are decoded in two steps: first the `{"result": ..}` /
//! `{"error": ..}` envelope, then the typed inner payload. Numbers the node
//! sends as decimal strings are parsed here so callers only see typed values.

use nastip_transactions::CallPayload;
use nastip_types::{Address, NasAmount, TxHash};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::RpcError;

/// Top-level response shape of every endpoint.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Ok { result: T },
    Err { error: String },
}

impl<T> Envelope<T> {
    pub fn into_result(self) -> Result<T, RpcError> {
        match self {
            Self::Ok { result } => Ok(result),
            Self::Err { error } => Err(RpcError::Remote(error)),
        }
    }
}

/// Error body the node sends with non-2xx statuses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub execute_err: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct AccountStateRequest {
    pub address: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccountState {
    pub balance: NasAmount,
    pub nonce: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AccountStateResult {
    #[serde(deserialize_with = "u128_from_string")]
    pub balance: u128,
    #[serde(deserialize_with = "u64_from_string")]
    pub nonce: u64,
}

impl From<AccountStateResult> for AccountState {
    fn from(r: AccountStateResult) -> Self {
        Self {
            balance: NasAmount::from_wei(r.balance),
            nonce: r.nonce,
        }
    }
}

/// A simulated contract call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallRequest {
    pub from: Address,
    pub to: Address,
    pub value: NasAmount,
    pub nonce: u64,
    pub gas_price: u128,
    pub gas_limit: u128,
    pub contract: CallPayload,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CallRequestBody<'a> {
    pub from: String,
    pub to: String,
    pub value: String,
    pub nonce: u64,
    pub gas_price: String,
    pub gas_limit: String,
    pub contract: &'a CallPayload,
}

impl<'a> From<&'a CallRequest> for CallRequestBody<'a> {
    fn from(r: &'a CallRequest) -> Self {
        Self {
            from: r.from.to_string(),
            to: r.to.to_string(),
            value: r.value.wei().to_string(),
            nonce: r.nonce,
            gas_price: r.gas_price.to_string(),
            gas_limit: r.gas_limit.to_string(),
            contract: &r.contract,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CallResult {
    /// Return value of the contract function, JSON-encoded.
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub execute_err: String,
    #[serde(default)]
    pub estimate_gas: String,
}

impl CallResult {
    /// Turn a non-empty `execute_err` into an error.
    pub fn into_checked(self) -> Result<Self, RpcError> {
        if self.execute_err.is_empty() {
            Ok(self)
        } else {
            Err(RpcError::Execution(self.execute_err))
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub tx_hash: TxHash,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitResult {
    pub txhash: String,
}

impl TryFrom<SubmitResult> for SubmitReceipt {
    type Error = RpcError;

    fn try_from(r: SubmitResult) -> Result<Self, RpcError> {
        let bytes = hex::decode(&r.txhash).map_err(|e| RpcError::Decode(format!("txhash: {e}")))?;
        let tx_hash = TxHash::from_slice(&bytes)
            .ok_or_else(|| RpcError::Decode(format!("txhash must be 32 bytes, got {}", bytes.len())))?;
        Ok(Self { tx_hash })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Str(String),
    Num(u64),
}

fn u64_from_string<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    match StringOrNumber::deserialize(d)? {
        StringOrNumber::Str(s) => s.parse().map_err(serde::de::Error::custom),
        StringOrNumber::Num(n) => Ok(n),
    }
}

fn u128_from_string<'de, D: Deserializer<'de>>(d: D) -> Result<u128, D::Error> {
    match StringOrNumber::deserialize(d)? {
        StringOrNumber::Str(s) => s.parse().map_err(serde::de::Error::custom),
        StringOrNumber::Num(n) => Ok(n as u128),
    }
}
