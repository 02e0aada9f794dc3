//! Transaction data payloads.
//!
//! The protocol carries payloads as `{type, bytes}`. Only the two types the
//! bot produces are modelled: `binary` (raw bytes, empty for plain value
//! transfers) and `call` (a JSON-encoded contract invocation).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TransactionError;
use crate::validation::validate_function_name;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PayloadType {
    Binary,
    Call,
}

impl PayloadType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Call => "call",
        }
    }
}

impl FromStr for PayloadType {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "binary" => Ok(Self::Binary),
            "call" => Ok(Self::Call),
            other => Err(TransactionError::InvalidPayloadType(other.to_string())),
        }
    }
}

impl fmt::Display for PayloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contract invocation: function name plus a JSON array of arguments,
/// itself carried as a string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallPayload {
    pub function: String,
    #[serde(default)]
    pub args: String,
}

impl CallPayload {
    pub fn new(function: impl Into<String>, args: impl Into<String>) -> Result<Self, TransactionError> {
        let call = Self {
            function: function.into(),
            args: args.into(),
        };
        call.validate()?;
        Ok(call)
    }

    /// Build a call whose arguments are the given strings, JSON-encoded.
    pub fn with_string_args(function: &str, args: &[&str]) -> Result<Self, TransactionError> {
        let args = serde_json::to_string(args).map_err(|e| TransactionError::InvalidArgs(e.to_string()))?;
        Self::new(function, args)
    }

    fn validate(&self) -> Result<(), TransactionError> {
        validate_function_name(&self.function)?;
        if !self.args.is_empty() {
            let parsed: serde_json::Value = serde_json::from_str(&self.args)
                .map_err(|e| TransactionError::InvalidArgs(e.to_string()))?;
            if !parsed.is_array() {
                return Err(TransactionError::InvalidArgs(self.args.clone()));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    Binary(Vec<u8>),
    Call(CallPayload),
}

impl Payload {
    /// Empty binary payload used by plain value transfers.
    pub fn transfer() -> Self {
        Self::Binary(Vec::new())
    }

    pub fn payload_type(&self) -> PayloadType {
        match self {
            Self::Binary(_) => PayloadType::Binary,
            Self::Call(_) => PayloadType::Call,
        }
    }

    /// Encode to the bytes carried in the transaction's data field.
    pub fn encode(&self) -> Result<Vec<u8>, TransactionError> {
        match self {
            Self::Binary(bytes) => Ok(bytes.clone()),
            Self::Call(call) => {
                serde_json::to_vec(call).map_err(|e| TransactionError::InvalidArgs(e.to_string()))
            }
        }
    }

    pub fn decode(payload_type: PayloadType, bytes: &[u8]) -> Result<Self, TransactionError> {
        match payload_type {
            PayloadType::Binary => Ok(Self::Binary(bytes.to_vec())),
            PayloadType::Call => {
                let call: CallPayload = serde_json::from_slice(bytes)
                    .map_err(|e| TransactionError::Decode(e.to_string()))?;
                call.validate()?;
                Ok(Self::Call(call))
            }
        }
    }
}
