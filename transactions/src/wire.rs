//! Wire encoding: `corepb.Transaction` protobuf, base64 (standard alphabet)
//! and the `{"data": "..."}` JSON envelope accepted by the node.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use nastip_crypto::{address_from_bytes, Algorithm};
use nastip_types::{ChainId, NasAmount, Signature, Timestamp, TxHash};
use prost::Message;
use serde::{Deserialize, Serialize};

use crate::error::TransactionError;
use crate::payload::PayloadType;
use crate::transaction::Transaction;
use crate::validation::{validate_gas_limit, validate_gas_price, validate_payload_len};

/// Protobuf messages matching the node's `corepb` definitions.
pub mod pb {
    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Data {
        #[prost(string, tag = "1")]
        pub r#type: String,
        #[prost(bytes = "vec", tag = "2")]
        pub payload: Vec<u8>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Transaction {
        #[prost(bytes = "vec", tag = "1")]
        pub hash: Vec<u8>,
        #[prost(bytes = "vec", tag = "2")]
        pub from: Vec<u8>,
        #[prost(bytes = "vec", tag = "3")]
        pub to: Vec<u8>,
        #[prost(bytes = "vec", tag = "4")]
        pub value: Vec<u8>,
        #[prost(uint64, tag = "5")]
        pub nonce: u64,
        #[prost(int64, tag = "6")]
        pub timestamp: i64,
        #[prost(message, optional, tag = "7")]
        pub data: Option<Data>,
        #[prost(uint32, tag = "8")]
        pub chain_id: u32,
        #[prost(bytes = "vec", tag = "9")]
        pub gas_price: Vec<u8>,
        #[prost(bytes = "vec", tag = "10")]
        pub gas_limit: Vec<u8>,
        #[prost(uint32, tag = "11")]
        pub alg: u32,
        #[prost(bytes = "vec", tag = "12")]
        pub sign: Vec<u8>,
    }
}

/// Body of `POST /v1/user/rawtransaction`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransaction {
    pub data: String,
}

fn u128_from_fixed(bytes: &[u8], field: &str) -> Result<u128, TransactionError> {
    let fixed: [u8; 16] = bytes
        .try_into()
        .map_err(|_| TransactionError::Decode(format!("{field} must be 16 bytes, got {}", bytes.len())))?;
    Ok(u128::from_be_bytes(fixed))
}

impl Transaction {
    pub fn to_proto(&self) -> pb::Transaction {
        let (alg, sign) = match &self.signature {
            Some((alg, sig)) => (alg.as_u32(), sig.as_bytes().to_vec()),
            None => (0, Vec::new()),
        };
        pb::Transaction {
            hash: self.hash.as_bytes().to_vec(),
            from: self.from.as_bytes().to_vec(),
            to: self.to.as_bytes().to_vec(),
            value: self.value.wei().to_be_bytes().to_vec(),
            nonce: self.nonce,
            timestamp: self.timestamp.as_secs(),
            data: Some(self.data_proto()),
            chain_id: self.chain_id.as_u32(),
            gas_price: self.gas_price.to_be_bytes().to_vec(),
            gas_limit: self.gas_limit.to_be_bytes().to_vec(),
            alg,
            sign,
        }
    }

    /// Rebuild a transaction from its protobuf form, applying the same
    /// bounds as construction. Integrity is not checked here; call
    /// [`Transaction::verify_integrity`].
    pub fn from_proto(msg: pb::Transaction) -> Result<Self, TransactionError> {
        let hash = if msg.hash.is_empty() {
            TxHash::ZERO
        } else {
            TxHash::from_slice(&msg.hash)
                .ok_or_else(|| TransactionError::Decode(format!("hash must be 32 bytes, got {}", msg.hash.len())))?
        };
        let from = address_from_bytes(&msg.from)?;
        let to = address_from_bytes(&msg.to)?;
        let value = NasAmount::from_wei(u128_from_fixed(&msg.value, "value")?);

        let data = msg
            .data
            .ok_or_else(|| TransactionError::Decode("missing data".to_string()))?;
        validate_payload_len(data.payload.len())?;
        let payload_type: PayloadType = data.r#type.parse()?;

        let gas_price = u128_from_fixed(&msg.gas_price, "gas price")?;
        validate_gas_price(gas_price)?;
        let gas_limit = u128_from_fixed(&msg.gas_limit, "gas limit")?;
        validate_gas_limit(gas_limit)?;

        let signature = if msg.sign.is_empty() {
            None
        } else {
            let alg = Algorithm::from_u32(msg.alg)?;
            let sig = Signature::from_slice(&msg.sign).ok_or_else(|| {
                TransactionError::Decode(format!("signature must be 65 bytes, got {}", msg.sign.len()))
            })?;
            Some((alg, sig))
        };

        Ok(Self {
            hash,
            from,
            to,
            value,
            nonce: msg.nonce,
            timestamp: Timestamp::new(msg.timestamp),
            payload_type,
            payload: data.payload,
            chain_id: ChainId(msg.chain_id),
            gas_price,
            gas_limit,
            signature,
        })
    }

    /// Serialize into the envelope submitted to the node.
    pub fn to_raw(&self) -> RawTransaction {
        RawTransaction {
            data: STANDARD.encode(self.to_proto().encode_to_vec()),
        }
    }

    pub fn from_raw(raw: &RawTransaction) -> Result<Self, TransactionError> {
        let bytes = STANDARD
            .decode(raw.data.as_bytes())
            .map_err(|e| TransactionError::Decode(e.to_string()))?;
        let msg = pb::Transaction::decode(bytes.as_slice())
            .map_err(|e| TransactionError::Decode(e.to_string()))?;
        Self::from_proto(msg)
    }
}
