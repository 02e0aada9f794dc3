//! The Nebulas transaction and its signing rules.
//!
//! The content hash is SHA3-256 over, in order:
//!
//! | field      | encoding                    |
//! |------------|-----------------------------|
//! | from, to   | raw 26-byte addresses       |
//! | value      | u128, 16 bytes big-endian   |
//! | nonce      | u64, 8 bytes big-endian     |
//! | timestamp  | i64, 8 bytes big-endian     |
//! | data       | protobuf `Data{type, payload}` |
//! | chain id   | u32, 4 bytes big-endian     |
//! | gas price  | u128, 16 bytes big-endian   |
//! | gas limit  | u128, 16 bytes big-endian   |
//!
//! The signature covers the hash and is never part of it.

use nastip_crypto::{derive_address, recover_public_key, sha3_256_multi, sign_hash, Algorithm};
use nastip_types::{Address, ChainId, NasAmount, PrivateKey, Signature, Timestamp, TxHash};
use prost::Message;

use crate::error::TransactionError;
use crate::payload::{Payload, PayloadType};
use crate::validation::{validate_gas_limit, validate_gas_price, validate_payload_len};
use crate::wire::pb;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub(crate) hash: TxHash,
    pub(crate) from: Address,
    pub(crate) to: Address,
    pub(crate) value: NasAmount,
    pub(crate) nonce: u64,
    pub(crate) timestamp: Timestamp,
    pub(crate) payload_type: PayloadType,
    pub(crate) payload: Vec<u8>,
    pub(crate) chain_id: ChainId,
    pub(crate) gas_price: u128,
    pub(crate) gas_limit: u128,
    pub(crate) signature: Option<(Algorithm, Signature)>,
}

impl Transaction {
    /// Build an unsigned transaction stamped with the current time.
    ///
    /// Gas bounds and payload size are checked here; nothing is clamped.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        chain_id: ChainId,
        from: Address,
        to: Address,
        value: NasAmount,
        nonce: u64,
        payload: Payload,
        gas_price: u128,
        gas_limit: u128,
    ) -> Result<Self, TransactionError> {
        validate_gas_price(gas_price)?;
        validate_gas_limit(gas_limit)?;
        let bytes = payload.encode()?;
        validate_payload_len(bytes.len())?;

        Ok(Self {
            hash: TxHash::ZERO,
            from,
            to,
            value,
            nonce,
            timestamp: Timestamp::now(),
            payload_type: payload.payload_type(),
            payload: bytes,
            chain_id,
            gas_price,
            gas_limit,
            signature: None,
        })
    }

    /// Replace the construction timestamp. Any existing signature is dropped.
    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = timestamp;
        self.hash = TxHash::ZERO;
        self.signature = None;
        self
    }

    /// Compute the content hash from the current fields.
    pub fn calc_hash(&self) -> TxHash {
        let data = self.data_proto().encode_to_vec();
        TxHash::new(sha3_256_multi(&[
            self.from.as_bytes(),
            self.to.as_bytes(),
            &self.value.wei().to_be_bytes(),
            &self.nonce.to_be_bytes(),
            &self.timestamp.as_secs().to_be_bytes(),
            &data,
            &self.chain_id.as_u32().to_be_bytes(),
            &self.gas_price.to_be_bytes(),
            &self.gas_limit.to_be_bytes(),
        ]))
    }

    /// Hash and sign with `private_key`, storing hash, signature and algorithm.
    ///
    /// Signing again overwrites the previous hash and signature; the
    /// timestamp is fixed so the result is identical.
    pub fn sign(&mut self, private_key: &PrivateKey) -> Result<(), TransactionError> {
        let hash = self.calc_hash();
        let signature = sign_hash(hash.as_bytes(), private_key)?;
        self.hash = hash;
        self.signature = Some((Algorithm::Secp256k1, signature));
        Ok(())
    }

    /// Check chain ID, hash and signer, in that order.
    pub fn verify_integrity(&self, chain_id: ChainId) -> Result<(), TransactionError> {
        if self.chain_id != chain_id {
            return Err(TransactionError::InvalidChainId {
                expected: chain_id,
                got: self.chain_id,
            });
        }
        if self.calc_hash() != self.hash {
            return Err(TransactionError::InvalidHash);
        }
        self.verify_signer()
    }

    fn verify_signer(&self) -> Result<(), TransactionError> {
        let (_, signature) = self.signature.as_ref().ok_or(TransactionError::Unsigned)?;
        let public = recover_public_key(self.hash.as_bytes(), signature)?;
        let signer = derive_address(&public);
        if signer != self.from {
            return Err(TransactionError::InvalidSigner {
                expected: self.from,
                got: signer,
            });
        }
        Ok(())
    }

    pub(crate) fn data_proto(&self) -> pb::Data {
        pb::Data {
            r#type: self.payload_type.as_str().to_string(),
            payload: self.payload.clone(),
        }
    }

    pub fn hash(&self) -> TxHash {
        self.hash
    }

    pub fn from(&self) -> &Address {
        &self.from
    }

    pub fn to(&self) -> &Address {
        &self.to
    }

    pub fn value(&self) -> NasAmount {
        self.value
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    pub fn gas_price(&self) -> u128 {
        self.gas_price
    }

    pub fn gas_limit(&self) -> u128 {
        self.gas_limit
    }

    pub fn payload_type(&self) -> PayloadType {
        self.payload_type
    }

    /// Raw payload bytes as hashed and sent on the wire.
    pub fn payload_bytes(&self) -> &[u8] {
        &self.payload
    }

    /// Decode the payload into its typed form.
    pub fn payload(&self) -> Result<Payload, TransactionError> {
        Payload::decode(self.payload_type, &self.payload)
    }

    pub fn algorithm(&self) -> Option<Algorithm> {
        self.signature.as_ref().map(|(alg, _)| *alg)
    }

    pub fn signature(&self) -> Option<&Signature> {
        self.signature.as_ref().map(|(_, sig)| sig)
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }
}
