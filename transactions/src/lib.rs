//! Nebulas transactions: construction, signing, integrity checks and the
//! protobuf wire format submitted through `/v1/user/rawtransaction`.
//!
//! - **Payload**: `binary` (plain transfers) or `call` (contract invocation)
//! - **Transaction**: bounds-checked construction, SHA3-256 content hash,
//!   recoverable secp256k1 signature
//! - **Wire**: `corepb.Transaction` protobuf, base64, `{"data": "..."}` envelope
//!
//! Nothing in this crate performs network I/O.

pub mod error;
pub mod payload;
pub mod transaction;
pub mod validation;
pub mod wire;

pub use error::TransactionError;
pub use payload::{CallPayload, Payload, PayloadType};
pub use transaction::Transaction;
pub use validation::{DEFAULT_GAS_PRICE, MAX_GAS_LIMIT, MAX_GAS_PRICE, MAX_PAYLOAD_LEN};
pub use wire::RawTransaction;
