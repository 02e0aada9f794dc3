//! Cryptographic primitives for nastip.
//!
//! - **secp256k1** recoverable ECDSA for signing transactions (Nebulas algorithm `1`)
//! - **SHA3-256** for transaction hashes and address checksums
//! - **RIPEMD-160** for the hashed part of an address
//! - **AES-128** two-block record cipher for custodial keys stored on-chain

pub mod address;
pub mod encryption;
pub mod error;
pub mod hash;
pub mod keys;
pub mod sign;

pub use address::{address_from_bytes, derive_address, parse_address, validate_address};
pub use encryption::KeyCipher;
pub use error::CryptoError;
pub use hash::{ripemd160, sha3_256, sha3_256_multi};
pub use keys::{generate_keypair, keypair_from_private, public_from_private};
pub use sign::{recover_public_key, sign_hash, Algorithm};
