//! secp256k1 key and signature types.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A 65-byte uncompressed SEC1 public key (`0x04 ‖ X ‖ Y`).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PublicKey(pub [u8; 65]);

/// A 32-byte secp256k1 private scalar.
///
/// This type intentionally does not implement `Debug`, `Serialize`, or `Clone`
/// to prevent accidental exposure. Key bytes are zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(pub [u8; 32]);

/// A 65-byte recoverable ECDSA signature: `r ‖ s ‖ recovery_id`.
#[derive(Clone, PartialEq, Eq)]
pub struct Signature(pub [u8; 65]);

/// A secp256k1 key pair (public + private).
///
/// Use `nastip_crypto::generate_keypair()` or `nastip_crypto::keypair_from_private()`
/// to construct key pairs. This struct is intentionally just data.
pub struct KeyPair {
    pub public: PublicKey,
    pub private: PrivateKey,
}

impl PublicKey {
    pub const LEN: usize = 65;

    pub fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }
}

impl PrivateKey {
    pub const LEN: usize = 32;

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl Signature {
    pub const LEN: usize = 65;

    pub fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }

    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        bytes.try_into().ok().map(Self)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({}..)", hex::encode(&self.0[1..9]))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}..)", hex::encode(&self.0[..8]))
    }
}
