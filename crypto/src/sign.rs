//! Recoverable secp256k1 signing over 32-byte hashes.
//!
//! Signatures are 65 bytes: `r ‖ s ‖ v` where `v` is the recovery ID (0 or 1).
//! Nebulas does not ship public keys with transactions; the verifier recovers
//! the signer's key from the signature and compares the derived address.

use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, VerifyingKey};
use nastip_types::{PrivateKey, PublicKey, Signature};

use crate::error::CryptoError;
use crate::keys::signing_key;

/// Signature algorithm tag carried in every transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Algorithm {
    Secp256k1 = 1,
}

impl Algorithm {
    pub fn from_u32(value: u32) -> Result<Self, CryptoError> {
        match value {
            1 => Ok(Self::Secp256k1),
            other => Err(CryptoError::UnsupportedAlgorithm(other)),
        }
    }

    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

/// Sign a 32-byte hash, producing a recoverable signature.
pub fn sign_hash(hash: &[u8; 32], private_key: &PrivateKey) -> Result<Signature, CryptoError> {
    let key = signing_key(private_key)?;
    let (sig, recovery_id) = key
        .sign_prehash_recoverable(hash)
        .map_err(|e| CryptoError::Signing(e.to_string()))?;

    let mut bytes = [0u8; 65];
    bytes[..64].copy_from_slice(&sig.to_bytes());
    bytes[64] = recovery_id.to_byte();
    Ok(Signature(bytes))
}

/// Recover the signer's uncompressed public key from a hash and signature.
pub fn recover_public_key(hash: &[u8; 32], signature: &Signature) -> Result<PublicKey, CryptoError> {
    let sig = EcdsaSignature::from_slice(&signature.0[..64])
        .map_err(|_| CryptoError::InvalidSignature)?;
    let recovery_id = RecoveryId::from_byte(signature.0[64]).ok_or(CryptoError::InvalidSignature)?;

    let key = VerifyingKey::recover_from_prehash(hash, &sig, recovery_id)
        .map_err(|_| CryptoError::Recovery)?;

    let point = key.to_encoded_point(false);
    let mut bytes = [0u8; 65];
    bytes.copy_from_slice(point.as_bytes());
    Ok(PublicKey(bytes))
}
