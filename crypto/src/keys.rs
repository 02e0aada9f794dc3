//! secp256k1 key generation.

use k256::ecdsa::SigningKey;
use nastip_types::{KeyPair, PrivateKey, PublicKey};
use rand::rngs::OsRng;

use crate::error::CryptoError;

/// Generate a new secp256k1 key pair from a secure random source.
pub fn generate_keypair() -> KeyPair {
    let signing_key = SigningKey::random(&mut OsRng);
    let mut private = [0u8; 32];
    private.copy_from_slice(&signing_key.to_bytes());
    KeyPair {
        public: encode_public(&signing_key),
        private: PrivateKey(private),
    }
}

/// Derive the uncompressed public key from a private key.
pub fn public_from_private(private: &PrivateKey) -> Result<PublicKey, CryptoError> {
    let signing_key = signing_key(private)?;
    Ok(encode_public(&signing_key))
}

/// Reconstruct a full key pair from a private key.
///
/// Fails for the zero scalar and for values not below the curve order.
pub fn keypair_from_private(private: PrivateKey) -> Result<KeyPair, CryptoError> {
    let public = public_from_private(&private)?;
    Ok(KeyPair { public, private })
}

pub(crate) fn signing_key(private: &PrivateKey) -> Result<SigningKey, CryptoError> {
    SigningKey::from_slice(private.as_bytes()).map_err(|_| CryptoError::InvalidPrivateKey)
}

pub(crate) fn encode_public(signing_key: &SigningKey) -> PublicKey {
    let point = signing_key.verifying_key().to_encoded_point(false);
    let mut bytes = [0u8; 65];
    bytes.copy_from_slice(point.as_bytes());
    PublicKey(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_produces_valid_keypair() {
        let kp = generate_keypair();
        assert_eq!(kp.public.0[0], 0x04);
        assert_ne!(kp.private.0, [0u8; 32]);
    }

    #[test]
    fn public_from_private_is_deterministic() {
        let kp = generate_keypair();
        let pub2 = public_from_private(&kp.private).unwrap();
        assert_eq!(kp.public, pub2);
    }

    #[test]
    fn keypair_from_private_roundtrip() {
        let kp1 = generate_keypair();
        let kp2 = keypair_from_private(PrivateKey(kp1.private.0)).unwrap();
        assert_eq!(kp1.public, kp2.public);
    }

    #[test]
    fn zero_scalar_rejected() {
        assert!(matches!(
            keypair_from_private(PrivateKey([0u8; 32])),
            Err(CryptoError::InvalidPrivateKey)
        ));
    }

    #[test]
    fn scalar_above_order_rejected() {
        assert!(keypair_from_private(PrivateKey([0xFF; 32])).is_err());
    }

    #[test]
    fn generator_point_for_scalar_one() {
        let mut one = [0u8; 32];
        one[31] = 1;
        let public = public_from_private(&PrivateKey(one)).unwrap();
        assert_eq!(
            hex::encode(&public.0[1..33]),
            "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
    }
}
