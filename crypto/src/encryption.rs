//! Record cipher for custodial private keys.
//!
//! A raw 32-byte private key is split into two 16-byte blocks and each block
//! is encrypted independently with AES-128 under the process-wide secret.
//! There is no IV: the same key always produces the same ciphertext, which is
//! what the records already stored in the contract rely on.

use std::fmt;

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::Aes128;
use nastip_types::PrivateKey;

use crate::error::CryptoError;

/// Secret length in bytes (AES-128).
pub const SECRET_LEN: usize = 16;
/// Cipher block size.
const BLOCK_LEN: usize = 16;
/// Ciphertext length in bytes (two blocks).
pub const CIPHERTEXT_LEN: usize = PrivateKey::LEN;
/// Ciphertext length as stored in the contract (hex).
pub const CIPHERTEXT_HEX_LEN: usize = CIPHERTEXT_LEN * 2;

/// Encrypts and decrypts stored key records under a fixed secret.
#[derive(Clone)]
pub struct KeyCipher {
    cipher: Aes128,
}

impl KeyCipher {
    /// Create a cipher from 16 bytes of secret material.
    pub fn new(secret: &[u8]) -> Result<Self, CryptoError> {
        let cipher = Aes128::new_from_slice(secret).map_err(|_| CryptoError::SecretLength {
            expected: SECRET_LEN,
            got: secret.len(),
        })?;
        Ok(Self { cipher })
    }

    /// Encrypt a private key into its 64-character hex record.
    pub fn encrypt(&self, key: &PrivateKey) -> String {
        let mut out = [0u8; CIPHERTEXT_LEN];
        for (src, dst) in key
            .as_bytes()
            .chunks_exact(BLOCK_LEN)
            .zip(out.chunks_exact_mut(BLOCK_LEN))
        {
            let mut block = GenericArray::clone_from_slice(src);
            self.cipher.encrypt_block(&mut block);
            dst.copy_from_slice(&block);
        }
        hex::encode(out)
    }

    /// Decrypt a hex record back into a private key.
    ///
    /// The length is checked before decoding so truncated or padded records
    /// never reach the cipher.
    pub fn decrypt(&self, record: &str) -> Result<PrivateKey, CryptoError> {
        if record.len() != CIPHERTEXT_HEX_LEN {
            return Err(CryptoError::CiphertextLength {
                expected: CIPHERTEXT_HEX_LEN,
                got: record.len(),
            });
        }
        let data = hex::decode(record).map_err(|e| CryptoError::InvalidHex(e.to_string()))?;

        let mut key = PrivateKey([0u8; PrivateKey::LEN]);
        for (src, dst) in data
            .chunks_exact(BLOCK_LEN)
            .zip(key.0.chunks_exact_mut(BLOCK_LEN))
        {
            let mut block = GenericArray::clone_from_slice(src);
            self.cipher.decrypt_block(&mut block);
            dst.copy_from_slice(&block);
        }
        Ok(key)
    }
}

impl fmt::Debug for KeyCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyCipher(..)")
    }
}
