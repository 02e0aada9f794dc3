//! Encrypted key records as stored in the contract.
//!
//! A record is the 64-character hex form of a private key encrypted with
//! [`KeyCipher`]. Records are opaque to everything but the cipher; this
//! module only wraps them so a raw hex string is never mistaken for one.

use std::fmt;

use nastip_crypto::{CryptoError, KeyCipher};
use nastip_types::PrivateKey;

use crate::account::Account;

#[derive(Clone, PartialEq, Eq)]
pub struct EncryptedKeyRecord(String);

impl EncryptedKeyRecord {
    /// Encrypt a private key into a record.
    pub fn seal(cipher: &KeyCipher, key: &PrivateKey) -> Self {
        Self(cipher.encrypt(key))
    }

    /// Wrap a record read back from storage. Nothing is validated until
    /// [`EncryptedKeyRecord::open`].
    pub fn from_stored(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Decrypt the record and rebuild the account it belongs to.
    pub fn open(&self, cipher: &KeyCipher) -> Result<Account, CryptoError> {
        let key = cipher.decrypt(&self.0)?;
        Account::from_private(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for EncryptedKeyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncryptedKeyRecord({} chars)", self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher() -> KeyCipher {
        KeyCipher::new(b"0123456789abcdef").unwrap()
    }

    #[test]
    fn seal_open_roundtrip() {
        let account = Account::generate();
        let record = EncryptedKeyRecord::seal(&cipher(), account.private_key());
        assert_eq!(record.as_str().len(), 64);
        let opened = record.open(&cipher()).unwrap();
        assert_eq!(opened.address(), account.address());
    }

    #[test]
    fn open_rejects_wrong_length() {
        let short = "0".repeat(63);
        let long = "0".repeat(65);
        for bad in ["", "abcd", short.as_str(), long.as_str()] {
            let record = EncryptedKeyRecord::from_stored(bad);
            assert!(matches!(
                record.open(&cipher()),
                Err(CryptoError::CiphertextLength { .. })
            ));
        }
    }

    #[test]
    fn wrong_secret_yields_different_account() {
        let account = Account::generate();
        let record = EncryptedKeyRecord::seal(&cipher(), account.private_key());
        let other = KeyCipher::new(b"fedcba9876543210").unwrap();
        if let Ok(opened) = record.open(&other) {
            assert_ne!(opened.address(), account.address());
        }
    }
}
