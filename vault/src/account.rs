//! A custodial account: private key plus derived address.

use std::fmt;

use nastip_crypto::{derive_address, generate_keypair, keypair_from_private, CryptoError};
use nastip_types::{Address, PrivateKey, PublicKey};

pub struct Account {
    private: PrivateKey,
    public: PublicKey,
    address: Address,
}

impl Account {
    /// Generate a fresh random account.
    pub fn generate() -> Self {
        let kp = generate_keypair();
        let address = derive_address(&kp.public);
        Self {
            private: kp.private,
            public: kp.public,
            address,
        }
    }

    pub fn from_private(private: PrivateKey) -> Result<Self, CryptoError> {
        let kp = keypair_from_private(private)?;
        let address = derive_address(&kp.public);
        Ok(Self {
            private: kp.private,
            public: kp.public,
            address,
        })
    }

    /// Load an account from a 64-character hex private key.
    pub fn from_hex(hex_key: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(hex_key.trim()).map_err(|e| CryptoError::InvalidHex(e.to_string()))?;
        let raw: [u8; PrivateKey::LEN] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::InvalidPrivateKey)?;
        Self::from_private(PrivateKey(raw))
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
