//! Nebulas address type.
//!
//! Layout (26 bytes):
//!
//! | padding | type | RIPEMD160(SHA3-256(data)) | checksum |
//! |---------|------|---------------------------|----------|
//! | `0x19`  | 1 B  | 20 B                      | 4 B      |
//!
//! The checksum is the first four bytes of SHA3-256 over the first 22 bytes.
//! Hashing lives in `nastip-crypto`; this type only carries the layout.
//! The text form is base58 and always 35 characters starting with `n`.

use std::fmt;

use crate::error::TypesError;

/// The kind of entity an address belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AddressKind {
    Account = 0x57,
    Contract = 0x58,
}

impl AddressKind {
    pub fn from_byte(b: u8) -> Result<Self, TypesError> {
        match b {
            0x57 => Ok(Self::Account),
            0x58 => Ok(Self::Contract),
            other => Err(TypesError::InvalidAddressType(other)),
        }
    }
}

/// A 26-byte Nebulas address.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; Address::LEN]);

impl Address {
    /// Total byte length.
    pub const LEN: usize = 26;
    /// Leading padding byte.
    pub const PADDING: u8 = 0x19;
    /// Index of the type byte.
    pub const TYPE_INDEX: usize = 1;
    /// Length of the hashed key/data part.
    pub const DATA_LEN: usize = 20;
    /// End of the checksummed prefix (padding + type + data).
    pub const DATA_END: usize = 22;
    /// Checksum length in bytes.
    pub const CHECKSUM_LEN: usize = 4;
    /// Length of the base58 text form.
    pub const BASE58_LEN: usize = 35;
    /// Every base58 address starts with this character.
    pub const FAITH: char = 'n';

    /// Wrap raw bytes without verifying the checksum.
    ///
    /// Only the padding and type byte are checked; use
    /// `nastip_crypto::address_from_bytes` for full validation.
    pub fn from_bytes_unchecked(bytes: [u8; Self::LEN]) -> Result<Self, TypesError> {
        if bytes[0] != Self::PADDING {
            return Err(TypesError::InvalidAddressFormat);
        }
        AddressKind::from_byte(bytes[Self::TYPE_INDEX])?;
        Ok(Self(bytes))
    }

    /// Assemble an address from its hashed data and precomputed checksum.
    pub fn from_parts(
        kind: AddressKind,
        data: &[u8; Self::DATA_LEN],
        checksum: &[u8; Self::CHECKSUM_LEN],
    ) -> Self {
        let mut bytes = [0u8; Self::LEN];
        bytes[0] = Self::PADDING;
        bytes[Self::TYPE_INDEX] = kind as u8;
        bytes[Self::TYPE_INDEX + 1..Self::DATA_END].copy_from_slice(data);
        bytes[Self::DATA_END..].copy_from_slice(checksum);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }

    pub fn kind(&self) -> AddressKind {
        // Construction guarantees a valid type byte.
        match self.0[Self::TYPE_INDEX] {
            0x58 => AddressKind::Contract,
            _ => AddressKind::Account,
        }
    }

    /// The checksummed prefix (padding, type, hashed data).
    pub fn checksummed_part(&self) -> &[u8] {
        &self.0[..Self::DATA_END]
    }

    /// The trailing checksum bytes.
    pub fn checksum(&self) -> &[u8] {
        &self.0[Self::DATA_END..]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bs58::encode(&self.0).into_string())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}
