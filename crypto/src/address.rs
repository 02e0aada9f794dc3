//! Address derivation and parsing.
//!
//! Account address = `0x19 ‖ 0x57 ‖ RIPEMD160(SHA3-256(pubkey)) ‖ checksum`,
//! checksum = SHA3-256(first 22 bytes)[0..4], text form = base58.

use nastip_types::{Address, AddressKind, PublicKey, TypesError};

use crate::hash::{ripemd160, sha3_256};

fn checksum(prefix: &[u8]) -> [u8; Address::CHECKSUM_LEN] {
    let mut cs = [0u8; Address::CHECKSUM_LEN];
    cs.copy_from_slice(&sha3_256(prefix)[..Address::CHECKSUM_LEN]);
    cs
}

fn build(kind: AddressKind, data: &[u8]) -> Address {
    let hashed = ripemd160(&sha3_256(data));
    let mut prefix = [0u8; Address::DATA_END];
    prefix[0] = Address::PADDING;
    prefix[Address::TYPE_INDEX] = kind as u8;
    prefix[Address::TYPE_INDEX + 1..].copy_from_slice(&hashed);
    Address::from_parts(kind, &hashed, &checksum(&prefix))
}

/// Derive the account address of an uncompressed public key.
pub fn derive_address(public_key: &PublicKey) -> Address {
    build(AddressKind::Account, public_key.as_bytes())
}

/// Validate raw address bytes: length, padding, type and checksum.
pub fn address_from_bytes(bytes: &[u8]) -> Result<Address, TypesError> {
    let raw: [u8; Address::LEN] = bytes
        .try_into()
        .map_err(|_| TypesError::InvalidAddressFormat)?;
    let address = Address::from_bytes_unchecked(raw)?;
    if checksum(address.checksummed_part()) != address.checksum() {
        return Err(TypesError::InvalidAddressChecksum);
    }
    Ok(address)
}

/// Parse a base58 address string.
pub fn parse_address(text: &str) -> Result<Address, TypesError> {
    if text.len() != Address::BASE58_LEN || !text.starts_with(Address::FAITH) {
        return Err(TypesError::InvalidAddressFormat);
    }
    let bytes = bs58::decode(text)
        .into_vec()
        .map_err(|_| TypesError::InvalidAddressFormat)?;
    address_from_bytes(&bytes)
}

/// Whether a string is a well-formed address with a correct checksum.
pub fn validate_address(text: &str) -> bool {
    parse_address(text).is_ok()
}
