//! Base58Check and WIF helpers
//!
//! Checksums are the first four bytes of double SHA-256 over the payload.

use crate::error::{HdError, HdResult};
use bitcoin::hashes::{sha256d, Hash};
use zeroize::Zeroizing;

const CHECKSUM_LEN: usize = 4;

/// Encode `data` as Base58 with a 4-byte double-SHA256 checksum appended
pub fn base58check_encode(data: &[u8]) -> String {
    let checksum = sha256d::Hash::hash(data);
    let mut payload = Zeroizing::new(Vec::with_capacity(data.len() + CHECKSUM_LEN));
    payload.extend_from_slice(data);
    payload.extend_from_slice(&checksum[..CHECKSUM_LEN]);

    bs58::encode(payload.as_slice()).into_string()
}

/// Decode a Base58Check string and verify its checksum, returning the payload
pub fn base58check_decode(encoded: &str) -> HdResult<Zeroizing<Vec<u8>>> {
    let raw = Zeroizing::new(bs58::decode(encoded).into_vec()?);
    if raw.len() < CHECKSUM_LEN {
        return Err(HdError::InvalidChecksum);
    }

    let (data, checksum) = raw.split_at(raw.len() - CHECKSUM_LEN);
    let expected = sha256d::Hash::hash(data);
    if checksum != &expected[..CHECKSUM_LEN] {
        return Err(HdError::InvalidChecksum);
    }

    Ok(Zeroizing::new(data.to_vec()))
}

/// Encode a 32-byte secp256k1 secret as mainnet WIF (compressed)
pub fn encode_wif(secret: &[u8; 32]) -> String {
    let mut data = Zeroizing::new(Vec::with_capacity(34));
    data.push(0x80); // Bitcoin mainnet prefix
    data.extend_from_slice(secret);
    data.push(0x01); // Compressed flag

    base58check_encode(&data)
}
