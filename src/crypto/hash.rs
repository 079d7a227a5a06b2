//! Hash helpers for key identifiers

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// RIPEMD160(SHA256(data)), the BIP32 key identifier
pub fn identifier_hash(data: &[u8]) -> [u8; 20] {
    let sha = Sha256::digest(data);
    let ripe = Ripemd160::digest(sha);

    let mut out = [0u8; 20];
    out.copy_from_slice(&ripe);
    out
}

/// First four bytes of the identifier, read big-endian
pub fn fingerprint(public_key: &[u8]) -> u32 {
    let id = identifier_hash(public_key);
    u32::from_be_bytes([id[0], id[1], id[2], id[3]])
}

/// Single SHA-256
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::hashes::{hash160, Hash};

    #[test]
    fn test_identifier_matches_hash160() {
        let pk = hex::decode("0339a36013301597daef41fbe593a02cc513d0b55527ec2df1050e2e8ff49c85c2").unwrap();
        let expected = hash160::Hash::hash(&pk);
        assert_eq!(identifier_hash(&pk), expected.to_byte_array());
    }

    #[test]
    fn test_bip32_master_fingerprint() {
        // Public key of BIP32 test vector 1 master
        let pk = hex::decode("0339a36013301597daef41fbe593a02cc513d0b55527ec2df1050e2e8ff49c85c2").unwrap();
        assert_eq!(fingerprint(&pk), 0x3442193e);
    }

    #[test]
    fn test_sha256_empty() {
        assert_eq!(
            hex::encode(sha256(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
