//! Extended Key Payload (BIP32 serialization format)
//!
//! Layout of the 78-byte payload, multi-byte fields big-endian:
//!
//! ```text
//! version(4) ‖ depth(1) ‖ parent_fingerprint(4) ‖ child_index(4) ‖ chain_code(32) ‖ key_data(33)
//! ```
//!
//! `key_data` is `0x00 ‖ private_key` for private keys, else a 33-byte
//! public key. The payload is Base58Check-encoded for transport. Nothing in
//! the payload names the curve; that comes from the [`Network`].

use crate::error::{HdError, HdResult};
use crate::log_debug;
use crate::network::Network;
use crate::utils::crypto::{base58check_decode, base58check_encode};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Serialized payload length in bytes
pub const PAYLOAD_LEN: usize = 78;

const KEY_DATA_OFFSET: usize = 45;

/// Decoded key data
#[derive(Clone, PartialEq, Eq)]
pub enum KeyMaterial {
    Private(Zeroizing<[u8; 32]>),
    Public([u8; 33]),
}

/// A parsed or to-be-serialized extended key
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ExtendedKeyPayload {
    pub version: u32,
    pub depth: u8,
    pub parent_fingerprint: u32,
    pub child_index: u32,
    pub chain_code: [u8; 32],
    pub key_data: [u8; 33],
}

impl ExtendedKeyPayload {
    /// Payload for a private key, versioned with the network's private prefix
    pub fn private(
        network: &Network,
        depth: u8,
        parent_fingerprint: u32,
        child_index: u32,
        chain_code: [u8; 32],
        private_key: &[u8; 32],
    ) -> Self {
        let mut key_data = [0u8; 33];
        key_data[1..].copy_from_slice(private_key);
        Self {
            version: network.private_key_prefix,
            depth,
            parent_fingerprint,
            child_index,
            chain_code,
            key_data,
        }
    }

    /// Payload for a 33-byte public key, versioned with the network's public prefix
    pub fn public(
        network: &Network,
        depth: u8,
        parent_fingerprint: u32,
        child_index: u32,
        chain_code: [u8; 32],
        public_key: [u8; 33],
    ) -> Self {
        Self {
            version: network.public_key_prefix,
            depth,
            parent_fingerprint,
            child_index,
            chain_code,
            key_data: public_key,
        }
    }

    // MARK: - Binary

    pub fn to_bytes(&self) -> Zeroizing<[u8; PAYLOAD_LEN]> {
        let mut out = Zeroizing::new([0u8; PAYLOAD_LEN]);
        out[0..4].copy_from_slice(&self.version.to_be_bytes());
        out[4] = self.depth;
        out[5..9].copy_from_slice(&self.parent_fingerprint.to_be_bytes());
        out[9..13].copy_from_slice(&self.child_index.to_be_bytes());
        out[13..45].copy_from_slice(&self.chain_code);
        out[KEY_DATA_OFFSET..].copy_from_slice(&self.key_data);
        out
    }

    /// Split raw bytes into fields. Only the length is checked here.
    pub fn from_bytes(bytes: &[u8]) -> HdResult<Self> {
        if bytes.len() != PAYLOAD_LEN {
            return Err(HdError::InvalidPayloadLength(bytes.len()));
        }

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&bytes[13..45]);
        let mut key_data = [0u8; 33];
        key_data.copy_from_slice(&bytes[KEY_DATA_OFFSET..]);

        Ok(Self {
            version: read_u32(&bytes[0..4]),
            depth: bytes[4],
            parent_fingerprint: read_u32(&bytes[5..9]),
            child_index: read_u32(&bytes[9..13]),
            chain_code,
            key_data,
        })
    }

    // MARK: - Base58Check

    pub fn to_base58(&self) -> String {
        base58check_encode(self.to_bytes().as_slice())
    }

    /// Decode and validate a Base58Check extended key against `network`.
    ///
    /// Checks run in order: payload length, version prefix, master
    /// parent fingerprint, master child index, private key marker.
    pub fn from_base58(text: &str, network: &Network) -> HdResult<Self> {
        let raw = base58check_decode(text)?;
        let payload = Self::from_bytes(&raw)?;
        payload.validate(network)?;

        log_debug!(
            "payload",
            "Decoded extended key",
            kind = if payload.is_private(network) { "xprv" } else { "xpub" },
            depth = payload.depth,
            child_index = payload.child_index,
            curve = network.curve,
        );

        Ok(payload)
    }

    /// Structural checks for a payload claimed to belong to `network`
    pub fn validate(&self, network: &Network) -> HdResult<()> {
        if !network.is_private_version(self.version) && !network.is_public_version(self.version) {
            return Err(HdError::UnrecognizedVersion(self.version));
        }
        check_master_fields(self.depth, self.parent_fingerprint, self.child_index)?;
        if network.is_private_version(self.version) && self.key_data[0] != 0x00 {
            return Err(HdError::MalformedPrivateKeyMarker(self.key_data[0]));
        }
        Ok(())
    }

    pub fn is_private(&self, network: &Network) -> bool {
        network.is_private_version(self.version)
    }

    /// Key data interpreted according to the version prefix
    pub fn key_material(&self, network: &Network) -> KeyMaterial {
        if self.is_private(network) {
            let mut private_key = Zeroizing::new([0u8; 32]);
            private_key.copy_from_slice(&self.key_data[1..]);
            KeyMaterial::Private(private_key)
        } else {
            KeyMaterial::Public(self.key_data)
        }
    }
}

impl fmt::Debug for ExtendedKeyPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedKeyPayload")
            .field("version", &format_args!("0x{:08x}", self.version))
            .field("depth", &self.depth)
            .field("parent_fingerprint", &format_args!("{:08x}", self.parent_fingerprint))
            .field("child_index", &self.child_index)
            .field("chain_code", &"[REDACTED]")
            .field("key_data", &"[REDACTED]")
            .finish()
    }
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    u32::from_be_bytes(buf)
}

/// A depth-0 node has no parent and child index 0
pub fn check_master_fields(depth: u8, parent_fingerprint: u32, child_index: u32) -> HdResult<()> {
    if depth == 0 && parent_fingerprint != 0 {
        return Err(HdError::MasterWithParent);
    }
    if depth == 0 && child_index != 0 {
        return Err(HdError::MasterWithNonZeroIndex);
    }
    Ok(())
}

// MARK: - Tests

#[cfg(test)]
mod tests {
    use super::*;

    const XPRV_M: &str = "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi";
    const XPUB_M0H: &str = "xpub68Gmy5EdvgibQVfPdqkBBCHxA5htiqg55crXYuXoQRKfDBFA1WEjWgP6LHhwBZeNK1VTsfTFUHCdrfp1bgwQ9xv5ski8PX9rL2dZXvgGDnw";

    fn sample() -> ExtendedKeyPayload {
        ExtendedKeyPayload::private(&Network::BITXOR, 2, 0xdeadbeef, 0x80000001, [7u8; 32], &[9u8; 32])
    }

    #[test]
    fn test_layout() {
        let bytes = sample().to_bytes();
        assert_eq!(&bytes[0..4], &[0x04, 0x88, 0xad, 0xe4]);
        assert_eq!(bytes[4], 2);
        assert_eq!(&bytes[5..9], &[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(&bytes[9..13], &[0x80, 0x00, 0x00, 0x01]);
        assert_eq!(&bytes[13..45], &[7u8; 32]);
        assert_eq!(bytes[45], 0x00);
        assert_eq!(&bytes[46..78], &[9u8; 32]);
    }

    #[test]
    fn test_bytes_round_trip() {
        let payload = sample();
        let parsed = ExtendedKeyPayload::from_bytes(payload.to_bytes().as_slice()).unwrap();
        assert_eq!(parsed, payload);
    }

    #[test]
    fn test_decode_bip32_master() {
        let payload = ExtendedKeyPayload::from_base58(XPRV_M, &Network::BITCOIN).unwrap();
        assert!(payload.is_private(&Network::BITCOIN));
        assert_eq!(payload.depth, 0);
        assert_eq!(payload.parent_fingerprint, 0);
        assert_eq!(
            hex::encode(payload.chain_code),
            "873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508"
        );
        match payload.key_material(&Network::BITCOIN) {
            KeyMaterial::Private(key) => assert_eq!(
                hex::encode(&key[..]),
                "e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35"
            ),
            KeyMaterial::Public(_) => panic!("expected private key material"),
        }
        assert_eq!(payload.to_base58(), XPRV_M);
    }

    #[test]
    fn test_decode_public_child() {
        let payload = ExtendedKeyPayload::from_base58(XPUB_M0H, &Network::BITXOR).unwrap();
        assert!(!payload.is_private(&Network::BITXOR));
        assert_eq!(payload.depth, 1);
        assert_eq!(payload.parent_fingerprint, 0x3442193e);
        assert_eq!(payload.child_index, 0x80000000);
        assert!(matches!(payload.key_material(&Network::BITXOR), KeyMaterial::Public(_)));
    }

    #[test]
    fn test_reject_wrong_length() {
        let short = base58check_encode(&[0u8; 77]);
        assert_eq!(
            ExtendedKeyPayload::from_base58(&short, &Network::BITCOIN),
            Err(HdError::InvalidPayloadLength(77))
        );
    }

    #[test]
    fn test_reject_unknown_version() {
        let mut bytes = sample().to_bytes();
        bytes[0..4].copy_from_slice(&0x0435_8394u32.to_be_bytes());
        let text = base58check_encode(bytes.as_slice());
        assert_eq!(
            ExtendedKeyPayload::from_base58(&text, &Network::BITXOR),
            Err(HdError::UnrecognizedVersion(0x04358394))
        );
    }

    #[test]
    fn test_reject_master_with_parent() {
        let payload = ExtendedKeyPayload::private(&Network::BITXOR, 0, 1, 0, [1u8; 32], &[2u8; 32]);
        assert_eq!(
            ExtendedKeyPayload::from_base58(&payload.to_base58(), &Network::BITXOR),
            Err(HdError::MasterWithParent)
        );
    }

    #[test]
    fn test_reject_master_with_index() {
        let payload = ExtendedKeyPayload::private(&Network::BITXOR, 0, 0, 5, [1u8; 32], &[2u8; 32]);
        assert_eq!(
            ExtendedKeyPayload::from_base58(&payload.to_base58(), &Network::BITXOR),
            Err(HdError::MasterWithNonZeroIndex)
        );
    }

    #[test]
    fn test_reject_private_marker() {
        let mut bytes = sample().to_bytes();
        bytes[45] = 0x01;
        let text = base58check_encode(bytes.as_slice());
        assert_eq!(
            ExtendedKeyPayload::from_base58(&text, &Network::BITXOR),
            Err(HdError::MalformedPrivateKeyMarker(0x01))
        );
    }

    #[test]
    fn test_debug_hides_key_data() {
        let rendered = format!("{:?}", sample());
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains("9, 9, 9"));
    }
}
