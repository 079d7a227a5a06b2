//! Curve Node Trait
//!
//! Common capability set of an HD node, whatever curve backs it.

use crate::crypto::hash::identifier_hash;
use crate::error::HdResult;
use crate::network::Network;
use crate::wallet::payload::ExtendedKeyPayload;
use zeroize::Zeroizing;

/// An immutable node of a hierarchical-deterministic key tree.
///
/// Derivation never mutates the receiver; every step yields a new node.
pub trait CurveNode: Sized + Clone {
    fn network(&self) -> &Network;

    fn depth(&self) -> u8;

    /// Child number including the hardened bit, `0` for the master
    fn child_index(&self) -> u32;

    fn parent_fingerprint(&self) -> u32;

    fn chain_code(&self) -> [u8; 32];

    /// Private key bytes, `None` when neutered
    fn private_key(&self) -> Option<Zeroizing<[u8; 32]>>;

    /// Public key as held by the node (33 bytes for secp256k1, 32 or 33 for Ed25519)
    fn public_key(&self) -> Vec<u8>;

    /// Key bytes hashed into the identifier
    fn identifier_key(&self) -> Vec<u8> {
        self.public_key()
    }

    /// RIPEMD160(SHA256(public key))
    fn identifier(&self) -> [u8; 20] {
        identifier_hash(&self.identifier_key())
    }

    fn fingerprint(&self) -> u32 {
        let id = self.identifier();
        u32::from_be_bytes([id[0], id[1], id[2], id[3]])
    }

    fn is_neutered(&self) -> bool {
        self.private_key().is_none()
    }

    /// Public-only copy of this node
    fn neutered(&self) -> Self;

    /// Derive with a raw BIP32 index; indices at or above 2^31 are hardened
    fn derive(&self, index: u32) -> HdResult<Self>;

    /// Hardened derivation of a 0-based index (below 2^31)
    fn derive_hardened(&self, index: u32) -> HdResult<Self>;

    fn derive_path(&self, path: &str) -> HdResult<Self>;

    fn sign(&self, message: &[u8]) -> HdResult<Vec<u8>>;

    fn verify(&self, message: &[u8], signature: &[u8]) -> bool;

    /// 78-byte serialization of this node
    fn to_payload(&self) -> ExtendedKeyPayload;

    fn to_base58(&self) -> String {
        self.to_payload().to_base58()
    }

    fn to_wif(&self) -> HdResult<String>;
}
