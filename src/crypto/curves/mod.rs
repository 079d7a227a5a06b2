//! Multi-Curve HD Nodes
//!
//! - `secp256k1`: BIP32, backed by `bitcoin::bip32`
//! - `ed25519`: SLIP-0010, hardened derivation only
//!
//! # Architecture
//!
//! Both node types implement [`CurveNode`]. [`Node`] is the tagged union the
//! extended-key façade holds; it picks a variant from the network's curve
//! and forwards every capability to it.
//!
//! # Example
//!
//! ```rust
//! use hd_extended_keys::{CurveNode, MacType, Network, Node};
//!
//! let seed = [7u8; 32];
//! let node = Node::from_seed(&seed, Network::BITXOR, MacType::Hmac.into())?;
//! let child = node.derive_path("m/44'/4343'/0'")?;
//! assert_eq!(child.depth(), 3);
//! # Ok::<(), hd_extended_keys::HdError>(())
//! ```

pub mod ed25519;
pub mod secp256k1;
pub mod traits;

pub use ed25519::Ed25519Node;
pub use secp256k1::Secp256k1Node;
pub use traits::CurveNode;

use crate::crypto::mac::MacConfig;
use crate::error::{HdError, HdResult};
use crate::network::{CurveAlgorithm, Network};
use crate::wallet::payload::ExtendedKeyPayload;
use zeroize::Zeroizing;

/// Accepted seed lengths in bytes (128 to 512 bits)
pub const MIN_SEED_LEN: usize = 16;
pub const MAX_SEED_LEN: usize = 64;

pub(crate) fn check_seed_length(seed: &[u8]) -> HdResult<()> {
    if seed.len() < MIN_SEED_LEN || seed.len() > MAX_SEED_LEN {
        return Err(HdError::InvalidSeedLength { bits: seed.len() * 8 });
    }
    Ok(())
}

// MARK: - Node Union

/// HD node on either supported curve
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Secp256k1(Secp256k1Node),
    Ed25519(Ed25519Node),
}

impl Node {
    /// Master node for `network.curve`. The MAC applies to Ed25519 only;
    /// secp256k1 masters always use HMAC-SHA512 as BIP32 requires.
    pub fn from_seed(seed: &[u8], network: Network, mac: MacConfig) -> HdResult<Self> {
        match network.curve {
            CurveAlgorithm::Secp256k1 => Secp256k1Node::from_seed(seed, network).map(Node::Secp256k1),
            CurveAlgorithm::Ed25519 => Ed25519Node::from_seed(seed, network, mac).map(Node::Ed25519),
        }
    }

    pub fn from_payload(payload: &ExtendedKeyPayload, network: Network, mac: MacConfig) -> HdResult<Self> {
        match network.curve {
            CurveAlgorithm::Secp256k1 => Secp256k1Node::from_payload(payload, network).map(Node::Secp256k1),
            CurveAlgorithm::Ed25519 => Ed25519Node::from_payload(payload, network, mac).map(Node::Ed25519),
        }
    }

    pub fn from_base58(text: &str, network: Network, mac: MacConfig) -> HdResult<Self> {
        let payload = ExtendedKeyPayload::from_base58(text, &network)?;
        Self::from_payload(&payload, network, mac)
    }

    pub fn curve(&self) -> CurveAlgorithm {
        match self {
            Node::Secp256k1(_) => CurveAlgorithm::Secp256k1,
            Node::Ed25519(_) => CurveAlgorithm::Ed25519,
        }
    }
}

macro_rules! dispatch {
    ($self:ident, $node:ident => $body:expr) => {
        match $self {
            Node::Secp256k1($node) => $body,
            Node::Ed25519($node) => $body,
        }
    };
}

impl CurveNode for Node {
    fn network(&self) -> &Network {
        dispatch!(self, node => node.network())
    }

    fn depth(&self) -> u8 {
        dispatch!(self, node => node.depth())
    }

    fn child_index(&self) -> u32 {
        dispatch!(self, node => node.child_index())
    }

    fn parent_fingerprint(&self) -> u32 {
        dispatch!(self, node => node.parent_fingerprint())
    }

    fn chain_code(&self) -> [u8; 32] {
        dispatch!(self, node => node.chain_code())
    }

    fn private_key(&self) -> Option<Zeroizing<[u8; 32]>> {
        dispatch!(self, node => node.private_key())
    }

    fn public_key(&self) -> Vec<u8> {
        dispatch!(self, node => node.public_key())
    }

    fn identifier_key(&self) -> Vec<u8> {
        dispatch!(self, node => node.identifier_key())
    }

    fn is_neutered(&self) -> bool {
        dispatch!(self, node => node.is_neutered())
    }

    fn neutered(&self) -> Self {
        match self {
            Node::Secp256k1(node) => Node::Secp256k1(node.neutered()),
            Node::Ed25519(node) => Node::Ed25519(node.neutered()),
        }
    }

    fn derive(&self, index: u32) -> HdResult<Self> {
        match self {
            Node::Secp256k1(node) => node.derive(index).map(Node::Secp256k1),
            Node::Ed25519(node) => node.derive(index).map(Node::Ed25519),
        }
    }

    fn derive_hardened(&self, index: u32) -> HdResult<Self> {
        match self {
            Node::Secp256k1(node) => node.derive_hardened(index).map(Node::Secp256k1),
            Node::Ed25519(node) => node.derive_hardened(index).map(Node::Ed25519),
        }
    }

    fn derive_path(&self, path: &str) -> HdResult<Self> {
        match self {
            Node::Secp256k1(node) => node.derive_path(path).map(Node::Secp256k1),
            Node::Ed25519(node) => node.derive_path(path).map(Node::Ed25519),
        }
    }

    fn sign(&self, message: &[u8]) -> HdResult<Vec<u8>> {
        dispatch!(self, node => node.sign(message))
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        dispatch!(self, node => node.verify(message, signature))
    }

    fn to_payload(&self) -> ExtendedKeyPayload {
        dispatch!(self, node => node.to_payload())
    }

    fn to_wif(&self) -> HdResult<String> {
        dispatch!(self, node => node.to_wif())
    }
}

// MARK: - Tests
