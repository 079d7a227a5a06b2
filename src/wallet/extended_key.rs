//! Extended Key Façade
//!
//! One entry point over both curves. The network's curve picks the node
//! type; callers never branch on it themselves.

use crate::crypto::curves::{CurveNode, Node};
use crate::crypto::mac::{MacConfig, MacType};
use crate::error::{HdError, HdResult};
use crate::network::Network;
use crate::wallet::payload::ExtendedKeyPayload;
use std::fmt;
use zeroize::{Zeroize, Zeroizing};

/// Output encoding for raw key bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyEncoding {
    #[default]
    Hex,
    Binary,
}

/// Key bytes in the requested encoding, wiped on drop
#[derive(Clone, PartialEq, Eq)]
pub enum EncodedKey {
    Hex(String),
    Binary(Vec<u8>),
}

impl EncodedKey {
    fn encode(bytes: &[u8], encoding: KeyEncoding) -> Self {
        match encoding {
            KeyEncoding::Hex => EncodedKey::Hex(hex::encode(bytes)),
            KeyEncoding::Binary => EncodedKey::Binary(bytes.to_vec()),
        }
    }

    pub fn as_hex(&self) -> Option<&str> {
        match self {
            EncodedKey::Hex(s) => Some(s),
            EncodedKey::Binary(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            EncodedKey::Hex(_) => None,
            EncodedKey::Binary(b) => Some(b),
        }
    }

    /// Raw bytes regardless of encoding
    pub fn to_bytes(&self) -> HdResult<Zeroizing<Vec<u8>>> {
        match self {
            EncodedKey::Hex(s) => Ok(Zeroizing::new(hex::decode(s)?)),
            EncodedKey::Binary(b) => Ok(Zeroizing::new(b.clone())),
        }
    }
}

impl Drop for EncodedKey {
    fn drop(&mut self) {
        match self {
            EncodedKey::Hex(s) => s.zeroize(),
            EncodedKey::Binary(b) => b.zeroize(),
        }
    }
}

impl fmt::Debug for EncodedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodedKey::Hex(s) => write!(f, "EncodedKey::Hex([{} chars])", s.len()),
            EncodedKey::Binary(b) => write!(f, "EncodedKey::Binary([{} bytes])", b.len()),
        }
    }
}

// MARK: - Extended Key

/// BIP32 extended key on a secp256k1 or Ed25519 network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedKey {
    node: Node,
    network: Network,
    mac: MacConfig,
}

impl ExtendedKey {
    /// Wrap an existing node; its network must match `network`.
    ///
    /// An Ed25519 node must also derive with `mac`. secp256k1 nodes always
    /// use HMAC-SHA512 and accept any setting.
    pub fn new(node: Node, network: Network, mac: impl Into<MacConfig>) -> HdResult<Self> {
        if *node.network() != network {
            return Err(HdError::NetworkMismatch(format!(
                "node belongs to {}, expected {}",
                node.network(),
                network
            )));
        }
        let mac = mac.into();
        if let Node::Ed25519(ed) = &node {
            if *ed.mac() != mac {
                return Err(HdError::MacMismatch(format!(
                    "node derives with {}, expected {}",
                    ed.mac().mac_type,
                    mac.mac_type
                )));
            }
        }
        Ok(Self { node, network, mac })
    }

    /// Master key from a hex-encoded seed of 16 to 64 bytes
    pub fn create_from_seed(seed_hex: &str, network: Network, mac: impl Into<MacConfig>) -> HdResult<Self> {
        let seed = Zeroizing::new(hex::decode(seed_hex.trim())?);
        Self::create_from_seed_bytes(&seed, network, mac)
    }

    pub fn create_from_seed_bytes(seed: &[u8], network: Network, mac: impl Into<MacConfig>) -> HdResult<Self> {
        let mac = mac.into();
        let node = Node::from_seed(seed, network, mac.clone())?;
        Self::new(node, network, mac)
    }

    /// Parse an `xprv`/`xpub` string under `network`
    pub fn create_from_base58(payload: &str, network: Network, mac: impl Into<MacConfig>) -> HdResult<Self> {
        let mac = mac.into();
        let node = Node::from_base58(payload.trim(), network, mac.clone())?;
        Self::new(node, network, mac)
    }

    // MARK: - Accessors

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn mac_type(&self) -> MacType {
        self.mac.mac_type
    }

    pub fn depth(&self) -> u8 {
        self.node.depth()
    }

    pub fn fingerprint(&self) -> u32 {
        self.node.fingerprint()
    }

    // MARK: - Derivation

    pub fn derive_path(&self, path: &str) -> HdResult<Self> {
        Ok(Self {
            node: self.node.derive_path(path)?,
            network: self.network,
            mac: self.mac.clone(),
        })
    }

    pub fn is_neutered(&self) -> bool {
        self.node.is_neutered()
    }

    /// Public-only copy of this key
    pub fn public_node(&self) -> Self {
        Self {
            node: self.node.neutered(),
            network: self.network,
            mac: self.mac.clone(),
        }
    }

    /// Whether the serialized form carries a zero parent fingerprint.
    ///
    /// Node constructors enforce the master fields, so a node's own
    /// encoding always decodes under its network.
    pub fn is_master(&self) -> bool {
        match ExtendedKeyPayload::from_base58(&self.to_base58(), &self.network) {
            Ok(payload) => payload.parent_fingerprint == 0,
            Err(_) => false,
        }
    }

    // MARK: - Key Export

    pub fn private_key(&self, encoding: KeyEncoding) -> HdResult<EncodedKey> {
        let private_key = self
            .node
            .private_key()
            .ok_or(HdError::NoPrivateKeyOnNeuteredNode)?;
        Ok(EncodedKey::encode(private_key.as_slice(), encoding))
    }

    /// 32-byte public key; a leading format byte of a 33-byte key is dropped
    pub fn public_key(&self, encoding: KeyEncoding) -> EncodedKey {
        let public_key = self.node.public_key();
        let canonical = match public_key.len() {
            33 => &public_key[1..],
            _ => &public_key[..],
        };
        EncodedKey::encode(canonical, encoding)
    }

    pub fn to_base58(&self) -> String {
        self.node.to_base58()
    }

    pub fn to_wif(&self) -> HdResult<String> {
        self.node.to_wif()
    }

    pub fn sign(&self, message: &[u8]) -> HdResult<Vec<u8>> {
        self.node.sign(message)
    }

    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        self.node.verify(message, signature)
    }
}

// MARK: - Tests
