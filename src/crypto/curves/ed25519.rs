//! Ed25519 HD Node (SLIP-0010)
//!
//! Ed25519 has no public-key tweak, so only hardened derivation exists:
//!
//! ```text
//! master: I = MAC("ed25519 seed", seed)
//! child:  I = MAC(chain_code, 0x00 ‖ private_key ‖ BE32(index))
//!         private_key = I[0..32], chain_code = I[32..64]
//! ```
//!
//! The MAC is HMAC-SHA512 or KMAC256, chosen when the master is created and
//! inherited by every descendant.

use super::{check_seed_length, CurveNode};
use crate::crypto::mac::MacConfig;
use crate::error::{HdError, HdResult};
use crate::log_debug;
use crate::network::{CurveAlgorithm, Network};
use crate::wallet::derivation_path::{parse_path_hardened_only, HARDENED};
use crate::wallet::payload::{check_master_fields, ExtendedKeyPayload, KeyMaterial};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use std::fmt;
use std::sync::OnceLock;
use zeroize::Zeroizing;

/// MAC key for master node generation
pub const ED25519_SEED_KEY: &[u8] = b"ed25519 seed";

/// Ed25519 node of an HD tree
#[derive(Clone)]
pub struct Ed25519Node {
    private_key: Option<Zeroizing<[u8; 32]>>,
    /// Computed on first access for private nodes
    public_key: OnceLock<Vec<u8>>,
    chain_code: [u8; 32],
    network: Network,
    depth: u8,
    child_index: u32,
    parent_fingerprint: u32,
    mac: MacConfig,
}

impl Ed25519Node {
    // MARK: - Construction

    /// Master node from a 16 to 64 byte seed
    pub fn from_seed(seed: &[u8], network: Network, mac: MacConfig) -> HdResult<Self> {
        check_seed_length(seed)?;
        check_curve(&network)?;

        let i = mac.compute(ED25519_SEED_KEY, seed)?;
        let (private_key, chain_code) = split_output(&i);

        log_debug!("ed25519", "Created master node", mac = mac.mac_type, network = network);

        Self::from_private_key(private_key, chain_code, network, 0, 0, 0, mac)
    }

    /// Private node. The network must be an ed25519 one and a depth-0
    /// node must have no parent and index 0.
    pub fn from_private_key(
        private_key: Zeroizing<[u8; 32]>,
        chain_code: [u8; 32],
        network: Network,
        depth: u8,
        child_index: u32,
        parent_fingerprint: u32,
        mac: MacConfig,
    ) -> HdResult<Self> {
        check_curve(&network)?;
        check_master_fields(depth, parent_fingerprint, child_index)?;

        Ok(Self {
            private_key: Some(private_key),
            public_key: OnceLock::new(),
            chain_code,
            network,
            depth,
            child_index,
            parent_fingerprint,
            mac,
        })
    }

    /// Public-only node. `public_key` is the raw 32-byte point or a 33-byte
    /// serialized key.
    pub fn from_public_key(
        public_key: &[u8],
        chain_code: [u8; 32],
        network: Network,
        depth: u8,
        child_index: u32,
        parent_fingerprint: u32,
        mac: MacConfig,
    ) -> HdResult<Self> {
        check_curve(&network)?;
        check_master_fields(depth, parent_fingerprint, child_index)?;
        if public_key.len() != 32 && public_key.len() != 33 {
            return Err(HdError::InvalidPublicKey(format!(
                "Ed25519 public key must be 32 or 33 bytes, got {}",
                public_key.len()
            )));
        }

        Ok(Self {
            private_key: None,
            public_key: OnceLock::from(public_key.to_vec()),
            chain_code,
            network,
            depth,
            child_index,
            parent_fingerprint,
            mac,
        })
    }

    pub fn from_payload(payload: &ExtendedKeyPayload, network: Network, mac: MacConfig) -> HdResult<Self> {
        check_curve(&network)?;
        payload.validate(&network)?;

        match payload.key_material(&network) {
            KeyMaterial::Private(private_key) => Self::from_private_key(
                private_key,
                payload.chain_code,
                network,
                payload.depth,
                payload.child_index,
                payload.parent_fingerprint,
                mac,
            ),
            KeyMaterial::Public(public_key) => Self::from_public_key(
                &public_key,
                payload.chain_code,
                network,
                payload.depth,
                payload.child_index,
                payload.parent_fingerprint,
                mac,
            ),
        }
    }

    pub fn from_base58(text: &str, network: Network, mac: MacConfig) -> HdResult<Self> {
        let payload = ExtendedKeyPayload::from_base58(text, &network)?;
        Self::from_payload(&payload, network, mac)
    }

    pub fn mac(&self) -> &MacConfig {
        &self.mac
    }

    /// The 32-byte Ed25519 point, dropping the leading byte of a 33-byte key
    pub fn canonical_public_key(&self) -> [u8; 32] {
        let raw = self.public_key_bytes();
        let mut out = [0u8; 32];
        if let Some(start) = raw.len().checked_sub(32) {
            out.copy_from_slice(&raw[start..]);
        }
        out
    }

    fn public_key_bytes(&self) -> &[u8] {
        self.public_key.get_or_init(|| match &self.private_key {
            Some(private_key) => SigningKey::from_bytes(private_key).verifying_key().to_bytes().to_vec(),
            // public-only nodes are always constructed with their key set
            None => Vec::new(),
        })
    }

    // MARK: - Derivation

    /// CKDpriv for an already-offset hardened index
    fn ckd_priv(&self, index: u32) -> HdResult<Self> {
        let parent_key = self
            .private_key
            .as_ref()
            .ok_or(HdError::MissingPrivateKeyForHardenedDerivation)?;
        let depth = self.depth.checked_add(1).ok_or(HdError::DepthOverflow)?;

        let mut data = Zeroizing::new([0u8; 37]);
        data[1..33].copy_from_slice(parent_key.as_slice());
        data[33..].copy_from_slice(&index.to_be_bytes());

        let i = self.mac.compute(&self.chain_code, data.as_slice())?;
        let (private_key, chain_code) = split_output(&i);
        let parent_fingerprint = self.fingerprint();

        log_debug!(
            "ed25519",
            "Derived child node",
            depth = depth,
            index = format!("{}'", index & !HARDENED),
            parent_fingerprint = format!("{:08x}", parent_fingerprint),
        );

        Self::from_private_key(
            private_key,
            chain_code,
            self.network,
            depth,
            index,
            parent_fingerprint,
            self.mac.clone(),
        )
    }
}

impl CurveNode for Ed25519Node {
    fn network(&self) -> &Network {
        &self.network
    }

    fn depth(&self) -> u8 {
        self.depth
    }

    fn child_index(&self) -> u32 {
        self.child_index
    }

    fn parent_fingerprint(&self) -> u32 {
        self.parent_fingerprint
    }

    fn chain_code(&self) -> [u8; 32] {
        self.chain_code
    }

    fn private_key(&self) -> Option<Zeroizing<[u8; 32]>> {
        self.private_key.clone()
    }

    fn public_key(&self) -> Vec<u8> {
        self.public_key_bytes().to_vec()
    }

    fn identifier_key(&self) -> Vec<u8> {
        self.canonical_public_key().to_vec()
    }

    fn is_neutered(&self) -> bool {
        self.private_key.is_none()
    }

    fn neutered(&self) -> Self {
        Self {
            private_key: None,
            public_key: OnceLock::from(self.public_key()),
            chain_code: self.chain_code,
            network: self.network,
            depth: self.depth,
            child_index: self.child_index,
            parent_fingerprint: self.parent_fingerprint,
            mac: self.mac.clone(),
        }
    }

    fn derive(&self, index: u32) -> HdResult<Self> {
        let hardened = index >= HARDENED;
        if hardened {
            return self.ckd_priv(index);
        }
        if self.is_neutered() {
            return Err(HdError::MissingPrivateKey);
        }
        Err(HdError::UnsupportedOperation(
            "Non-hardened key derivation is not permitted with the Ed25519 curve".into(),
        ))
    }

    fn derive_hardened(&self, index: u32) -> HdResult<Self> {
        if index >= HARDENED {
            return Err(HdError::HardenedIndexOverflow(index));
        }
        self.derive(index | HARDENED)
    }

    /// Every segment is derived hardened, with or without the `'` marker.
    /// Only `'` is accepted as a marker.
    fn derive_path(&self, path: &str) -> HdResult<Self> {
        let path = parse_path_hardened_only(path)?;
        if path.from_master && self.parent_fingerprint != 0 {
            return Err(HdError::InvalidDerivationOnNonMaster);
        }

        path.components
            .iter()
            .try_fold(self.clone(), |node, component| node.derive_hardened(component.index))
    }

    fn sign(&self, message: &[u8]) -> HdResult<Vec<u8>> {
        let private_key = self.private_key.as_ref().ok_or(HdError::NoPrivateKeyOnNeuteredNode)?;
        let signing_key = SigningKey::from_bytes(private_key);
        Ok(signing_key.sign(message).to_bytes().to_vec())
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        let Ok(sig_bytes) = <[u8; 64]>::try_from(signature) else {
            return false;
        };
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.canonical_public_key()) else {
            return false;
        };
        let sig = Signature::from_bytes(&sig_bytes);
        verifying_key.verify(message, &sig).is_ok()
    }

    fn to_payload(&self) -> ExtendedKeyPayload {
        match &self.private_key {
            Some(private_key) => ExtendedKeyPayload::private(
                &self.network,
                self.depth,
                self.parent_fingerprint,
                self.child_index,
                self.chain_code,
                private_key,
            ),
            None => ExtendedKeyPayload::public(
                &self.network,
                self.depth,
                self.parent_fingerprint,
                self.child_index,
                self.chain_code,
                serialized_public_key(self.public_key_bytes()),
            ),
        }
    }

    fn to_wif(&self) -> HdResult<String> {
        Err(HdError::UnsupportedConversion(
            "Ed25519 extended keys cannot be converted to WIF, use the hex private key instead".into(),
        ))
    }
}

impl PartialEq for Ed25519Node {
    fn eq(&self, other: &Self) -> bool {
        self.private_key == other.private_key
            && self.canonical_public_key() == other.canonical_public_key()
            && self.chain_code == other.chain_code
            && self.network == other.network
            && self.depth == other.depth
            && self.child_index == other.child_index
            && self.parent_fingerprint == other.parent_fingerprint
    }
}

impl Eq for Ed25519Node {}

impl fmt::Debug for Ed25519Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ed25519Node")
            .field("network", &self.network)
            .field("depth", &self.depth)
            .field("child_index", &self.child_index)
            .field("parent_fingerprint", &format_args!("{:08x}", self.parent_fingerprint))
            .field("neutered", &self.private_key.is_none())
            .field("mac", &self.mac.mac_type)
            .finish()
    }
}

// MARK: - Helpers

fn check_curve(network: &Network) -> HdResult<()> {
    if network.curve != CurveAlgorithm::Ed25519 {
        return Err(HdError::NetworkMismatch(format!(
            "Ed25519 node requires an ed25519 network, got {}",
            network.curve
        )));
    }
    Ok(())
}

fn split_output(i: &[u8; 64]) -> (Zeroizing<[u8; 32]>, [u8; 32]) {
    let mut private_key = Zeroizing::new([0u8; 32]);
    private_key.copy_from_slice(&i[..32]);
    let mut chain_code = [0u8; 32];
    chain_code.copy_from_slice(&i[32..]);
    (private_key, chain_code)
}

/// 33-byte key data: a 32-byte point gets a 0x00 prefix
fn serialized_public_key(raw: &[u8]) -> [u8; 33] {
    let mut out = [0u8; 33];
    out[33 - raw.len()..].copy_from_slice(raw);
    out
}

// MARK: - Tests
