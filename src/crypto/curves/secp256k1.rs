//! secp256k1 HD Node
//!
//! BIP32 derivation is delegated to `bitcoin::bip32`. This module adapts
//! `Xpriv`/`Xpub` to [`CurveNode`] and serializes through the shared
//! payload codec so custom network prefixes are honoured.

use super::{check_seed_length, CurveNode};
use crate::crypto::hash::sha256;
use crate::error::{HdError, HdResult};
use crate::log_debug;
use crate::network::{CurveAlgorithm, Network};
use crate::utils::crypto::encode_wif;
use crate::wallet::derivation_path::{parse_path, HARDENED};
use crate::wallet::payload::{ExtendedKeyPayload, KeyMaterial};
use bitcoin::bip32::{ChainCode, ChildNumber, Fingerprint, Xpriv, Xpub};
use bitcoin::secp256k1::{ecdsa::Signature, Message, PublicKey, Secp256k1, SecretKey};
use bitcoin::NetworkKind;
use std::fmt;
use zeroize::Zeroizing;

#[derive(Clone, PartialEq, Eq)]
enum SecpKey {
    Private(Xpriv),
    Public(Xpub),
}

/// secp256k1 node of an HD tree
#[derive(Clone, PartialEq, Eq)]
pub struct Secp256k1Node {
    key: SecpKey,
    network: Network,
}

impl Secp256k1Node {
    /// Master node from a 16 to 64 byte seed ("Bitcoin seed" HMAC-SHA512)
    pub fn from_seed(seed: &[u8], network: Network) -> HdResult<Self> {
        check_seed_length(seed)?;
        check_curve(&network)?;

        let xpriv = Xpriv::new_master(NetworkKind::Main, seed)?;
        log_debug!("secp256k1", "Created master node", network = network);

        Ok(Self {
            key: SecpKey::Private(xpriv),
            network,
        })
    }

    pub fn from_payload(payload: &ExtendedKeyPayload, network: Network) -> HdResult<Self> {
        check_curve(&network)?;
        payload.validate(&network)?;

        let depth = payload.depth;
        let parent_fingerprint = Fingerprint::from(payload.parent_fingerprint.to_be_bytes());
        let child_number = ChildNumber::from(payload.child_index);
        let chain_code = ChainCode::from(payload.chain_code);

        let key = match payload.key_material(&network) {
            KeyMaterial::Private(private_key) => {
                let private_key = SecretKey::from_slice(private_key.as_slice())?;
                SecpKey::Private(Xpriv {
                    network: NetworkKind::Main,
                    depth,
                    parent_fingerprint,
                    child_number,
                    private_key,
                    chain_code,
                })
            }
            KeyMaterial::Public(public_key) => {
                let public_key = PublicKey::from_slice(&public_key)
                    .map_err(|e| HdError::InvalidPublicKey(e.to_string()))?;
                SecpKey::Public(Xpub {
                    network: NetworkKind::Main,
                    depth,
                    parent_fingerprint,
                    child_number,
                    public_key,
                    chain_code,
                })
            }
        };

        Ok(Self { key, network })
    }

    pub fn from_base58(text: &str, network: Network) -> HdResult<Self> {
        let payload = ExtendedKeyPayload::from_base58(text, &network)?;
        Self::from_payload(&payload, network)
    }

    fn secret_key(&self) -> Option<&SecretKey> {
        match &self.key {
            SecpKey::Private(xpriv) => Some(&xpriv.private_key),
            SecpKey::Public(_) => None,
        }
    }

    fn point(&self) -> PublicKey {
        match &self.key {
            SecpKey::Private(xpriv) => PublicKey::from_secret_key(&Secp256k1::new(), &xpriv.private_key),
            SecpKey::Public(xpub) => xpub.public_key,
        }
    }

    /// Signed messages are 32-byte digests; anything else is SHA-256 hashed first
    fn message_digest(message: &[u8]) -> Message {
        let digest = <[u8; 32]>::try_from(message).unwrap_or_else(|_| sha256(message));
        Message::from_digest(digest)
    }
}

impl CurveNode for Secp256k1Node {
    fn network(&self) -> &Network {
        &self.network
    }

    fn depth(&self) -> u8 {
        match &self.key {
            SecpKey::Private(xpriv) => xpriv.depth,
            SecpKey::Public(xpub) => xpub.depth,
        }
    }

    fn child_index(&self) -> u32 {
        match &self.key {
            SecpKey::Private(xpriv) => u32::from(xpriv.child_number),
            SecpKey::Public(xpub) => u32::from(xpub.child_number),
        }
    }

    fn parent_fingerprint(&self) -> u32 {
        let fp = match &self.key {
            SecpKey::Private(xpriv) => xpriv.parent_fingerprint,
            SecpKey::Public(xpub) => xpub.parent_fingerprint,
        };
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&fp[..]);
        u32::from_be_bytes(bytes)
    }

    fn chain_code(&self) -> [u8; 32] {
        let cc = match &self.key {
            SecpKey::Private(xpriv) => xpriv.chain_code,
            SecpKey::Public(xpub) => xpub.chain_code,
        };
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&cc[..]);
        bytes
    }

    fn private_key(&self) -> Option<Zeroizing<[u8; 32]>> {
        self.secret_key().map(|sk| Zeroizing::new(sk.secret_bytes()))
    }

    /// 33-byte compressed point
    fn public_key(&self) -> Vec<u8> {
        self.point().serialize().to_vec()
    }

    fn is_neutered(&self) -> bool {
        matches!(self.key, SecpKey::Public(_))
    }

    fn neutered(&self) -> Self {
        let xpub = match &self.key {
            SecpKey::Private(xpriv) => Xpub::from_priv(&Secp256k1::new(), xpriv),
            SecpKey::Public(xpub) => *xpub,
        };
        Self {
            key: SecpKey::Public(xpub),
            network: self.network,
        }
    }

    fn derive(&self, index: u32) -> HdResult<Self> {
        if self.depth() == u8::MAX {
            return Err(HdError::DepthOverflow);
        }

        let secp = Secp256k1::new();
        let step = [ChildNumber::from(index)];
        let key = match &self.key {
            SecpKey::Private(xpriv) => SecpKey::Private(xpriv.derive_priv(&secp, &step)?),
            SecpKey::Public(_) if index >= HARDENED => {
                return Err(HdError::MissingPrivateKeyForHardenedDerivation);
            }
            SecpKey::Public(xpub) => SecpKey::Public(xpub.derive_pub(&secp, &step)?),
        };
        let child = Self {
            key,
            network: self.network,
        };

        log_debug!(
            "secp256k1",
            "Derived child node",
            depth = child.depth(),
            index = step[0],
            parent_fingerprint = format!("{:08x}", child.parent_fingerprint()),
        );

        Ok(child)
    }

    fn derive_hardened(&self, index: u32) -> HdResult<Self> {
        if index >= HARDENED {
            return Err(HdError::HardenedIndexOverflow(index));
        }
        self.derive(index | HARDENED)
    }

    /// Segments marked `'` or `h` are hardened, others are normal.
    fn derive_path(&self, path: &str) -> HdResult<Self> {
        let path = parse_path(path)?;
        if path.from_master && self.parent_fingerprint() != 0 {
            return Err(HdError::InvalidDerivationOnNonMaster);
        }

        path.components
            .iter()
            .try_fold(self.clone(), |node, component| node.derive(component.full_index()))
    }

    /// 64-byte compact ECDSA signature
    fn sign(&self, message: &[u8]) -> HdResult<Vec<u8>> {
        let sk = self.secret_key().ok_or(HdError::NoPrivateKeyOnNeuteredNode)?;
        let msg = Self::message_digest(message);
        let sig = Secp256k1::new().sign_ecdsa(&msg, sk);
        Ok(sig.serialize_compact().to_vec())
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        let Ok(sig) = Signature::from_compact(signature) else {
            return false;
        };
        let msg = Self::message_digest(message);
        Secp256k1::new().verify_ecdsa(&msg, &sig, &self.point()).is_ok()
    }

    fn to_payload(&self) -> ExtendedKeyPayload {
        match &self.key {
            SecpKey::Private(xpriv) => ExtendedKeyPayload::private(
                &self.network,
                self.depth(),
                self.parent_fingerprint(),
                self.child_index(),
                self.chain_code(),
                &Zeroizing::new(xpriv.private_key.secret_bytes()),
            ),
            SecpKey::Public(xpub) => ExtendedKeyPayload::public(
                &self.network,
                self.depth(),
                self.parent_fingerprint(),
                self.child_index(),
                self.chain_code(),
                xpub.public_key.serialize(),
            ),
        }
    }

    fn to_wif(&self) -> HdResult<String> {
        let sk = self.secret_key().ok_or(HdError::NoPrivateKeyOnNeuteredNode)?;
        Ok(encode_wif(&Zeroizing::new(sk.secret_bytes())))
    }
}

impl fmt::Debug for Secp256k1Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secp256k1Node")
            .field("network", &self.network)
            .field("depth", &self.depth())
            .field("child_index", &self.child_index())
            .field("parent_fingerprint", &format_args!("{:08x}", self.parent_fingerprint()))
            .field("neutered", &self.is_neutered())
            .finish()
    }
}

fn check_curve(network: &Network) -> HdResult<()> {
    if network.curve != CurveAlgorithm::Secp256k1 {
        return Err(HdError::NetworkMismatch(format!(
            "secp256k1 node requires a secp256k1 network, got {}",
            network.curve
        )));
    }
    Ok(())
}

// MARK: - Tests

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = "000102030405060708090a0b0c0d0e0f";

    fn master() -> Secp256k1Node {
        Secp256k1Node::from_seed(&hex::decode(SEED).unwrap(), Network::BITCOIN).unwrap()
    }

    #[test]
    fn test_bip32_vector1_master() {
        let node = master();
        assert_eq!(
            node.to_base58(),
            "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi"
        );
        assert_eq!(
            node.neutered().to_base58(),
            "xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8NqtwybGhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD265TMg7usUDFdp6W1EGMcet8"
        );
        assert_eq!(node.fingerprint(), 0x3442193e);
    }

    #[test]
    fn test_bip32_vector1_children() {
        let child = master().derive_path("m/0'").unwrap();
        assert_eq!(
            hex::encode(child.private_key().unwrap().as_slice()),
            "edb2e14f9ee77d26dd93b4ecede8d16ed408ce149b6cd80b0715a2d911a0afea"
        );
        assert_eq!(child.parent_fingerprint(), 0x3442193e);

        let grandchild = child.derive(1).unwrap();
        assert_eq!(
            grandchild.to_base58(),
            "xprv9wTYmMFdV23N2TdNG573QoEsfRrWKQgWeibmLntzniatZvR9BmLnvSxqu53Kw1UmYPxLgboyZQaXwTCg8MSY3H2EU4pWcQDnRnrVA1xe8fs"
        );
    }

    #[test]
    fn test_public_derivation_matches_private() {
        let child = master().derive_path("m/0'").unwrap();
        let from_public = child.neutered().derive(1).unwrap();
        assert_eq!(from_public, child.derive(1).unwrap().neutered());
        assert_eq!(
            from_public.to_base58(),
            "xpub6ASuArnXKPbfEwhqN6e3mwBcDTgzisQN1wXN9BJcM47sSikHjJf3UFHKkNAWbWMiGj7Wf5uMash7SyYq527Hqck2AxYysAA7xmALppuCkwQ"
        );
    }

    #[test]
    fn test_neutered_hardened_fails() {
        let public = master().neutered();
        assert_eq!(
            public.derive_hardened(0),
            Err(HdError::MissingPrivateKeyForHardenedDerivation)
        );
        assert_eq!(public.derive_path("m/0'"), Err(HdError::MissingPrivateKeyForHardenedDerivation));
    }

    #[test]
    fn test_parse_round_trip() {
        let xpub = "xpub68Gmy5EdvgibQVfPdqkBBCHxA5htiqg55crXYuXoQRKfDBFA1WEjWgP6LHhwBZeNK1VTsfTFUHCdrfp1bgwQ9xv5ski8PX9rL2dZXvgGDnw";
        let node = Secp256k1Node::from_base58(xpub, Network::BITCOIN).unwrap();
        assert!(node.is_neutered());
        assert_eq!(node.depth(), 1);
        assert_eq!(node.child_index(), HARDENED);
        assert_eq!(node.to_base58(), xpub);
        assert_eq!(
            hex::encode(&node.public_key()[1..]),
            "5a784662a4a20a65bf6aab9ae98a6c068a81c52e4b032c0fb5400c706cfccc56"
        );
    }

    #[test]
    fn test_sign_and_verify() {
        let node = master().derive_path("m/44'/0'/0'/0/0").unwrap();
        let sig = node.sign(b"extended keys").unwrap();
        assert_eq!(sig.len(), 64);
        assert!(node.verify(b"extended keys", &sig));
        assert!(node.neutered().verify(b"extended keys", &sig));
        assert!(!node.verify(b"other message", &sig));
        assert!(!node.verify(b"extended keys", &sig[..10]));
    }

    #[test]
    fn test_wif_export() {
        let node = master();
        let wif = node.to_wif().unwrap();
        assert!(wif.starts_with('K') || wif.starts_with('L'));
        assert_eq!(node.neutered().to_wif(), Err(HdError::NoPrivateKeyOnNeuteredNode));
    }

    #[test]
    fn test_seed_length_and_network_checks() {
        assert_eq!(
            Secp256k1Node::from_seed(&[0u8; 15], Network::BITCOIN),
            Err(HdError::InvalidSeedLength { bits: 120 })
        );
        assert!(matches!(
            Secp256k1Node::from_seed(&[0u8; 32], Network::BITXOR),
            Err(HdError::NetworkMismatch(_))
        ));
    }
}
