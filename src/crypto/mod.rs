//! Cryptographic building blocks
//!
//! - MAC selection for derivation (HMAC-SHA512, KMAC256)
//! - Key identifier hashing
//! - Curve nodes (secp256k1, ed25519)

pub mod curves;
pub mod hash;
pub mod mac;

pub use curves::{CurveNode, Ed25519Node, Node, Secp256k1Node};
pub use hash::{fingerprint, identifier_hash};
pub use mac::{MacConfig, MacType};
