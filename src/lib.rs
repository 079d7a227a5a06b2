//! HD Extended Keys
//!
//! BIP32 hierarchical-deterministic keys on secp256k1 and Ed25519.
//!
//! # Architecture
//!
//! This crate provides:
//! - **network**: version prefixes paired with a curve (`BITCOIN`, `BITXOR`)
//! - **crypto**: derivation MACs (HMAC-SHA512, KMAC256), identifier hashing,
//!   and the curve nodes (secp256k1 via `bitcoin::bip32`, Ed25519 via SLIP-0010)
//! - **wallet**: path parsing, the 78-byte payload codec, the `ExtendedKey`
//!   façade and BIP39 mnemonics
//! - **config**: JSON-loadable key settings
//!
//! # Security
//!
//! This crate uses `zeroize` to securely clear sensitive data from memory.
//! Private keys, seeds, MAC outputs and entropy are zeroed when dropped.
//!
//! # Example
//!
//! ```rust
//! use hd_extended_keys::{ExtendedKey, KeyEncoding, MacType, Network};
//!
//! let master = ExtendedKey::create_from_seed(
//!     "000102030405060708090a0b0c0d0e0f",
//!     Network::BITXOR,
//!     MacType::Hmac,
//! )?;
//! let account = master.derive_path("m/44'/4343'/0'/0'/0'")?;
//! let public_key = account.public_key(KeyEncoding::Hex);
//! assert_eq!(public_key.as_hex().map(str::len), Some(64));
//! # Ok::<(), hd_extended_keys::HdError>(())
//! ```

pub mod config;
pub mod crypto;
pub mod error;
pub mod network;
pub mod utils;
pub mod wallet;

// Re-export key types for convenience
pub use config::{KeyConfig, NetworkSetting};
pub use crypto::curves::{CurveNode, Ed25519Node, Node, Secp256k1Node};
pub use crypto::mac::{MacConfig, MacType};
pub use error::{HdError, HdResult};
pub use network::{CurveAlgorithm, Network};
pub use wallet::derivation_path::{DerivationComponent, DerivationPath, HARDENED};
pub use wallet::extended_key::{EncodedKey, ExtendedKey, KeyEncoding};
pub use wallet::keygen::MnemonicPassPhrase;
pub use wallet::payload::{ExtendedKeyPayload, KeyMaterial, PAYLOAD_LEN};
