//! Network Registry
//!
//! A [`Network`] pairs the two BIP32 version prefixes with the curve that
//! keys under those prefixes live on. The wire format carries no curve tag,
//! so the same `xprv`/`xpub` string decodes differently under `BITCOIN` and
//! `BITXOR`.

use crate::error::HdError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// MARK: - Curve Algorithm

/// Elliptic curve used by a network's keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveAlgorithm {
    /// secp256k1, BIP32 derivation
    Secp256k1,
    /// Ed25519, SLIP-10 hardened-only derivation
    Ed25519,
}

impl CurveAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Secp256k1 => "secp256k1",
            Self::Ed25519 => "ed25519",
        }
    }

    /// Whether the curve supports public-parent to public-child derivation
    pub fn supports_normal_derivation(&self) -> bool {
        matches!(self, Self::Secp256k1)
    }
}

impl fmt::Display for CurveAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CurveAlgorithm {
    type Err = HdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "secp256k1" => Ok(Self::Secp256k1),
            "ed25519" => Ok(Self::Ed25519),
            other => Err(HdError::Config(format!("Unknown curve: {}", other))),
        }
    }
}

// MARK: - Network

/// Version prefixes and curve of an extended-key network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Network {
    pub public_key_prefix: u32,
    pub private_key_prefix: u32,
    pub curve: CurveAlgorithm,
}

impl Network {
    /// Bitcoin mainnet (`xpub`/`xprv`) on secp256k1
    pub const BITCOIN: Network = Network {
        public_key_prefix: 0x0488b21e,
        private_key_prefix: 0x0488ade4,
        curve: CurveAlgorithm::Secp256k1,
    };

    /// Bitxor (`xpub`/`xprv` prefixes) on Ed25519
    pub const BITXOR: Network = Network {
        public_key_prefix: 0x0488b21e,
        private_key_prefix: 0x0488ade4,
        curve: CurveAlgorithm::Ed25519,
    };

    pub const fn new(public_key_prefix: u32, private_key_prefix: u32, curve: CurveAlgorithm) -> Self {
        Self {
            public_key_prefix,
            private_key_prefix,
            curve,
        }
    }

    /// Look up a registered network by name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Network> {
        match name.to_lowercase().as_str() {
            "bitcoin" => Some(Self::BITCOIN),
            "bitxor" => Some(Self::BITXOR),
            _ => None,
        }
    }

    /// Name of a registered network, `None` for custom ones
    pub fn name(&self) -> Option<&'static str> {
        if *self == Self::BITCOIN {
            Some("bitcoin")
        } else if *self == Self::BITXOR {
            Some("bitxor")
        } else {
            None
        }
    }

    pub fn is_private_version(&self, version: u32) -> bool {
        version == self.private_key_prefix
    }

    pub fn is_public_version(&self, version: u32) -> bool {
        version == self.public_key_prefix
    }

    /// Version prefix used when serializing a key of the given kind
    pub fn version_for(&self, has_private_key: bool) -> u32 {
        if has_private_key {
            self.private_key_prefix
        } else {
            self.public_key_prefix
        }
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::BITCOIN
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({})", name, self.curve),
            None => write!(
                f,
                "custom (pub 0x{:08x}, prv 0x{:08x}, {})",
                self.public_key_prefix, self.private_key_prefix, self.curve
            ),
        }
    }
}

// MARK: - Tests
