//! Message authentication codes driving key derivation
//!
//! - `HMAC`: HMAC-SHA512 (BIP32 / SLIP-10)
//! - `KMAC`: KMAC256 with a 512-bit output (NIST SP 800-185)
//!
//! Both produce a 64-byte `I` that callers split into `IL ‖ IR`.

use crate::error::{HdError, HdResult};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tiny_keccak::{Hasher, Kmac};
use zeroize::Zeroizing;

type HmacSha512 = Hmac<sha2::Sha512>;

/// Length of a MAC output in bytes
pub const MAC_OUTPUT_LEN: usize = 64;

/// MAC algorithm used during derivation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacType {
    #[default]
    Hmac,
    Kmac,
}

impl MacType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hmac => "hmac",
            Self::Kmac => "kmac",
        }
    }
}

impl fmt::Display for MacType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MacType {
    type Err = HdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hmac" => Ok(Self::Hmac),
            "kmac" => Ok(Self::Kmac),
            other => Err(HdError::Config(format!("Unknown MAC type: {}", other))),
        }
    }
}

/// MAC algorithm together with an optional KMAC customization string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct MacConfig {
    pub mac_type: MacType,
    pub customization: Option<Vec<u8>>,
}

impl MacConfig {
    pub fn new(mac_type: MacType) -> Self {
        Self {
            mac_type,
            customization: None,
        }
    }

    pub fn with_customization(mut self, customization: impl Into<Vec<u8>>) -> Self {
        self.customization = Some(customization.into());
        self
    }

    pub fn compute(&self, key: &[u8], data: &[u8]) -> HdResult<Zeroizing<[u8; MAC_OUTPUT_LEN]>> {
        compute(self.mac_type, key, data, self.customization.as_deref())
    }
}

impl From<MacType> for MacConfig {
    fn from(mac_type: MacType) -> Self {
        Self::new(mac_type)
    }
}

/// Compute a 64-byte MAC of `data` under `key`.
///
/// `salt` is the KMAC customization string; HMAC ignores it.
pub fn compute(
    mac_type: MacType,
    key: &[u8],
    data: &[u8],
    salt: Option<&[u8]>,
) -> HdResult<Zeroizing<[u8; MAC_OUTPUT_LEN]>> {
    match mac_type {
        MacType::Hmac => hmac_sha512(key, data),
        MacType::Kmac => Ok(kmac256(key, data, salt.unwrap_or_default())),
    }
}

/// HMAC-SHA512
pub fn hmac_sha512(key: &[u8], data: &[u8]) -> HdResult<Zeroizing<[u8; MAC_OUTPUT_LEN]>> {
    let mut mac = HmacSha512::new_from_slice(key)
        .map_err(|e| HdError::MacFailure(e.to_string()))?;
    mac.update(data);

    let mut out = Zeroizing::new([0u8; MAC_OUTPUT_LEN]);
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

/// KMAC256 with a 512-bit output length
pub fn kmac256(key: &[u8], data: &[u8], customization: &[u8]) -> Zeroizing<[u8; MAC_OUTPUT_LEN]> {
    let mut kmac = Kmac::v256(key, customization);
    kmac.update(data);

    let mut out = Zeroizing::new([0u8; MAC_OUTPUT_LEN]);
    kmac.finalize(&mut out[..]);
    out
}

// MARK: - Tests
