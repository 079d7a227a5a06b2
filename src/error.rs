//! Unified error type for extended-key operations
//!
//! Every fallible operation in the crate returns [`HdResult`]. Failures are
//! deterministic input-validation errors; nothing here is retried.

use thiserror::Error;

/// Errors raised while creating, deriving, parsing or exporting extended keys
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HdError {
    // MARK: - Seeds and derivation
    #[error("Seed must be between 128 and 512 bits, got {bits} bits")]
    InvalidSeedLength { bits: usize },

    #[error("Missing private key for hardened child key derivation")]
    MissingPrivateKeyForHardenedDerivation,

    #[error("Missing private key for normal child key derivation")]
    MissingPrivateKey,

    #[error("Hardened index {0} must be smaller than 2^31")]
    HardenedIndexOverflow(u32),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Invalid derivation path: {0}")]
    InvalidPath(String),

    #[error("Cannot derive a master path ('m') from a non-master key")]
    InvalidDerivationOnNonMaster,

    #[error("Maximum derivation depth exceeded")]
    DepthOverflow,

    // MARK: - Serialized payloads
    #[error("Invalid extended key payload length: expected 78 bytes, got {0}")]
    InvalidPayloadLength(usize),

    #[error("Unrecognized extended key version 0x{0:08x}")]
    UnrecognizedVersion(u32),

    #[error("Private key marker must be 0x00, got 0x{0:02x}")]
    MalformedPrivateKeyMarker(u8),

    #[error("Master key (depth 0) must have a zero parent fingerprint")]
    MasterWithParent,

    #[error("Master key (depth 0) must have a zero child index")]
    MasterWithNonZeroIndex,

    #[error("Invalid base58: {0}")]
    InvalidBase58(String),

    #[error("Invalid base58check checksum")]
    InvalidChecksum,

    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    // MARK: - Key access
    #[error("Cannot read private key of a neutered (public-only) key")]
    NoPrivateKeyOnNeuteredNode,

    #[error("Unsupported conversion: {0}")]
    UnsupportedConversion(String),

    #[error("Network mismatch: {0}")]
    NetworkMismatch(String),

    #[error("MAC mismatch: {0}")]
    MacMismatch(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    // MARK: - Collaborators
    #[error("BIP32 error: {0}")]
    Bip32(String),

    #[error("Mnemonic error: {0}")]
    Mnemonic(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("MAC computation failed: {0}")]
    MacFailure(String),
}

/// Result alias used across the crate
pub type HdResult<T> = Result<T, HdError>;

// MARK: - Conversions

impl From<hex::FromHexError> for HdError {
    fn from(err: hex::FromHexError) -> Self {
        HdError::InvalidHex(err.to_string())
    }
}

impl From<bitcoin::bip32::Error> for HdError {
    fn from(err: bitcoin::bip32::Error) -> Self {
        HdError::Bip32(err.to_string())
    }
}

impl From<bitcoin::secp256k1::Error> for HdError {
    fn from(err: bitcoin::secp256k1::Error) -> Self {
        HdError::InvalidPrivateKey(err.to_string())
    }
}

impl From<bip39::Error> for HdError {
    fn from(err: bip39::Error) -> Self {
        HdError::Mnemonic(err.to_string())
    }
}

impl From<serde_json::Error> for HdError {
    fn from(err: serde_json::Error) -> Self {
        HdError::Config(err.to_string())
    }
}

impl From<bs58::decode::Error> for HdError {
    fn from(err: bs58::decode::Error) -> Self {
        HdError::InvalidBase58(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_length_message() {
        let short = HdError::InvalidSeedLength { bits: 64 };
        assert!(short.to_string().contains("128 and 512 bits"));
        assert!(short.to_string().contains("64"));
    }

    #[test]
    fn test_hex_conversion() {
        let err: HdError = hex::decode("zz").unwrap_err().into();
        assert!(matches!(err, HdError::InvalidHex(_)));
    }

    #[test]
    fn test_version_formatting() {
        let err = HdError::UnrecognizedVersion(0x0488ade4);
        assert_eq!(err.to_string(), "Unrecognized extended key version 0x0488ade4");
    }
}
