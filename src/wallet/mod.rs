//! Wallet Module
//!
//! Derivation paths, extended key serialization and the `ExtendedKey`
//! façade, plus BIP39 mnemonics for seeding.

pub mod derivation_path;
pub mod extended_key;
pub mod keygen;
pub mod payload;

pub use derivation_path::*;
pub use extended_key::*;
pub use keygen::*;
pub use payload::*;
