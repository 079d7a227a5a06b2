//! Key Configuration
//!
//! Settings for creating extended keys, loadable from JSON:
//!
//! ```json
//! { "network": "bitxor", "mac_type": "kmac", "kmac_customization": "wallet", "debug_logging": false }
//! ```
//!
//! `network` is either a registered name or an explicit
//! `{ "public_key_prefix", "private_key_prefix", "curve" }` object.

use crate::crypto::mac::{MacConfig, MacType};
use crate::error::{HdError, HdResult};
use crate::log_warn;
use crate::network::Network;
use crate::utils::logging;
use crate::wallet::extended_key::ExtendedKey;
use serde::{Deserialize, Serialize};

/// Network given by registered name or by explicit prefixes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NetworkSetting {
    Named(String),
    Explicit(Network),
}

impl NetworkSetting {
    pub fn resolve(&self) -> HdResult<Network> {
        match self {
            NetworkSetting::Named(name) => Network::from_name(name)
                .ok_or_else(|| HdError::Config(format!("Unknown network: {}", name))),
            NetworkSetting::Explicit(network) => Ok(*network),
        }
    }
}

impl Default for NetworkSetting {
    fn default() -> Self {
        NetworkSetting::Named("bitcoin".to_string())
    }
}

impl From<Network> for NetworkSetting {
    fn from(network: Network) -> Self {
        match network.name() {
            Some(name) => NetworkSetting::Named(name.to_string()),
            None => NetworkSetting::Explicit(network),
        }
    }
}

/// Extended key creation settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeyConfig {
    pub network: NetworkSetting,
    pub mac_type: MacType,
    /// KMAC customization string, ignored with HMAC
    pub kmac_customization: Option<String>,
    pub debug_logging: bool,
}

impl KeyConfig {
    pub fn new(network: Network, mac_type: MacType) -> Self {
        Self {
            network: network.into(),
            mac_type,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> HdResult<Self> {
        let config: KeyConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> HdResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Resolve the network and check it is usable
    pub fn validate(&self) -> HdResult<()> {
        let network = self.network()?;
        if network.public_key_prefix == network.private_key_prefix {
            return Err(HdError::Config(format!(
                "Public and private prefixes must differ, both are 0x{:08x}",
                network.public_key_prefix
            )));
        }
        if self.kmac_customization.is_some() && self.mac_type != MacType::Kmac {
            log_warn!("config", "kmac_customization is ignored unless mac_type is kmac");
        }
        Ok(())
    }

    pub fn network(&self) -> HdResult<Network> {
        self.network.resolve()
    }

    pub fn mac(&self) -> MacConfig {
        let mac = MacConfig::new(self.mac_type);
        match (&self.kmac_customization, self.mac_type) {
            (Some(custom), MacType::Kmac) => mac.with_customization(custom.as_bytes()),
            _ => mac,
        }
    }

    /// Switch global debug logging to match `debug_logging`
    pub fn apply_logging(&self) {
        if self.debug_logging {
            logging::enable_debug();
        } else {
            logging::disable_debug();
        }
    }

    pub fn create_from_seed(&self, seed_hex: &str) -> HdResult<ExtendedKey> {
        self.validate()?;
        ExtendedKey::create_from_seed(seed_hex, self.network()?, self.mac())
    }

    pub fn create_from_base58(&self, text: &str) -> HdResult<ExtendedKey> {
        self.validate()?;
        ExtendedKey::create_from_base58(text, self.network()?, self.mac())
    }
}

// MARK: - Tests
