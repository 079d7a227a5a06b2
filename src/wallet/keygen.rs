//! Mnemonic Pass Phrases (BIP39)
//!
//! Produces the seeds fed into extended-key master generation.
//!
//! SECURITY: entropy and seeds are returned in `Zeroizing` buffers.

use bip39::Mnemonic;
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;
use unicode_normalization::UnicodeNormalization;
use zeroize::Zeroizing;

use crate::error::{HdError, HdResult};

/// Default strength in bits (24 words)
pub const DEFAULT_STRENGTH: usize = 256;

/// English BIP39 mnemonic
#[derive(Clone, PartialEq, Eq)]
pub struct MnemonicPassPhrase {
    mnemonic: Mnemonic,
}

impl MnemonicPassPhrase {
    /// Random mnemonic with `strength` bits of entropy (128 to 256, multiple of 32)
    pub fn create_random(strength: usize) -> HdResult<Self> {
        if !(128..=256).contains(&strength) || strength % 32 != 0 {
            return Err(HdError::Mnemonic(format!(
                "Invalid strength {}: must be 128, 160, 192, 224 or 256 bits",
                strength
            )));
        }

        let mut entropy = Zeroizing::new([0u8; 32]);
        let len = strength / 8;
        OsRng.fill_bytes(&mut entropy[..len]);

        Self::from_entropy(&entropy[..len])
    }

    pub fn from_entropy(entropy: &[u8]) -> HdResult<Self> {
        let mnemonic = Mnemonic::from_entropy(entropy)?;
        Ok(Self { mnemonic })
    }

    /// Parse a phrase; whitespace is collapsed and the text NFKD-normalized
    pub fn parse(phrase: &str) -> HdResult<Self> {
        let normalized = Zeroizing::new(normalize_phrase(phrase));
        let mnemonic = Mnemonic::parse_normalized(&normalized)?;
        Ok(Self { mnemonic })
    }

    /// Whether `phrase` is a valid English BIP39 mnemonic
    pub fn is_valid(phrase: &str) -> bool {
        Self::parse(phrase).is_ok()
    }

    /// 64-byte BIP39 seed (PBKDF2-HMAC-SHA512, 2048 rounds)
    pub fn to_seed(&self, password: &str) -> Zeroizing<[u8; 64]> {
        let password = Zeroizing::new(password.nfkd().collect::<String>());
        Zeroizing::new(self.mnemonic.to_seed_normalized(&password))
    }

    /// Hex-encoded seed, ready for `ExtendedKey::create_from_seed`
    pub fn to_seed_hex(&self, password: &str) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.to_seed(password).as_slice()))
    }

    pub fn to_entropy(&self) -> Zeroizing<Vec<u8>> {
        let (bytes, len) = self.mnemonic.to_entropy_array();
        Zeroizing::new(bytes[..len].to_vec())
    }

    pub fn word_count(&self) -> usize {
        self.mnemonic.word_count()
    }

    pub fn words(&self) -> Vec<String> {
        self.mnemonic
            .to_string()
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }
}

impl fmt::Display for MnemonicPassPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic)
    }
}

impl fmt::Debug for MnemonicPassPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MnemonicPassPhrase([{} words])", self.word_count())
    }
}

fn normalize_phrase(phrase: &str) -> String {
    phrase
        .nfkd()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORDS: &str = "alpha pattern real admit vacuum wall ready code correct program depend valid focus basket whisper firm tray fit rally day dance demise engine mango";

    #[test]
    fn test_parse_and_entropy() {
        let mnemonic = MnemonicPassPhrase::parse(WORDS).unwrap();
        assert_eq!(mnemonic.word_count(), 24);
        assert_eq!(mnemonic.words().len(), 24);
        assert_eq!(mnemonic.to_string(), WORDS);
        assert_eq!(
            hex::encode(mnemonic.to_entropy().as_slice()),
            "07142acb81df09ed6cb16830957cebf865a2267ea2bae7aafac51c037474929c"
        );
    }

    #[test]
    fn test_parse_normalizes_whitespace() {
        let messy = format!("  {}  ", WORDS.replace(' ', "   "));
        assert_eq!(MnemonicPassPhrase::parse(&messy).unwrap().to_string(), WORDS);
    }

    #[test]
    fn test_is_valid() {
        assert!(MnemonicPassPhrase::is_valid(WORDS));
        let missing_first = WORDS.splitn(2, ' ').nth(1).unwrap();
        assert!(!MnemonicPassPhrase::is_valid(missing_first));
    }

    #[test]
    fn test_seed_password() {
        let mnemonic = MnemonicPassPhrase::parse(WORDS).unwrap();
        let plain = mnemonic.to_seed("");
        let again = mnemonic.to_seed("");
        let with_password = mnemonic.to_seed("your-password");
        assert_eq!(plain.len(), 64);
        assert_eq!(plain, again);
        assert_ne!(plain, with_password);
        assert_eq!(mnemonic.to_seed_hex("").len(), 128);
    }

    #[test]
    fn test_bip39_reference_seed() {
        // Trezor reference vector, passphrase "TREZOR"
        let mnemonic = MnemonicPassPhrase::parse(
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about",
        )
        .unwrap();
        assert_eq!(
            mnemonic.to_seed_hex("TREZOR").as_str(),
            "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e53495531f09a6987599d18264c1e1c92f2cf141630c7a3c4ab7c81b2f001698e7463b04"
        );
    }

    #[test]
    fn test_create_random_strengths() {
        for (strength, words) in [(128, 12), (160, 15), (192, 18), (224, 21), (256, 24)] {
            let mnemonic = MnemonicPassPhrase::create_random(strength).unwrap();
            assert_eq!(mnemonic.word_count(), words);
            assert_eq!(mnemonic.to_entropy().len(), strength / 8);
        }
        assert!(MnemonicPassPhrase::create_random(DEFAULT_STRENGTH).is_ok());
    }

    #[test]
    fn test_create_random_rejects_bad_strength() {
        for strength in [64, 96, 130, 288] {
            assert!(matches!(
                MnemonicPassPhrase::create_random(strength),
                Err(HdError::Mnemonic(_))
            ));
        }
    }
}
