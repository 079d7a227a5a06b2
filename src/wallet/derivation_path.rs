//! Derivation Path Parsing
//!
//! Grammar: an optional `m` master marker followed by `/`-separated
//! unsigned decimal indices, each optionally suffixed with a hardened
//! marker (`'`, `h` or `H`). The bare path `m` denotes the receiver itself.
//!
//! Hardened-only curves use a narrower grammar, see [`parse_path_hardened_only`].
//!
//! Paths are fully validated before any derivation step runs.

use crate::error::{HdError, HdResult};
use std::fmt;
use std::str::FromStr;

/// Hardened offset for BIP-32 derivation
pub const HARDENED: u32 = 0x80000000;

/// Single component of a derivation path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivationComponent {
    /// Index without the hardened offset, always below 2^31
    pub index: u32,
    pub hardened: bool,
}

impl DerivationComponent {
    pub fn new(index: u32, hardened: bool) -> Self {
        Self { index, hardened }
    }

    /// Get the full index including hardened bit
    pub fn full_index(&self) -> u32 {
        if self.hardened {
            self.index | HARDENED
        } else {
            self.index
        }
    }
}

impl fmt::Display for DerivationComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hardened {
            write!(f, "{}'", self.index)
        } else {
            write!(f, "{}", self.index)
        }
    }
}

/// Parsed derivation path
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DerivationPath {
    /// Path started with the `m` master marker
    pub from_master: bool,
    pub components: Vec<DerivationComponent>,
}

impl DerivationPath {
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DerivationComponent> {
        self.components.iter()
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        if self.from_master {
            write!(f, "m")?;
            first = false;
        }
        for component in &self.components {
            if !first {
                write!(f, "/")?;
            }
            write!(f, "{}", component)?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = HdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_path(s)
    }
}

/// Segment rules for one curve family
#[derive(Clone, Copy)]
struct Grammar {
    markers: &'static [char],
    hardened_only: bool,
}

const BIP32_GRAMMAR: Grammar = Grammar {
    markers: &['\'', 'h', 'H'],
    hardened_only: false,
};

const HARDENED_ONLY_GRAMMAR: Grammar = Grammar {
    markers: &['\''],
    hardened_only: true,
};

/// Parse a derivation path string
pub fn parse_path(path: &str) -> HdResult<DerivationPath> {
    parse_with(path, BIP32_GRAMMAR)
}

/// Parse a path for a curve with hardened derivation only.
///
/// Only `'` is accepted as a marker. Every component comes back hardened,
/// marked or not, and any index of 2^31 or more fails with
/// `HardenedIndexOverflow`.
pub fn parse_path_hardened_only(path: &str) -> HdResult<DerivationPath> {
    parse_with(path, HARDENED_ONLY_GRAMMAR)
}

fn parse_with(path: &str, grammar: Grammar) -> HdResult<DerivationPath> {
    if path.is_empty() {
        return Err(HdError::InvalidPath("empty path".into()));
    }

    let mut segments = path.split('/').peekable();
    let from_master = segments.peek() == Some(&"m");
    if from_master {
        segments.next();
    }

    let components = segments
        .map(|segment| parse_component(segment, path, grammar))
        .collect::<HdResult<Vec<_>>>()?;

    Ok(DerivationPath {
        from_master,
        components,
    })
}

/// Parse a single path component like "44'" or "0"
fn parse_component(segment: &str, path: &str, grammar: Grammar) -> HdResult<DerivationComponent> {
    let (digits, marked) = match segment.strip_suffix(grammar.markers) {
        Some(rest) => (rest, true),
        None => (segment, false),
    };
    let hardened = marked || grammar.hardened_only;

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(HdError::InvalidPath(format!(
            "invalid segment '{}' in '{}'",
            segment, path
        )));
    }

    let index: u32 = digits.parse().map_err(|_| {
        HdError::InvalidPath(format!("index {} out of range in '{}'", digits, path))
    })?;

    if index >= HARDENED {
        return Err(if hardened {
            HdError::HardenedIndexOverflow(index)
        } else {
            HdError::InvalidPath(format!("index {} must be below 2^31 in '{}'", index, path))
        });
    }

    Ok(DerivationComponent::new(index, hardened))
}

// MARK: - Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_master_only() {
        let path = parse_path("m").unwrap();
        assert!(path.from_master);
        assert!(path.is_empty());
        assert_eq!(path.to_string(), "m");
    }

    #[test]
    fn test_parse_bip44_path() {
        let path = parse_path("m/44'/4343'/0'/0'/0'").unwrap();
        assert!(path.from_master);
        assert_eq!(path.len(), 5);
        assert_eq!(path.components[0], DerivationComponent::new(44, true));
        assert_eq!(path.components[1].full_index(), 4343 | HARDENED);
        assert_eq!(path.to_string(), "m/44'/4343'/0'/0'/0'");
    }

    #[test]
    fn test_parse_relative_path() {
        let path = parse_path("0'/1/2h").unwrap();
        assert!(!path.from_master);
        assert_eq!(
            path.components,
            vec![
                DerivationComponent::new(0, true),
                DerivationComponent::new(1, false),
                DerivationComponent::new(2, true),
            ]
        );
        assert_eq!(path.to_string(), "0'/1/2'");
    }

    #[test]
    fn test_reject_malformed_paths() {
        for bad in ["", "m/", "/0", "m//0", "0/", "m/a", "m/0''", "x/0", "m/-1", "m/ 1", "mm/0", "m/0/m"] {
            assert!(
                matches!(parse_path(bad), Err(HdError::InvalidPath(_))),
                "expected InvalidPath for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_index_bounds() {
        assert!(parse_path("m/2147483647'").is_ok());
        assert_eq!(
            parse_path("m/2147483648'"),
            Err(HdError::HardenedIndexOverflow(2147483648))
        );
        assert!(matches!(parse_path("m/2147483648"), Err(HdError::InvalidPath(_))));
        assert!(matches!(parse_path("m/4294967296"), Err(HdError::InvalidPath(_))));
    }

    #[test]
    fn test_hardened_only_grammar() {
        let path = parse_path_hardened_only("m/44/4343'/0").unwrap();
        assert!(path.components.iter().all(|c| c.hardened));
        assert_eq!(path.to_string(), "m/44'/4343'/0'");

        for bad in ["m/0h", "m/0H", "0'/1h", "m/0''"] {
            assert!(
                matches!(parse_path_hardened_only(bad), Err(HdError::InvalidPath(_))),
                "expected InvalidPath for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_hardened_only_index_bounds() {
        assert!(parse_path_hardened_only("m/2147483647").is_ok());
        assert_eq!(
            parse_path_hardened_only("m/2147483648"),
            Err(HdError::HardenedIndexOverflow(2147483648))
        );
        assert_eq!(
            parse_path_hardened_only("m/0'/2147483648'"),
            Err(HdError::HardenedIndexOverflow(2147483648))
        );
        assert!(matches!(parse_path_hardened_only("m/4294967296"), Err(HdError::InvalidPath(_))));
    }
}
