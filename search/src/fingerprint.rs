//! Content fingerprints with domain separation.
//!
//! Node dedup and cache keys both hash text; the domain prefixes keep the
//! two keyspaces from ever colliding. Exactly one place defines hashing.

use sha2::{Digest, Sha256};

/// Domain prefix for search-node text fingerprints.
pub const DOMAIN_SEARCH_NODE: &[u8] = b"PEEL::SEARCH_NODE\0";

/// Domain prefix for decode-cache keys.
pub const DOMAIN_CACHE_KEY: &[u8] = b"PEEL::CACHE_KEY\0";

/// A content-addressed hash in `"algorithm:hex_digest"` format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash {
    full: String,
    colon: usize,
}

impl ContentHash {
    /// Parse from `"algorithm:hex"` format. Returns `None` for a missing
    /// separator or empty algorithm/digest.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let colon = s.find(':')?;
        if colon == 0 || colon == s.len() - 1 {
            return None;
        }
        Some(Self {
            full: s.to_string(),
            colon,
        })
    }

    /// The algorithm portion (always `"sha256"` for fingerprints produced
    /// here).
    #[must_use]
    pub fn algorithm(&self) -> &str {
        &self.full[..self.colon]
    }

    /// The hex digest portion.
    #[must_use]
    pub fn hex_digest(&self) -> &str {
        &self.full[self.colon + 1..]
    }

    /// The full `"algorithm:hex_digest"` string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.full
    }
}

/// Compute the domain-separated SHA-256 fingerprint of `data`.
#[must_use]
pub fn fingerprint(domain: &[u8], data: &[u8]) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update(domain);
    hasher.update(data);
    let digest = hasher.finalize();
    let full = format!("sha256:{}", hex::encode(digest));
    ContentHash {
        colon: "sha256".len(),
        full,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_deterministic() {
        let a = fingerprint(DOMAIN_SEARCH_NODE, b"hello");
        let b = fingerprint(DOMAIN_SEARCH_NODE, b"hello");
        assert_eq!(a, b);
        assert_eq!(a.algorithm(), "sha256");
        assert_eq!(a.hex_digest().len(), 64);
    }

    #[test]
    fn domains_separate_identical_payloads() {
        let node = fingerprint(DOMAIN_SEARCH_NODE, b"hello");
        let cache = fingerprint(DOMAIN_CACHE_KEY, b"hello");
        assert_ne!(node, cache);
    }

    #[test]
    fn parse_round_trips() {
        let h = fingerprint(DOMAIN_SEARCH_NODE, b"x");
        let parsed = ContentHash::parse(h.as_str()).unwrap();
        assert_eq!(parsed, h);
    }

    #[test]
    fn parse_rejects_bad_format() {
        assert!(ContentHash::parse("nocolon").is_none());
        assert!(ContentHash::parse(":nodigest").is_none());
        assert!(ContentHash::parse("noalg:").is_none());
    }
}
