//! The decoder catalog: the ordered, static registry the engine consumes.
//!
//! The catalog is the **contract surface**; the codec modules are the
//! **implementation**. It is built once at startup from an explicit list of
//! capability implementations — no directory scanning, no reflection — and
//! passed by reference into the search engine, so concurrent searches can
//! run with different catalogs safely.

use std::cmp::Reverse;
use std::sync::Arc;

use crate::codecs::cjk::{Pawnshop, PeriodicTable};
use crate::codecs::radix::{Base32, Base58, Base64, Base85, Binary, Dna, Hex, Octal};
use crate::codecs::rotation::{Affine, Atbash, Caesar, Rot47};
use crate::codecs::symbols::{Leet, Morse, Reverse as TextReverse, TapCode};
use crate::codecs::url::Url;
use crate::codecs::vigenere::Vigenere;
use crate::decoder::Decoder;
use crate::params::DecoderParams;

/// One catalog entry: a decoder plus its resolved priority and parameters.
///
/// Higher `priority` is tried first. Within equal priorities the identifier
/// breaks the tie, so catalog order is a total order and search expansion
/// is reproducible.
#[derive(Clone)]
pub struct DecoderDescriptor {
    /// Unique decoder identifier (matches `decoder.identifier()`).
    pub identifier: &'static str,
    /// Empirical-frequency priority; higher is tried earlier.
    pub priority: i32,
    /// Resolved tunables for this decoder.
    pub params: DecoderParams,
    decoder: Arc<dyn Decoder>,
}

impl DecoderDescriptor {
    /// Wrap a decoder implementation with its default priority.
    #[must_use]
    pub fn new(decoder: Arc<dyn Decoder>, priority: i32, params: DecoderParams) -> Self {
        Self {
            identifier: decoder.identifier(),
            priority,
            params,
            decoder,
        }
    }

    /// The wrapped decoder.
    #[must_use]
    pub fn decoder(&self) -> &dyn Decoder {
        self.decoder.as_ref()
    }
}

impl std::fmt::Debug for DecoderDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoderDescriptor")
            .field("identifier", &self.identifier)
            .field("priority", &self.priority)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Error type for catalog construction and override application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Two entries share an identifier.
    DuplicateId { identifier: String },
    /// An override named a decoder that is not in the catalog.
    UnknownId { identifier: String },
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId { identifier } => {
                write!(f, "duplicate decoder identifier in catalog: {identifier}")
            }
            Self::UnknownId { identifier } => {
                write!(f, "unknown decoder identifier: {identifier}")
            }
        }
    }
}

impl std::error::Error for CatalogError {}

/// The ordered decoder registry.
///
/// Entries are kept sorted by `(priority desc, identifier asc)`; iteration
/// order **is** the engine's application order.
#[derive(Debug, Clone)]
pub struct DecoderCatalog {
    entries: Vec<DecoderDescriptor>,
}

impl DecoderCatalog {
    /// Build a catalog, rejecting duplicate identifiers and sorting into
    /// priority order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] if two descriptors share an
    /// identifier.
    pub fn new(mut descriptors: Vec<DecoderDescriptor>) -> Result<Self, CatalogError> {
        let mut seen = std::collections::BTreeSet::new();
        for d in &descriptors {
            if !seen.insert(d.identifier) {
                return Err(CatalogError::DuplicateId {
                    identifier: d.identifier.to_string(),
                });
            }
        }
        descriptors.sort_by_key(|d| (Reverse(d.priority), d.identifier));
        Ok(Self {
            entries: descriptors,
        })
    }

    /// Iterate descriptors in application order (highest priority first).
    pub fn iter(&self) -> impl Iterator<Item = &DecoderDescriptor> {
        self.entries.iter()
    }

    /// Look up a descriptor by identifier.
    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&DecoderDescriptor> {
        self.entries.iter().find(|d| d.identifier == identifier)
    }

    /// Number of registered decoders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace a decoder's priority and re-sort.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownId`] if no such decoder exists.
    pub fn override_priority(&mut self, identifier: &str, priority: i32) -> Result<(), CatalogError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|d| d.identifier == identifier)
            .ok_or_else(|| CatalogError::UnknownId {
                identifier: identifier.to_string(),
            })?;
        entry.priority = priority;
        self.entries.sort_by_key(|d| (Reverse(d.priority), d.identifier));
        Ok(())
    }

    /// Set one parameter on a decoder.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownId`] if no such decoder exists.
    pub fn override_param(
        &mut self,
        identifier: &str,
        key: &str,
        value: &str,
    ) -> Result<(), CatalogError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|d| d.identifier == identifier)
            .ok_or_else(|| CatalogError::UnknownId {
                identifier: identifier.to_string(),
            })?;
        entry.params.set(key, value);
        Ok(())
    }

    /// JSON listing of identifiers, priorities, and parameters (the `-l`
    /// surface).
    #[must_use]
    pub fn listing(&self) -> serde_json::Value {
        let decoders: Vec<serde_json::Value> = self
            .entries
            .iter()
            .map(|d| {
                let params: serde_json::Map<String, serde_json::Value> = d
                    .params
                    .iter()
                    .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
                    .collect();
                serde_json::json!({
                    "identifier": d.identifier,
                    "priority": d.priority,
                    "parameters": params,
                })
            })
            .collect();
        serde_json::json!({ "decoders": decoders })
    }
}

/// Build the built-in catalog.
///
/// Priorities reflect how often each transformation shows up in the wild:
/// Base64 and URL encoding lead, the exotic symbol ciphers trail. The
/// Vigenère decoder is only registered when a wordlist supplies candidate
/// keys — without a key source it has nothing to try.
///
/// # Panics
///
/// Panics if the static descriptor list violates identifier uniqueness
/// (programming error).
#[must_use]
pub fn builtin_catalog(wordlist: Option<Vec<String>>) -> DecoderCatalog {
    let affine_params = DecoderParams::from_pairs([("max_variants", "3")]);
    let vigenere_params = DecoderParams::from_pairs([("max_variants", "3")]);

    let mut descriptors = vec![
        DecoderDescriptor::new(Arc::new(Base64), 90, DecoderParams::new()),
        DecoderDescriptor::new(Arc::new(Url), 85, DecoderParams::new()),
        DecoderDescriptor::new(Arc::new(Hex), 80, DecoderParams::new()),
        DecoderDescriptor::new(Arc::new(Base32), 72, DecoderParams::new()),
        DecoderDescriptor::new(Arc::new(Binary), 68, DecoderParams::new()),
        DecoderDescriptor::new(Arc::new(Caesar), 62, DecoderParams::new()),
        DecoderDescriptor::new(Arc::new(TextReverse), 58, DecoderParams::new()),
        DecoderDescriptor::new(Arc::new(Morse), 56, DecoderParams::new()),
        DecoderDescriptor::new(Arc::new(Atbash), 52, DecoderParams::new()),
        DecoderDescriptor::new(Arc::new(Rot47), 48, DecoderParams::new()),
        DecoderDescriptor::new(Arc::new(Base58), 44, DecoderParams::new()),
        DecoderDescriptor::new(Arc::new(Base85), 42, DecoderParams::new()),
        DecoderDescriptor::new(Arc::new(Octal), 40, DecoderParams::new()),
        DecoderDescriptor::new(Arc::new(Leet), 32, DecoderParams::new()),
        DecoderDescriptor::new(Arc::new(Affine), 28, affine_params),
        DecoderDescriptor::new(Arc::new(TapCode), 24, DecoderParams::new()),
        DecoderDescriptor::new(Arc::new(Dna), 20, DecoderParams::new()),
        DecoderDescriptor::new(Arc::new(PeriodicTable), 14, DecoderParams::new()),
        DecoderDescriptor::new(Arc::new(Pawnshop), 12, DecoderParams::new()),
    ];

    if let Some(keys) = wordlist {
        if !keys.is_empty() {
            descriptors.push(DecoderDescriptor::new(
                Arc::new(Vigenere::new(keys)),
                36,
                vigenere_params,
            ));
        }
    }

    DecoderCatalog::new(descriptors).expect("builtin catalog identifiers are unique")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::DecodeOutcome;

    struct Stub(&'static str);

    impl Decoder for Stub {
        fn identifier(&self) -> &'static str {
            self.0
        }
        fn can_apply(&self, _text: &str) -> bool {
            true
        }
        fn decode(&self, _text: &str, _params: &DecoderParams) -> DecodeOutcome {
            DecodeOutcome::failure()
        }
    }

    #[test]
    fn catalog_orders_by_priority_then_identifier() {
        let catalog = DecoderCatalog::new(vec![
            DecoderDescriptor::new(Arc::new(Stub("bbb")), 5, DecoderParams::new()),
            DecoderDescriptor::new(Arc::new(Stub("aaa")), 5, DecoderParams::new()),
            DecoderDescriptor::new(Arc::new(Stub("ccc")), 9, DecoderParams::new()),
        ])
        .unwrap();
        let order: Vec<&str> = catalog.iter().map(|d| d.identifier).collect();
        assert_eq!(order, vec!["ccc", "aaa", "bbb"]);
    }

    #[test]
    fn duplicate_identifier_rejected() {
        let err = DecoderCatalog::new(vec![
            DecoderDescriptor::new(Arc::new(Stub("dup")), 1, DecoderParams::new()),
            DecoderDescriptor::new(Arc::new(Stub("dup")), 2, DecoderParams::new()),
        ])
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId { .. }));
    }

    #[test]
    fn override_priority_resorts() {
        let mut catalog = builtin_catalog(None);
        catalog.override_priority("pawnshop", 200).unwrap();
        assert_eq!(catalog.iter().next().unwrap().identifier, "pawnshop");
    }

    #[test]
    fn override_unknown_identifier_fails() {
        let mut catalog = builtin_catalog(None);
        let err = catalog.override_priority("nonexistent", 1).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownId { .. }));
    }

    #[test]
    fn builtin_catalog_skips_vigenere_without_wordlist() {
        assert!(builtin_catalog(None).get("vigenere").is_none());
        assert!(builtin_catalog(Some(vec![])).get("vigenere").is_none());
        assert!(builtin_catalog(Some(vec!["lemon".into()]))
            .get("vigenere")
            .is_some());
    }

    #[test]
    fn builtin_catalog_leads_with_base64() {
        let catalog = builtin_catalog(None);
        assert_eq!(catalog.iter().next().unwrap().identifier, "base64");
    }

    #[test]
    fn listing_contains_every_decoder() {
        let catalog = builtin_catalog(None);
        let listing = catalog.listing();
        let arr = listing["decoders"].as_array().unwrap();
        assert_eq!(arr.len(), catalog.len());
        assert_eq!(arr[0]["identifier"], "base64");
        assert_eq!(arr[0]["priority"], 90);
    }
}
