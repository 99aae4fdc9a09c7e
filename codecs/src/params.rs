//! String-keyed decoder tunables.

use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Parameters for one decoder, resolved from built-in defaults plus any
/// configuration overrides.
///
/// Stored as a `BTreeMap` so iteration order — and therefore
/// [`DecoderParams::digest`], which feeds the cache key — is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecoderParams {
    entries: BTreeMap<String, String>,
}

impl DecoderParams {
    /// Empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(key, value)` pairs.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Set or replace one parameter.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Raw string lookup.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Integer lookup with a default for absent or malformed values.
    #[must_use]
    pub fn get_usize_or(&self, key: &str, default: usize) -> usize {
        self.get(key).and_then(|v| v.parse().ok()).unwrap_or(default)
    }

    /// Whether any parameters are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Canonical `k=v;k=v` rendering, used as the parameter component of
    /// cache keys. Identical parameter sets always digest identically.
    #[must_use]
    pub fn digest(&self) -> String {
        let mut out = String::new();
        for (i, (k, v)) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push(';');
            }
            let _ = write!(out, "{k}={v}");
        }
        out
    }
}
