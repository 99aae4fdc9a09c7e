//! Vigenère cipher, keyed from a user-supplied wordlist.
//!
//! There is no blind key recovery here: the decoder tries every candidate
//! key from the wordlist, ranks the resulting plaintexts by letter-frequency
//! fitness, and emits the best few. Without a wordlist the decoder reports
//! itself inapplicable and the search skips it entirely.

use super::fitness::english_fitness;
use crate::decoder::{DecodeOutcome, DecodedVariant, Decoder};
use crate::params::DecoderParams;

/// Wordlist-keyed Vigenère decoder.
pub struct Vigenere {
    keys: Vec<String>,
}

impl Vigenere {
    /// Build from candidate keys. Keys are lowercased; non-alphabetic and
    /// duplicate entries are dropped, first occurrence wins (wordlist order
    /// is the deterministic tie-break for equally-fit decodings).
    #[must_use]
    pub fn new(keys: Vec<String>) -> Self {
        let mut seen = std::collections::BTreeSet::new();
        let keys = keys
            .into_iter()
            .map(|k| k.trim().to_ascii_lowercase())
            .filter(|k| !k.is_empty() && k.chars().all(|c| c.is_ascii_lowercase()))
            .filter(|k| seen.insert(k.clone()))
            .collect();
        Self { keys }
    }

    /// Forward encoder for tests.
    #[must_use]
    pub fn encode(text: &str, key: &str) -> String {
        Self::shift(text, key, true)
    }

    fn decrypt(text: &str, key: &str) -> String {
        Self::shift(text, key, false)
    }

    /// The key advances only on alphabetic characters, in both directions.
    fn shift(text: &str, key: &str, forward: bool) -> String {
        let key_shifts: Vec<u8> = key.bytes().map(|b| b - b'a').collect();
        if key_shifts.is_empty() {
            return text.to_string();
        }
        let mut j = 0usize;
        text.chars()
            .map(|c| {
                if c.is_ascii_alphabetic() {
                    let base = if c.is_ascii_lowercase() { b'a' } else { b'A' };
                    let k = key_shifts[j % key_shifts.len()];
                    let k = if forward { k } else { 26 - k };
                    j += 1;
                    char::from((c as u8 - base + k) % 26 + base)
                } else {
                    c
                }
            })
            .collect()
    }
}

impl Decoder for Vigenere {
    fn identifier(&self) -> &'static str {
        "vigenere"
    }

    fn can_apply(&self, text: &str) -> bool {
        !self.keys.is_empty()
            && text.chars().filter(char::is_ascii_alphabetic).count() >= 4
    }

    fn decode(&self, text: &str, params: &DecoderParams) -> DecodeOutcome {
        let max_variants = params.get_usize_or("max_variants", 3);
        let mut ranked: Vec<(f64, usize, String)> = self
            .keys
            .iter()
            .enumerate()
            .map(|(i, key)| {
                let candidate = Self::decrypt(text, key);
                (english_fitness(&candidate), i, candidate)
            })
            .collect();
        ranked.sort_by(|x, y| {
            x.0.partial_cmp(&y.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(x.1.cmp(&y.1))
        });
        let cost = u32::try_from(self.keys.len()).unwrap_or(u32::MAX);
        let variants: Vec<DecodedVariant> = ranked
            .into_iter()
            .take(max_variants)
            .filter(|(_, _, candidate)| candidate != text)
            .map(|(_, i, candidate)| {
                DecodedVariant::tagged(format!("key={}", self.keys[i]), candidate)
            })
            .collect();
        DecodeOutcome::multi(variants, cost)
    }
}
