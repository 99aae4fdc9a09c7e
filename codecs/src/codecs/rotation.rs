//! Alphabet rotation and substitution ciphers: Caesar, ROT47, Atbash,
//! Affine.

use super::fitness::english_fitness;
use crate::decoder::{DecodeOutcome, DecodedVariant, Decoder};
use crate::params::DecoderParams;

fn shift_back(text: &str, shift: u8) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii_lowercase() {
                char::from((c as u8 - b'a' + 26 - shift) % 26 + b'a')
            } else if c.is_ascii_uppercase() {
                char::from((c as u8 - b'A' + 26 - shift) % 26 + b'A')
            } else {
                c
            }
        })
        .collect()
}

fn ascii_alpha_count(text: &str) -> usize {
    text.chars().filter(char::is_ascii_alphabetic).count()
}

/// Caesar cipher: every shift in the keyspace is its own candidate.
///
/// The shift that produced the ciphertext is unknown, and a wrong shift is
/// indistinguishable from a right one without the plaintext checkers — so
/// all 25 are emitted and the search decides.
pub struct Caesar;

impl Caesar {
    /// Forward encoder (shift forward by `shift`).
    #[must_use]
    pub fn encode(text: &str, shift: u8) -> String {
        shift_back(text, (26 - shift % 26) % 26)
    }
}

impl Decoder for Caesar {
    fn identifier(&self) -> &'static str {
        "caesar"
    }

    fn can_apply(&self, text: &str) -> bool {
        ascii_alpha_count(text) >= 2
    }

    fn decode(&self, text: &str, _params: &DecoderParams) -> DecodeOutcome {
        let variants: Vec<DecodedVariant> = (1u8..=25)
            .map(|shift| DecodedVariant::tagged(format!("shift={shift}"), shift_back(text, shift)))
            .collect();
        DecodeOutcome::multi(variants, 25)
    }
}

/// ROT47 over the printable ASCII range `!`..`~`. Self-inverse.
pub struct Rot47;

impl Rot47 {
    #[must_use]
    pub fn encode(text: &str) -> String {
        Self::rotate(text)
    }

    fn rotate(text: &str) -> String {
        text.chars()
            .map(|c| {
                let v = c as u32;
                if (33..=126).contains(&v) {
                    char::from_u32((v - 33 + 47) % 94 + 33).unwrap_or(c)
                } else {
                    c
                }
            })
            .collect()
    }
}

impl Decoder for Rot47 {
    fn identifier(&self) -> &'static str {
        "rot47"
    }

    fn can_apply(&self, text: &str) -> bool {
        !text.is_empty()
            && text
                .chars()
                .all(|c| c == ' ' || (33..=126).contains(&(c as u32)))
    }

    fn decode(&self, text: &str, _params: &DecoderParams) -> DecodeOutcome {
        let rotated = Self::rotate(text);
        if rotated == text {
            DecodeOutcome::failure()
        } else {
            DecodeOutcome::single(rotated)
        }
    }
}

/// Atbash: mirror the alphabet (`a`↔`z`). Self-inverse.
pub struct Atbash;

impl Atbash {
    #[must_use]
    pub fn encode(text: &str) -> String {
        Self::mirror(text)
    }

    fn mirror(text: &str) -> String {
        text.chars()
            .map(|c| {
                if c.is_ascii_lowercase() {
                    char::from(b'z' - (c as u8 - b'a'))
                } else if c.is_ascii_uppercase() {
                    char::from(b'Z' - (c as u8 - b'A'))
                } else {
                    c
                }
            })
            .collect()
    }
}

impl Decoder for Atbash {
    fn identifier(&self) -> &'static str {
        "atbash"
    }

    fn can_apply(&self, text: &str) -> bool {
        ascii_alpha_count(text) >= 2
    }

    fn decode(&self, text: &str, _params: &DecoderParams) -> DecodeOutcome {
        let mirrored = Self::mirror(text);
        if mirrored == text {
            DecodeOutcome::failure()
        } else {
            DecodeOutcome::single(mirrored)
        }
    }
}

/// Affine cipher `y = a·x + b (mod 26)`.
///
/// The keyspace is small (12 valid `a` values × 26 `b` values) but still
/// too wide to emit wholesale; candidates are ranked by letter-frequency
/// fitness and only the best `max_variants` survive.
pub struct Affine;

/// `a` values coprime with 26, paired with their modular inverses.
const AFFINE_KEYS: [(u8, u8); 12] = [
    (1, 1),
    (3, 9),
    (5, 21),
    (7, 15),
    (9, 3),
    (11, 19),
    (15, 7),
    (17, 23),
    (19, 11),
    (21, 5),
    (23, 17),
    (25, 25),
];

impl Affine {
    /// Forward encoder for tests. `a` must be coprime with 26.
    ///
    /// All key arithmetic is widened to `u16` — `25 * 25` does not fit a
    /// byte and a silent wrap would corrupt the keyspace.
    #[must_use]
    pub fn encode(text: &str, a: u8, b: u8) -> String {
        let apply = |x: u8| -> u8 {
            ((u16::from(x) * u16::from(a) + u16::from(b)) % 26) as u8
        };
        text.chars()
            .map(|c| {
                if c.is_ascii_lowercase() {
                    char::from(apply(c as u8 - b'a') + b'a')
                } else if c.is_ascii_uppercase() {
                    char::from(apply(c as u8 - b'A') + b'A')
                } else {
                    c
                }
            })
            .collect()
    }

    fn decrypt(text: &str, a_inv: u8, b: u8) -> String {
        let unapply = |y: u8| -> u8 {
            ((u16::from(a_inv) * u16::from((y + 26 - b) % 26)) % 26) as u8
        };
        text.chars()
            .map(|c| {
                if c.is_ascii_lowercase() {
                    char::from(unapply(c as u8 - b'a') + b'a')
                } else if c.is_ascii_uppercase() {
                    char::from(unapply(c as u8 - b'A') + b'A')
                } else {
                    c
                }
            })
            .collect()
    }
}

impl Decoder for Affine {
    fn identifier(&self) -> &'static str {
        "affine"
    }

    fn can_apply(&self, text: &str) -> bool {
        ascii_alpha_count(text) >= 4
    }

    fn decode(&self, text: &str, params: &DecoderParams) -> DecodeOutcome {
        let max_variants = params.get_usize_or("max_variants", 3);
        let mut ranked: Vec<(f64, u8, u8, String)> = Vec::with_capacity(12 * 26);
        for &(a, a_inv) in &AFFINE_KEYS {
            for b in 0..26u8 {
                if a == 1 && b == 0 {
                    continue; // identity
                }
                let candidate = Self::decrypt(text, a_inv, b);
                ranked.push((english_fitness(&candidate), a, b, candidate));
            }
        }
        // Ties broken by (a, b) so ranking is a total order.
        ranked.sort_by(|x, y| {
            x.0.partial_cmp(&y.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(x.1.cmp(&y.1))
                .then(x.2.cmp(&y.2))
        });
        let variants: Vec<DecodedVariant> = ranked
            .into_iter()
            .take(max_variants)
            .map(|(_, a, b, candidate)| {
                DecodedVariant::tagged(format!("a={a},b={b}"), candidate)
            })
            .collect();
        DecodeOutcome::multi(variants, 12 * 26 - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> DecoderParams {
        DecoderParams::new()
    }

    #[test]
    fn caesar_emits_all_25_shifts() {
        let out = Caesar.decode("khoor zruog", &params());
        assert!(out.succeeded);
        assert_eq!(out.variants.len(), 25);
        let shift3 = out
            .variants
            .iter()
            .find(|v| v.tag.as_deref() == Some("shift=3"))
            .unwrap();
        assert_eq!(shift3.text, "hello world");
    }

    #[test]
    fn caesar_encode_decode_round_trip() {
        let enc = Caesar::encode("hello world", 3);
        assert_eq!(enc, "khoor zruog");
        let out = Caesar.decode(&enc, &params());
        assert!(out.variants.iter().any(|v| v.text == "hello world"));
    }

    #[test]
    fn caesar_skips_non_alpha_text() {
        assert!(!Caesar.can_apply("12345 678"));
    }

    #[test]
    fn rot47_round_trip_and_known_vector() {
        assert_eq!(Rot47::encode("hello world"), "96==@ H@C=5");
        let out = Rot47.decode("96==@ H@C=5", &params());
        assert_eq!(out.variants[0].text, "hello world");
    }

    #[test]
    fn atbash_round_trip() {
        assert_eq!(Atbash::encode("hello world"), "svool dliow");
        let out = Atbash.decode("svool dliow", &params());
        assert_eq!(out.variants[0].text, "hello world");
    }

    #[test]
    fn affine_recovers_known_key() {
        // The frequency pre-ranking needs a few dozen letters to be
        // reliable; ten-letter strings are genuinely ambiguous.
        let plain = "meet me at the usual place at dawn";
        let enc = Affine::encode(plain, 5, 8);
        let out = Affine.decode(&enc, &params());
        assert!(out.succeeded);
        assert!(out.variants.len() <= 3);
        let hit = out
            .variants
            .iter()
            .find(|v| v.text == plain)
            .expect("correct key should rank in the top variants");
        assert_eq!(hit.tag.as_deref(), Some("a=5,b=8"));
    }

    #[test]
    fn affine_variant_cap_respected() {
        let p = DecoderParams::from_pairs([("max_variants", "1")]);
        let out = Affine.decode("rclla oaplx", &p);
        assert_eq!(out.variants.len(), 1);
    }

    #[test]
    fn affine_inverses_are_consistent() {
        for &(a, a_inv) in &AFFINE_KEYS {
            assert_eq!(u16::from(a) * u16::from(a_inv) % 26, 1, "a={a}");
        }
    }
}
