//! Quadgram frequency analysis for Latin-script plaintext.
//!
//! Scores a candidate by the mean log10 probability of its letter
//! quadgrams under a corpus-derived frequency table. English lands around
//! −4.5 to −6; classical ciphertext and base-N residue sit at the floor
//! near −8.8; random letter noise tops out just above −6.1. The accept
//! threshold and the ambiguity band live in [`QuadgramConfig`] — they are
//! calibration data, not structural constants.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::checker::Checker;
use crate::verdict::Verdict;

/// Table generated offline from an English prose corpus (~6.5M letters);
/// quadgrams seen fewer than 3 times were dropped. Format: `abcd <count>`.
const QUADGRAM_DATA: &str = include_str!("data/english_quadgrams.txt");

/// Score at which confidence maps to 1.0.
const FULL_CONFIDENCE_SCORE: f64 = -4.0;

struct QuadgramTable {
    log_probs: HashMap<[u8; 4], f64>,
    /// Log probability assigned to unseen quadgrams.
    floor: f64,
}

fn table() -> &'static QuadgramTable {
    static TABLE: OnceLock<QuadgramTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut counts: Vec<([u8; 4], u64)> = Vec::new();
        let mut total: u64 = 0;
        for line in QUADGRAM_DATA.lines() {
            let mut parts = line.split_ascii_whitespace();
            let (Some(gram), Some(count)) = (parts.next(), parts.next()) else {
                continue;
            };
            let bytes = gram.as_bytes();
            if bytes.len() != 4 {
                continue;
            }
            let Ok(count) = count.parse::<u64>() else {
                continue;
            };
            counts.push(([bytes[0], bytes[1], bytes[2], bytes[3]], count));
            total += count;
        }
        #[allow(clippy::cast_precision_loss)]
        let total_f = total as f64;
        let log_probs = counts
            .into_iter()
            .map(|(gram, count)| {
                #[allow(clippy::cast_precision_loss)]
                let p = count as f64 / total_f;
                (gram, p.log10())
            })
            .collect();
        QuadgramTable {
            log_probs,
            floor: (0.01 / total_f).log10(),
        }
    })
}

/// Calibrated thresholds for the quadgram checker.
#[derive(Debug, Clone)]
pub struct QuadgramConfig {
    /// Mean log10 score at or above which the candidate is accepted.
    pub accept_score: f64,
    /// Minimum number of letters needed for the statistic to mean anything.
    pub min_letters: usize,
}

impl Default for QuadgramConfig {
    fn default() -> Self {
        Self {
            accept_score: -6.0,
            min_letters: 6,
        }
    }
}

/// Quadgram frequency checker.
pub struct QuadgramChecker {
    config: QuadgramConfig,
}

impl QuadgramChecker {
    #[must_use]
    pub fn new(config: QuadgramConfig) -> Self {
        Self { config }
    }

    /// Mean log10 quadgram probability, or `None` when the text has too few
    /// letters to score. Case-folded; non-alphabetic characters stripped.
    #[must_use]
    pub fn score(text: &str) -> Option<f64> {
        let letters: Vec<u8> = text
            .chars()
            .filter(char::is_ascii_alphabetic)
            .map(|c| c.to_ascii_lowercase() as u8)
            .collect();
        if letters.len() < 4 {
            return None;
        }
        let t = table();
        let mut sum = 0.0;
        let windows = letters.len() - 3;
        for w in letters.windows(4) {
            let gram = [w[0], w[1], w[2], w[3]];
            sum += t.log_probs.get(&gram).copied().unwrap_or(t.floor);
        }
        #[allow(clippy::cast_precision_loss)]
        let mean = sum / windows as f64;
        Some(mean)
    }

    fn confidence(&self, score: f64) -> f64 {
        let floor = table().floor;
        ((score - floor) / (FULL_CONFIDENCE_SCORE - floor)).clamp(0.0, 1.0)
    }
}

impl Default for QuadgramChecker {
    fn default() -> Self {
        Self::new(QuadgramConfig::default())
    }
}

impl Checker for QuadgramChecker {
    fn name(&self) -> &'static str {
        "quadgram"
    }

    fn evaluate(&self, text: &str) -> Verdict {
        let letter_count = text.chars().filter(char::is_ascii_alphabetic).count();
        if letter_count < self.config.min_letters {
            return Verdict::reject(0.0, "too few letters for quadgram analysis");
        }
        match Self::score(text) {
            None => Verdict::reject(0.0, "too few letters for quadgram analysis"),
            Some(score) => {
                let confidence = self.confidence(score);
                let reason = format!("quadgram score {score:.2}");
                if score >= self.config.accept_score {
                    Verdict::accept(confidence, reason)
                } else {
                    Verdict::reject(confidence, reason)
                }
            }
        }
    }
}
