//! Cheap English letter-frequency fitness for ranking keyspace candidates.
//!
//! Keyspace-searching codecs (Affine, Vigenère) generate hundreds of
//! candidate decodings; emitting them all would flood the search frontier.
//! This chi-squared statistic against English letter frequencies is the
//! pre-ranking that keeps only the plausible few. It is intentionally much
//! weaker than the real plaintext checkers — it only has to order
//! candidates, not judge them.

/// Relative English letter frequencies for `a`..`z`, in percent.
const ENGLISH_FREQ: [f64; 26] = [
    8.17, 1.29, 2.78, 4.25, 12.70, 2.23, 2.02, 6.09, 6.97, 0.15, 0.77, 4.03, 2.41, 6.75, 7.51,
    1.93, 0.10, 5.99, 6.33, 9.06, 2.76, 0.98, 2.36, 0.15, 1.97, 0.07,
];

/// Chi-squared distance between the candidate's letter distribution and
/// English. Lower is a better fit. Texts with no ASCII letters score
/// `f64::INFINITY` so they always rank last.
#[must_use]
pub fn english_fitness(text: &str) -> f64 {
    let mut counts = [0u32; 26];
    let mut total = 0u32;
    for c in text.chars() {
        if c.is_ascii_alphabetic() {
            counts[(c.to_ascii_lowercase() as u8 - b'a') as usize] += 1;
            total += 1;
        }
    }
    if total == 0 {
        return f64::INFINITY;
    }
    let total = f64::from(total);
    let mut chi2 = 0.0;
    for (i, &count) in counts.iter().enumerate() {
        let expected = ENGLISH_FREQ[i] / 100.0 * total;
        let diff = f64::from(count) - expected;
        chi2 += diff * diff / expected;
    }
    chi2
}
