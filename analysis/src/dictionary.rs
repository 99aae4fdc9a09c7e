//! Dictionary / pattern validation.
//!
//! Tokenizes the candidate and measures what fraction of tokens are known
//! words. This is a secondary signal with a deliberately strict threshold —
//! it exists to catch short plaintexts ("test", "attack at dawn") that are
//! below the quadgram statistic's resolution, not to overrule it. An
//! optional regex gives the caller a crib: a candidate matching the
//! expected answer format is accepted outright.

use std::collections::HashSet;
use std::sync::OnceLock;

use crate::checker::Checker;
use crate::verdict::Verdict;

/// Embedded word list: frequent corpus words plus everyday vocabulary.
const WORDS_DATA: &str = include_str!("data/common_words.txt");

fn words() -> &'static HashSet<&'static str> {
    static WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();
    WORDS.get_or_init(|| WORDS_DATA.lines().filter(|w| !w.is_empty()).collect())
}

/// Thresholds and optional crib pattern for the dictionary checker.
#[derive(Debug, Clone)]
pub struct DictionaryConfig {
    /// Minimum fraction of tokens that must be dictionary words.
    pub min_hit_ratio: f64,
    /// Minimum token count.
    pub min_tokens: usize,
    /// Optional regex the expected plaintext should match (e.g. a flag
    /// format). A match accepts regardless of the hit ratio.
    pub pattern: Option<String>,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            min_hit_ratio: 0.65,
            min_tokens: 1,
            pattern: None,
        }
    }
}

/// Word-list / crib-pattern checker.
pub struct DictionaryChecker {
    config: DictionaryConfig,
    pattern: Option<regex::Regex>,
}

impl DictionaryChecker {
    /// Build the checker, compiling the crib pattern if one is configured.
    ///
    /// # Errors
    ///
    /// Returns the regex compile error for a malformed pattern; a broken
    /// crib must fail loudly before the search starts, not silently match
    /// nothing.
    pub fn new(config: DictionaryConfig) -> Result<Self, regex::Error> {
        let pattern = config
            .pattern
            .as_deref()
            .map(regex::Regex::new)
            .transpose()?;
        Ok(Self { config, pattern })
    }

    fn hit_ratio(text: &str) -> (f64, usize) {
        let dict = words();
        let mut tokens = 0usize;
        let mut hits = 0usize;
        for raw in text.split_whitespace() {
            let token = raw
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_ascii_lowercase();
            tokens += 1;
            if !token.is_empty()
                && token.chars().all(|c| c.is_ascii_lowercase())
                && dict.contains(token.as_str())
            {
                hits += 1;
            }
        }
        if tokens == 0 {
            return (0.0, 0);
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = (hits as f64) / (tokens as f64);
        (ratio, tokens)
    }
}

impl Default for DictionaryChecker {
    fn default() -> Self {
        Self::new(DictionaryConfig::default()).expect("default config has no pattern")
    }
}

impl Checker for DictionaryChecker {
    fn name(&self) -> &'static str {
        "dictionary"
    }

    fn evaluate(&self, text: &str) -> Verdict {
        if let Some(pattern) = &self.pattern {
            if pattern.is_match(text) {
                return Verdict::accept(0.95, "matches expected pattern");
            }
        }
        let (ratio, tokens) = Self::hit_ratio(text);
        if tokens < self.config.min_tokens {
            return Verdict::reject(0.0, "no tokens");
        }
        let reason = format!("dictionary hit ratio {ratio:.2}");
        if ratio >= self.config.min_hit_ratio {
            Verdict::accept(0.6 + ratio * 0.35, reason)
        } else {
            Verdict::reject(ratio * 0.5, reason)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_words() {
        let checker = DictionaryChecker::default();
        assert!(checker.evaluate("hello world").is_valid);
        assert!(checker.evaluate("test").is_valid);
        assert!(checker.evaluate("attack at dawn").is_valid);
    }

    #[test]
    fn rejects_ciphertext_and_digits() {
        let checker = DictionaryChecker::default();
        assert!(!checker.evaluate("khoor zruog").is_valid);
        assert!(!checker.evaluate("74657374").is_valid);
        assert!(!checker.evaluate("qwxzjkvbpqm dklfjwe").is_valid);
    }

    #[test]
    fn punctuation_does_not_break_tokens() {
        let checker = DictionaryChecker::default();
        assert!(checker.evaluate("hello, world!").is_valid);
    }

    #[test]
    fn crib_pattern_wins() {
        let checker = DictionaryChecker::new(DictionaryConfig {
            pattern: Some(r"^flag\{[^}]+\}$".into()),
            ..DictionaryConfig::default()
        })
        .unwrap();
        let verdict = checker.evaluate("flag{xyzzy}");
        assert!(verdict.is_valid);
        assert!(verdict.confidence > 0.9);
    }

    #[test]
    fn malformed_crib_pattern_is_a_loud_error() {
        let result = DictionaryChecker::new(DictionaryConfig {
            pattern: Some("(unclosed".into()),
            ..DictionaryConfig::default()
        });
        assert!(result.is_err());
    }
}
