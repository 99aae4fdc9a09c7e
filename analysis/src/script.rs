//! Unicode script-ratio analysis for non-Latin plaintext.
//!
//! Quadgram analysis is blind outside Latin script, so CJK candidates are
//! judged by how much of the text falls inside the expected Unicode blocks.
//! A decode that "succeeds" into mostly control characters or scattered
//! symbols is rejected here even though it was valid UTF-8.

use crate::checker::Checker;
use crate::verdict::Verdict;

/// Hanzi used as digit stand-ins by the pawnshop cipher. Text composed
/// exclusively of these is more likely ciphertext than prose, so it is
/// held at ambiguous confidence instead of being accepted outright.
const PAWNSHOP_HANZI: [char; 11] = [
    '口', '田', '由', '中', '人', '工', '大', '王', '夫', '井', '羊',
];

fn is_cjk(c: char) -> bool {
    matches!(c as u32,
        0x4E00..=0x9FFF      // CJK Unified Ideographs
        | 0x3400..=0x4DBF    // Extension A
        | 0x3040..=0x30FF    // Hiragana + Katakana
        | 0xAC00..=0xD7AF    // Hangul syllables
        | 0xFF01..=0xFF5E    // Fullwidth forms
        | 0x3001..=0x303F    // CJK punctuation
    )
}

/// Thresholds for the script-ratio checker.
#[derive(Debug, Clone)]
pub struct ScriptConfig {
    /// Minimum fraction of non-whitespace characters inside the expected
    /// blocks.
    pub accept_ratio: f64,
    /// Minimum number of in-block characters.
    pub min_chars: usize,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            accept_ratio: 0.8,
            min_chars: 2,
        }
    }
}

/// CJK block-ratio checker.
pub struct ScriptChecker {
    config: ScriptConfig,
}

impl ScriptChecker {
    #[must_use]
    pub fn new(config: ScriptConfig) -> Self {
        Self { config }
    }
}

impl Default for ScriptChecker {
    fn default() -> Self {
        Self::new(ScriptConfig::default())
    }
}

impl Checker for ScriptChecker {
    fn name(&self) -> &'static str {
        "script"
    }

    fn evaluate(&self, text: &str) -> Verdict {
        let mut in_block = 0usize;
        let mut total = 0usize;
        let mut control = 0usize;
        let mut non_mapping_cjk = 0usize;
        for c in text.chars() {
            if c.is_whitespace() {
                continue;
            }
            total += 1;
            if c.is_control() {
                control += 1;
            }
            if is_cjk(c) {
                in_block += 1;
                if !PAWNSHOP_HANZI.contains(&c) {
                    non_mapping_cjk += 1;
                }
            }
        }
        if total == 0 || in_block < self.config.min_chars {
            return Verdict::reject(0.0, "no CJK content");
        }
        if control > 0 {
            return Verdict::reject(0.1, "control characters present");
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = in_block as f64 / total as f64;
        let reason = format!("CJK ratio {ratio:.2}");
        if ratio >= self.config.accept_ratio {
            if non_mapping_cjk == 0 {
                // Plausibly pawnshop ciphertext rather than prose; leave
                // the call to the human port.
                return Verdict::reject(0.5, "CJK text uses only digit-cipher hanzi");
            }
            Verdict::accept(0.5 + ratio / 2.0, reason)
        } else {
            Verdict::reject(ratio / 2.0, reason)
        }
    }
}
