//! Checker verdicts.

/// A checker's judgment of one candidate string.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    /// Whether the checker is confident this is plaintext.
    pub is_valid: bool,
    /// Confidence in `[0, 1]`. Meaningful even when `is_valid` is false:
    /// near-threshold confidence is what triggers human escalation.
    pub confidence: f64,
    /// Human-readable basis for the judgment.
    pub reason: String,
}

impl Verdict {
    /// A confident acceptance.
    #[must_use]
    pub fn accept(confidence: f64, reason: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            confidence: confidence.clamp(0.0, 1.0),
            reason: reason.into(),
        }
    }

    /// A rejection carrying whatever residual confidence the checker has.
    #[must_use]
    pub fn reject(confidence: f64, reason: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            confidence: confidence.clamp(0.0, 1.0),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_is_clamped() {
        assert!((Verdict::accept(1.7, "x").confidence - 1.0).abs() < f64::EPSILON);
        assert!(Verdict::reject(-0.3, "x").confidence.abs() < f64::EPSILON);
    }
}
