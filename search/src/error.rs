//! Typed search errors.
//!
//! `SearchError` covers pre-flight failures only: a search that actually
//! runs always terminates in a [`crate::engine::SearchOutcome`], including
//! budget exhaustion — "no result" is an outcome, not an error.

/// Pre-flight failure raised before any search step executes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The policy carries an unusable budget or worker count.
    InvalidPolicy { detail: String },
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPolicy { detail } => {
                write!(f, "invalid search policy: {detail}")
            }
        }
    }
}

impl std::error::Error for SearchError {}
