//! The decoder capability trait and its outcome types.

use crate::params::DecoderParams;

/// One decoded output produced by a decoder invocation.
///
/// Most codecs produce exactly one variant with no tag. Keyspace-searching
/// codecs (Caesar, Affine, Vigenère) produce one variant per candidate key,
/// tagged so the applied chain can name the winning key (`caesar:shift=3`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedVariant {
    /// Parameter tag for this variant (e.g. `"shift=3"`), `None` for
    /// single-output codecs.
    pub tag: Option<String>,
    /// The decoded text.
    pub text: String,
}

impl DecodedVariant {
    /// An untagged variant.
    #[must_use]
    pub fn plain(text: String) -> Self {
        Self { tag: None, text }
    }

    /// A tagged variant.
    #[must_use]
    pub fn tagged(tag: impl Into<String>, text: String) -> Self {
        Self {
            tag: Some(tag.into()),
            text,
        }
    }
}

/// Result of one decoder invocation.
///
/// A failed decode is a value, not an error: malformed input is an expected
/// outcome and must never panic or propagate (`DecodeFailure` recovery is
/// local to the branch). `cost` counts the candidate transformations the
/// decoder evaluated internally, so cached outcomes carry the work they
/// saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOutcome {
    /// Whether the decode produced at least one variant.
    pub succeeded: bool,
    /// Decoded variants, in the decoder's own deterministic order.
    pub variants: Vec<DecodedVariant>,
    /// Candidate transformations evaluated to produce this outcome.
    pub cost: u32,
}

impl DecodeOutcome {
    /// The failure outcome (preconditions not met, malformed input).
    #[must_use]
    pub fn failure() -> Self {
        Self {
            succeeded: false,
            variants: Vec::new(),
            cost: 1,
        }
    }

    /// A single-variant success.
    #[must_use]
    pub fn single(text: String) -> Self {
        Self {
            succeeded: true,
            variants: vec![DecodedVariant::plain(text)],
            cost: 1,
        }
    }

    /// A multi-variant success; failure if `variants` is empty.
    #[must_use]
    pub fn multi(variants: Vec<DecodedVariant>, cost: u32) -> Self {
        Self {
            succeeded: !variants.is_empty(),
            variants,
            cost,
        }
    }
}

/// A single reversible-or-guessable text transformation.
///
/// # Contract
///
/// - `can_apply` is a cheap pre-check (character set, length shape). It may
///   return `true` for text that later fails to decode; it must never do
///   the full decode work.
/// - `decode` is a total, deterministic function of `(text, params)`. It
///   must not panic on malformed input — malformed input yields
///   [`DecodeOutcome::failure`]. This purity is what makes outcomes safe to
///   memoize and share across search branches.
pub trait Decoder: Send + Sync {
    /// Stable identifier, unique within a catalog (e.g. `"base64"`).
    fn identifier(&self) -> &'static str;

    /// Cheap, side-effect-free applicability heuristic.
    fn can_apply(&self, text: &str) -> bool;

    /// Decode `text` under `params`.
    fn decode(&self, text: &str, params: &DecoderParams) -> DecodeOutcome;
}
