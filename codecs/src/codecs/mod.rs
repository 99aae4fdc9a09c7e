//! Codec implementations, grouped by family.

pub mod cjk;
pub mod fitness;
pub mod radix;
pub mod rotation;
pub mod symbols;
pub mod url;
pub mod vigenere;

/// Gate a decoded byte buffer through UTF-8 validation.
///
/// Every byte-producing codec funnels through here: a decode that yields
/// invalid UTF-8 or an empty string is a failed decode, not a panic and not
/// a lossy replacement.
pub(crate) fn utf8_outcome(bytes: Vec<u8>) -> crate::decoder::DecodeOutcome {
    match String::from_utf8(bytes) {
        Ok(text) if !text.is_empty() => crate::decoder::DecodeOutcome::single(text),
        _ => crate::decoder::DecodeOutcome::failure(),
    }
}
