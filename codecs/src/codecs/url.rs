//! URL percent-decoding.
//!
//! Percent sequences are reassembled into a full byte run **before** UTF-8
//! validation, so multi-byte sequences (`%E4%BD%A0` → 你) come back as the
//! character they encode instead of being mangled byte-by-byte. The
//! alternative `=XX` form sometimes seen in the wild is tried as a fallback
//! when the standard form leaves the text unchanged.

use super::utf8_outcome;
use crate::decoder::{DecodeOutcome, Decoder};
use crate::params::DecoderParams;

/// URL percent-decoding (`%XX`, `+` as space, `=XX` fallback).
pub struct Url;

impl Url {
    /// Forward encoder: percent-encode everything outside the unreserved set.
    #[must_use]
    pub fn encode(text: &str) -> String {
        let mut out = String::new();
        for byte in text.bytes() {
            match byte {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                    out.push(byte as char);
                }
                _ => out.push_str(&format!("%{byte:02X}")),
            }
        }
        out
    }

    /// Decode with `marker` as the escape character (`%` or `=`).
    ///
    /// Returns `None` on a malformed escape; a lone marker is malformed
    /// rather than literal, matching strict decoding.
    fn unquote(text: &str, marker: u8) -> Option<Vec<u8>> {
        let bytes = text.as_bytes();
        let mut out = Vec::with_capacity(bytes.len());
        let mut i = 0;
        while i < bytes.len() {
            let c = bytes[i];
            if c == marker {
                let hi = (*bytes.get(i + 1)? as char).to_digit(16)?;
                let lo = (*bytes.get(i + 2)? as char).to_digit(16)?;
                out.push(((hi << 4) | lo) as u8);
                i += 3;
            } else if c == b'+' && marker == b'%' {
                out.push(b' ');
                i += 1;
            } else {
                out.push(c);
                i += 1;
            }
        }
        Some(out)
    }
}

impl Decoder for Url {
    fn identifier(&self) -> &'static str {
        "url"
    }

    fn can_apply(&self, text: &str) -> bool {
        let bytes = text.as_bytes();
        let escape_at = |marker: u8| {
            bytes.windows(3).any(|w| {
                w[0] == marker && w[1].is_ascii_hexdigit() && w[2].is_ascii_hexdigit()
            })
        };
        escape_at(b'%') || escape_at(b'=') || text.contains('+')
    }

    fn decode(&self, text: &str, _params: &DecoderParams) -> DecodeOutcome {
        if let Some(bytes) = Self::unquote(text, b'%') {
            if bytes != text.as_bytes() {
                let outcome = utf8_outcome(bytes);
                if outcome.succeeded {
                    log::debug!("url: %XX form decoded");
                    return outcome;
                }
            }
        }
        // Fallback: the =XX variant, only when the standard form changed
        // nothing.
        if text.contains('=') {
            if let Some(bytes) = Self::unquote(text, b'=') {
                if bytes != text.as_bytes() {
                    let outcome = utf8_outcome(bytes);
                    if outcome.succeeded {
                        log::debug!("url: =XX fallback form decoded");
                        return outcome;
                    }
                }
            }
        }
        DecodeOutcome::failure()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> DecoderParams {
        DecoderParams::new()
    }

    #[test]
    fn multibyte_percent_sequences_reassemble() {
        let out = Url.decode("%E4%BD%A0%E5%A5%BD", &params());
        assert!(out.succeeded);
        assert_eq!(out.variants[0].text, "你好");
    }

    #[test]
    fn plus_becomes_space() {
        let out = Url.decode("hello+world", &params());
        assert_eq!(out.variants[0].text, "hello world");
    }

    #[test]
    fn equals_fallback_form() {
        let out = Url.decode("hello=20world", &params());
        assert_eq!(out.variants[0].text, "hello world");
    }

    #[test]
    fn round_trip() {
        for s in ["hello world", "你好", "a&b=c?d"] {
            let enc = Url::encode(s);
            assert!(Url.can_apply(&enc), "can_apply failed for {enc:?}");
            let out = Url.decode(&enc, &params());
            assert_eq!(out.variants[0].text, s);
        }
    }

    #[test]
    fn truncated_escape_is_failure() {
        assert!(!Url.decode("abc%e", &params()).succeeded);
        assert!(!Url.decode("abc%", &params()).succeeded);
    }

    #[test]
    fn unchanged_text_is_failure() {
        // No escapes, no pluses: decoding must not claim success.
        assert!(!Url.decode("plaintext", &params()).succeeded);
    }
}
