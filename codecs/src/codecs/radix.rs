//! Base-N and positional codecs: base64/32/58/85, hex, binary, octal, and
//! the 2-bit DNA packing.
//!
//! All alphabets are implemented directly rather than through an encoding
//! crate: the dictionaries are tiny, the decode paths need precise control
//! over what counts as malformed, and each decoder must stay a total
//! function.

use super::utf8_outcome;
use crate::decoder::{DecodeOutcome, Decoder};
use crate::params::DecoderParams;

const BASE64_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";
const BASE58_ALPHABET: &[u8; 58] =
    b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

fn base64_value(c: u8) -> Option<u32> {
    BASE64_ALPHABET.iter().position(|&a| a == c).map(|i| i as u32)
}

fn base32_value(c: u8) -> Option<u32> {
    let c = c.to_ascii_uppercase();
    BASE32_ALPHABET.iter().position(|&a| a == c).map(|i| i as u32)
}

fn base58_value(c: u8) -> Option<u32> {
    BASE58_ALPHABET.iter().position(|&a| a == c).map(|i| i as u32)
}

/// RFC 4648 Base64 (standard alphabet, strict padding).
pub struct Base64;

impl Base64 {
    /// Forward encoder, used by round-trip tests and the batch tooling.
    #[must_use]
    pub fn encode(data: &[u8]) -> String {
        let mut out = String::new();
        for chunk in data.chunks(3) {
            let b = [chunk[0], *chunk.get(1).unwrap_or(&0), *chunk.get(2).unwrap_or(&0)];
            let n = (u32::from(b[0]) << 16) | (u32::from(b[1]) << 8) | u32::from(b[2]);
            let idx = [
                (n >> 18) & 63,
                (n >> 12) & 63,
                (n >> 6) & 63,
                n & 63,
            ];
            out.push(BASE64_ALPHABET[idx[0] as usize] as char);
            out.push(BASE64_ALPHABET[idx[1] as usize] as char);
            out.push(if chunk.len() > 1 {
                BASE64_ALPHABET[idx[2] as usize] as char
            } else {
                '='
            });
            out.push(if chunk.len() > 2 {
                BASE64_ALPHABET[idx[3] as usize] as char
            } else {
                '='
            });
        }
        out
    }

    fn decode_bytes(text: &str) -> Option<Vec<u8>> {
        let bytes = text.as_bytes();
        if bytes.len() < 4 || bytes.len() % 4 != 0 {
            return None;
        }
        let padding = bytes.iter().rev().take_while(|&&c| c == b'=').count();
        if padding > 2 {
            return None;
        }
        let body = &bytes[..bytes.len() - padding];
        let mut out = Vec::with_capacity(body.len() * 3 / 4);
        let mut acc: u32 = 0;
        let mut acc_bits: u32 = 0;
        for &c in body {
            acc = (acc << 6) | base64_value(c)?;
            acc_bits += 6;
            if acc_bits >= 8 {
                acc_bits -= 8;
                out.push(((acc >> acc_bits) & 0xff) as u8);
            }
        }
        // Non-zero trailing bits mean the padding lied about the length.
        if acc & ((1 << acc_bits) - 1) != 0 {
            return None;
        }
        Some(out)
    }
}

impl Decoder for Base64 {
    fn identifier(&self) -> &'static str {
        "base64"
    }

    fn can_apply(&self, text: &str) -> bool {
        let bytes = text.as_bytes();
        bytes.len() >= 4
            && bytes.len() % 4 == 0
            && bytes.iter().enumerate().all(|(i, &c)| {
                base64_value(c).is_some() || (c == b'=' && i >= bytes.len() - 2)
            })
    }

    fn decode(&self, text: &str, _params: &DecoderParams) -> DecodeOutcome {
        Self::decode_bytes(text).map_or_else(DecodeOutcome::failure, utf8_outcome)
    }
}

/// RFC 4648 Base32 (case-folded, strict padding to 8-character blocks).
pub struct Base32;

impl Base32 {
    #[must_use]
    pub fn encode(data: &[u8]) -> String {
        let mut out = String::new();
        for chunk in data.chunks(5) {
            let mut acc: u64 = 0;
            for (i, &b) in chunk.iter().enumerate() {
                acc |= u64::from(b) << (32 - 8 * i);
            }
            let chars = match chunk.len() {
                1 => 2,
                2 => 4,
                3 => 5,
                4 => 7,
                _ => 8,
            };
            for i in 0..8 {
                if i < chars {
                    let idx = ((acc >> (35 - 5 * i)) & 31) as usize;
                    out.push(BASE32_ALPHABET[idx] as char);
                } else {
                    out.push('=');
                }
            }
        }
        out
    }

    fn decode_bytes(text: &str) -> Option<Vec<u8>> {
        let bytes = text.as_bytes();
        if bytes.len() < 8 || bytes.len() % 8 != 0 {
            return None;
        }
        let padding = bytes.iter().rev().take_while(|&&c| c == b'=').count();
        if padding > 6 {
            return None;
        }
        let body = &bytes[..bytes.len() - padding];
        let mut out = Vec::new();
        let mut acc: u32 = 0;
        let mut acc_bits: u32 = 0;
        for &c in body {
            acc = (acc << 5) | base32_value(c)?;
            acc_bits += 5;
            if acc_bits >= 8 {
                acc_bits -= 8;
                out.push(((acc >> acc_bits) & 0xff) as u8);
            }
        }
        if acc & ((1 << acc_bits) - 1) != 0 {
            return None;
        }
        Some(out)
    }
}

impl Decoder for Base32 {
    fn identifier(&self) -> &'static str {
        "base32"
    }

    fn can_apply(&self, text: &str) -> bool {
        let bytes = text.as_bytes();
        bytes.len() >= 8
            && bytes.len() % 8 == 0
            && bytes.iter().enumerate().all(|(i, &c)| {
                base32_value(c).is_some() || (c == b'=' && i >= bytes.len() - 6)
            })
    }

    fn decode(&self, text: &str, _params: &DecoderParams) -> DecodeOutcome {
        Self::decode_bytes(text).map_or_else(DecodeOutcome::failure, utf8_outcome)
    }
}

/// Base58 (Bitcoin alphabet, big-integer radix conversion).
pub struct Base58;

impl Base58 {
    #[must_use]
    pub fn encode(data: &[u8]) -> String {
        let zeros = data.iter().take_while(|&&b| b == 0).count();
        let mut digits: Vec<u32> = Vec::new();
        for &byte in &data[zeros..] {
            let mut carry = u32::from(byte);
            for d in &mut digits {
                let t = *d * 256 + carry;
                *d = t % 58;
                carry = t / 58;
            }
            while carry > 0 {
                digits.push(carry % 58);
                carry /= 58;
            }
        }
        let mut out = String::new();
        for _ in 0..zeros {
            out.push('1');
        }
        for &d in digits.iter().rev() {
            out.push(BASE58_ALPHABET[d as usize] as char);
        }
        out
    }

    fn decode_bytes(text: &str) -> Option<Vec<u8>> {
        let bytes = text.as_bytes();
        if bytes.is_empty() {
            return None;
        }
        let zeros = bytes.iter().take_while(|&&c| c == b'1').count();
        let mut out: Vec<u8> = Vec::new();
        for &c in &bytes[zeros..] {
            let mut carry = base58_value(c)?;
            for b in out.iter_mut().rev() {
                let t = u32::from(*b) * 58 + carry;
                *b = (t & 0xff) as u8;
                carry = t >> 8;
            }
            while carry > 0 {
                out.insert(0, (carry & 0xff) as u8);
                carry >>= 8;
            }
        }
        let mut result = vec![0u8; zeros];
        result.extend_from_slice(&out);
        Some(result)
    }
}

impl Decoder for Base58 {
    fn identifier(&self) -> &'static str {
        "base58"
    }

    fn can_apply(&self, text: &str) -> bool {
        let bytes = text.as_bytes();
        bytes.len() >= 4 && bytes.iter().all(|&c| base58_value(c).is_some())
    }

    fn decode(&self, text: &str, _params: &DecoderParams) -> DecodeOutcome {
        Self::decode_bytes(text).map_or_else(DecodeOutcome::failure, utf8_outcome)
    }
}

/// Ascii85 (the `!`..`u` range with the `z` zero-group shortcut).
pub struct Base85;

impl Base85 {
    #[must_use]
    pub fn encode(data: &[u8]) -> String {
        let mut out = String::new();
        for chunk in data.chunks(4) {
            let mut n: u32 = 0;
            for (i, &b) in chunk.iter().enumerate() {
                n |= u32::from(b) << (24 - 8 * i);
            }
            if n == 0 && chunk.len() == 4 {
                out.push('z');
                continue;
            }
            let mut digits = [0u8; 5];
            let mut v = n;
            for d in digits.iter_mut().rev() {
                *d = (v % 85) as u8;
                v /= 85;
            }
            for &d in digits.iter().take(chunk.len() + 1) {
                out.push((d + b'!') as char);
            }
        }
        out
    }

    fn decode_bytes(text: &str) -> Option<Vec<u8>> {
        let mut out = Vec::new();
        let mut group: Vec<u32> = Vec::with_capacity(5);
        for c in text.bytes() {
            if c == b'z' {
                if !group.is_empty() {
                    return None;
                }
                out.extend_from_slice(&[0, 0, 0, 0]);
                continue;
            }
            if !(b'!'..=b'u').contains(&c) {
                return None;
            }
            group.push(u32::from(c - b'!'));
            if group.len() == 5 {
                let n = group.iter().try_fold(0u32, |acc, &d| {
                    acc.checked_mul(85)?.checked_add(d)
                })?;
                out.extend_from_slice(&n.to_be_bytes());
                group.clear();
            }
        }
        match group.len() {
            0 => {}
            1 => return None,
            k => {
                // Pad with the maximum digit, then keep k-1 bytes.
                while group.len() < 5 {
                    group.push(84);
                }
                let n = group.iter().try_fold(0u32, |acc, &d| {
                    acc.checked_mul(85)?.checked_add(d)
                })?;
                out.extend_from_slice(&n.to_be_bytes()[..k - 1]);
            }
        }
        Some(out)
    }
}

impl Decoder for Base85 {
    fn identifier(&self) -> &'static str {
        "base85"
    }

    fn can_apply(&self, text: &str) -> bool {
        let bytes = text.as_bytes();
        bytes.len() >= 2
            && bytes.len() % 5 != 1
            && bytes.iter().all(|&c| (b'!'..=b'u').contains(&c) || c == b'z')
    }

    fn decode(&self, text: &str, _params: &DecoderParams) -> DecodeOutcome {
        Self::decode_bytes(text).map_or_else(DecodeOutcome::failure, utf8_outcome)
    }
}

/// Hexadecimal byte pairs; tolerates whitespace and one `0x` prefix.
pub struct Hex;

impl Hex {
    #[must_use]
    pub fn encode(data: &[u8]) -> String {
        let mut out = String::with_capacity(data.len() * 2);
        for b in data {
            out.push_str(&format!("{b:02x}"));
        }
        out
    }

    fn normalized(text: &str) -> String {
        let stripped: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        stripped
            .strip_prefix("0x")
            .or_else(|| stripped.strip_prefix("0X"))
            .unwrap_or(&stripped)
            .to_string()
    }

    fn decode_bytes(text: &str) -> Option<Vec<u8>> {
        let body = Self::normalized(text);
        if body.len() < 2 || body.len() % 2 != 0 {
            return None;
        }
        let mut out = Vec::with_capacity(body.len() / 2);
        let bytes = body.as_bytes();
        for pair in bytes.chunks(2) {
            let hi = (pair[0] as char).to_digit(16)?;
            let lo = (pair[1] as char).to_digit(16)?;
            out.push(((hi << 4) | lo) as u8);
        }
        Some(out)
    }
}

impl Decoder for Hex {
    fn identifier(&self) -> &'static str {
        "hex"
    }

    fn can_apply(&self, text: &str) -> bool {
        let body = Self::normalized(text);
        body.len() >= 2
            && body.len() % 2 == 0
            && body.chars().all(|c| c.is_ascii_hexdigit())
    }

    fn decode(&self, text: &str, _params: &DecoderParams) -> DecodeOutcome {
        Self::decode_bytes(text).map_or_else(DecodeOutcome::failure, utf8_outcome)
    }
}

/// Binary octets; tolerates whitespace between groups.
pub struct Binary;

impl Binary {
    #[must_use]
    pub fn encode(data: &[u8]) -> String {
        data.iter()
            .map(|b| format!("{b:08b}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn decode_bytes(text: &str) -> Option<Vec<u8>> {
        let stripped: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        if stripped.len() < 8 || stripped.len() % 8 != 0 {
            return None;
        }
        let mut out = Vec::with_capacity(stripped.len() / 8);
        for chunk in stripped.as_bytes().chunks(8) {
            let mut byte = 0u8;
            for &bit in chunk {
                byte = (byte << 1)
                    | match bit {
                        b'0' => 0,
                        b'1' => 1,
                        _ => return None,
                    };
            }
            out.push(byte);
        }
        Some(out)
    }
}

impl Decoder for Binary {
    fn identifier(&self) -> &'static str {
        "binary"
    }

    fn can_apply(&self, text: &str) -> bool {
        let mut bits = 0usize;
        for c in text.chars() {
            match c {
                '0' | '1' => bits += 1,
                c if c.is_whitespace() => {}
                _ => return false,
            }
        }
        bits >= 8 && bits % 8 == 0
    }

    fn decode(&self, text: &str, _params: &DecoderParams) -> DecodeOutcome {
        Self::decode_bytes(text).map_or_else(DecodeOutcome::failure, utf8_outcome)
    }
}

/// Octal bytes: whitespace-separated values, or contiguous 3-digit groups.
pub struct Octal;

impl Octal {
    #[must_use]
    pub fn encode(data: &[u8]) -> String {
        data.iter()
            .map(|b| format!("{b:o}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn decode_bytes(text: &str) -> Option<Vec<u8>> {
        let mut out = Vec::new();
        if text.contains(char::is_whitespace) {
            for token in text.split_whitespace() {
                if token.is_empty() || token.len() > 3 {
                    return None;
                }
                let v = u16::from_str_radix(token, 8).ok()?;
                out.push(u8::try_from(v).ok()?);
            }
        } else {
            if text.len() < 3 || text.len() % 3 != 0 {
                return None;
            }
            for chunk in text.as_bytes().chunks(3) {
                let s = std::str::from_utf8(chunk).ok()?;
                let v = u16::from_str_radix(s, 8).ok()?;
                out.push(u8::try_from(v).ok()?);
            }
        }
        if out.is_empty() {
            return None;
        }
        Some(out)
    }
}

impl Decoder for Octal {
    fn identifier(&self) -> &'static str {
        "octal"
    }

    fn can_apply(&self, text: &str) -> bool {
        let mut digits = 0usize;
        for c in text.chars() {
            match c {
                '0'..='7' => digits += 1,
                c if c.is_whitespace() => {}
                _ => return false,
            }
        }
        digits >= 3
    }

    fn decode(&self, text: &str, _params: &DecoderParams) -> DecodeOutcome {
        Self::decode_bytes(text).map_or_else(DecodeOutcome::failure, utf8_outcome)
    }
}

/// 2-bit nucleotide packing: A=00, C=01, G=10, T=11, four bases per byte.
pub struct Dna;

impl Dna {
    const BASES: [char; 4] = ['A', 'C', 'G', 'T'];

    #[must_use]
    pub fn encode(data: &[u8]) -> String {
        let mut out = String::with_capacity(data.len() * 4);
        for &byte in data {
            for shift in [6u8, 4, 2, 0] {
                out.push(Self::BASES[usize::from((byte >> shift) & 3)]);
            }
        }
        out
    }

    fn decode_bytes(text: &str) -> Option<Vec<u8>> {
        let stripped: String = text
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_uppercase())
            .collect();
        if stripped.len() < 4 || stripped.len() % 4 != 0 {
            return None;
        }
        let mut out = Vec::with_capacity(stripped.len() / 4);
        for chunk in stripped.as_bytes().chunks(4) {
            let mut byte = 0u8;
            for &base in chunk {
                let v = match base {
                    b'A' => 0,
                    b'C' => 1,
                    b'G' => 2,
                    b'T' => 3,
                    _ => return None,
                };
                byte = (byte << 2) | v;
            }
            out.push(byte);
        }
        Some(out)
    }
}

impl Decoder for Dna {
    fn identifier(&self) -> &'static str {
        "dna"
    }

    fn can_apply(&self, text: &str) -> bool {
        let mut bases = 0usize;
        for c in text.chars() {
            match c.to_ascii_uppercase() {
                'A' | 'C' | 'G' | 'T' => bases += 1,
                c if c.is_whitespace() => {}
                _ => return false,
            }
        }
        bases >= 4 && bases % 4 == 0
    }

    fn decode(&self, text: &str, _params: &DecoderParams) -> DecodeOutcome {
        Self::decode_bytes(text).map_or_else(DecodeOutcome::failure, utf8_outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> DecoderParams {
        DecoderParams::new()
    }

    fn single(outcome: &DecodeOutcome) -> &str {
        assert!(outcome.succeeded, "expected success: {outcome:?}");
        assert_eq!(outcome.variants.len(), 1);
        &outcome.variants[0].text
    }

    #[test]
    fn base64_known_vector() {
        let out = Base64.decode("aGVsbG8gd29ybGQ=", &params());
        assert_eq!(single(&out), "hello world");
    }

    #[test]
    fn base64_round_trip() {
        for s in ["hello world", "test", "a", "你好, мир"] {
            let enc = Base64::encode(s.as_bytes());
            assert!(Base64.can_apply(&enc), "can_apply failed for {enc:?}");
            assert_eq!(single(&Base64.decode(&enc, &params())), s);
        }
    }

    #[test]
    fn base64_rejects_bad_padding_and_length() {
        assert!(!Base64.can_apply("abc"));
        assert!(!Base64.can_apply("ab=cdefg"));
        assert!(!Base64.decode("====", &params()).succeeded);
        assert!(!Base64.decode("aGVsbG8", &params()).succeeded);
    }

    #[test]
    fn base32_known_vector_and_round_trip() {
        assert_eq!(single(&Base32.decode("ORSXG5A=", &params())), "test");
        assert_eq!(
            single(&Base32.decode("NBSWY3DPEB3W64TMMQ======", &params())),
            "hello world"
        );
        for s in ["hello world", "xyz", "你好"] {
            let enc = Base32::encode(s.as_bytes());
            assert!(Base32.can_apply(&enc));
            assert_eq!(single(&Base32.decode(&enc, &params())), s);
        }
    }

    #[test]
    fn base58_known_vector_and_round_trip() {
        assert_eq!(single(&Base58.decode("3yZe7d", &params())), "test");
        assert_eq!(
            single(&Base58.decode("StV1DL6CwTryKyV", &params())),
            "hello world"
        );
        let enc = Base58::encode(b"\0\0abc");
        assert!(enc.starts_with("11"), "leading zeros must map to 1s: {enc}");
        let out = Base58.decode(&enc, &params());
        assert_eq!(single(&out), "\0\0abc");
    }

    #[test]
    fn base58_rejects_forbidden_characters() {
        // 0, O, I, l are not in the alphabet.
        assert!(!Base58.can_apply("0OIl"));
    }

    #[test]
    fn base85_known_vector_and_round_trip() {
        assert_eq!(single(&Base85.decode("FCfN8", &params())), "test");
        assert_eq!(
            single(&Base85.decode("BOu!rD]j7BEbo7", &params())),
            "hello world"
        );
        for s in ["hello world", "ab", "abcd"] {
            let enc = Base85::encode(s.as_bytes());
            assert_eq!(single(&Base85.decode(&enc, &params())), s);
        }
    }

    #[test]
    fn base85_z_only_legal_between_groups() {
        assert!(!Base85.decode("Fz", &params()).succeeded);
    }

    #[test]
    fn hex_variants_and_round_trip() {
        assert_eq!(single(&Hex.decode("74657374", &params())), "test");
        assert_eq!(single(&Hex.decode("0x74657374", &params())), "test");
        assert_eq!(single(&Hex.decode("74 65 73 74", &params())), "test");
        let enc = Hex::encode("hello world".as_bytes());
        assert_eq!(enc, "68656c6c6f20776f726c64");
        assert_eq!(single(&Hex.decode(&enc, &params())), "hello world");
    }

    #[test]
    fn hex_rejects_odd_length() {
        assert!(!Hex.can_apply("746"));
        assert!(!Hex.decode("746", &params()).succeeded);
    }

    #[test]
    fn binary_round_trip() {
        let enc = Binary::encode(b"test");
        assert_eq!(enc, "01110100 01100101 01110011 01110100");
        assert!(Binary.can_apply(&enc));
        assert_eq!(single(&Binary.decode(&enc, &params())), "test");
        // Contiguous form decodes too.
        let compact: String = enc.chars().filter(|c| !c.is_whitespace()).collect();
        assert_eq!(single(&Binary.decode(&compact, &params())), "test");
    }

    #[test]
    fn octal_round_trip_and_rejects_out_of_range() {
        let enc = Octal::encode(b"hello");
        assert_eq!(enc, "150 145 154 154 157");
        assert_eq!(single(&Octal.decode(&enc, &params())), "hello");
        // 777 octal = 511, does not fit a byte.
        assert!(!Octal.decode("777", &params()).succeeded);
    }

    #[test]
    fn dna_round_trip() {
        assert_eq!(Dna::encode(b"test"), "CTCACGCCCTATCTCA");
        assert_eq!(single(&Dna.decode("CTCACGCCCTATCTCA", &params())), "test");
        assert_eq!(single(&Dna.decode("ctca cgcc ctat ctca", &params())), "test");
    }

    #[test]
    fn dna_rejects_non_nucleotides() {
        assert!(!Dna.can_apply("ACGU"));
        assert!(!Dna.can_apply("ACG"));
    }

    #[test]
    fn invalid_utf8_is_failure_not_panic() {
        // 0xff 0xfe is not valid UTF-8.
        let out = Hex.decode("fffe", &params());
        assert!(!out.succeeded);
    }
}
