//! Chinese-specific codecs: the pawnshop (当铺) cipher and the
//! periodic-table cipher.

use crate::decoder::{DecodeOutcome, Decoder};
use crate::params::DecoderParams;

/// The pawnshop cipher's digit hanzi: each character's number of
/// protruding strokes encodes one decimal digit.
const PAWNSHOP_DIGITS: [(char, u8); 11] = [
    ('口', 0),
    ('田', 0),
    ('由', 1),
    ('中', 2),
    ('人', 3),
    ('工', 4),
    ('大', 5),
    ('王', 6),
    ('夫', 7),
    ('井', 8),
    ('羊', 9),
];

/// Pawnshop cipher: whitespace-separated hanzi groups, each group reading
/// as a decimal number that must land in printable ASCII (32..=126).
pub struct Pawnshop;

impl Pawnshop {
    fn digit(c: char) -> Option<u8> {
        PAWNSHOP_DIGITS
            .iter()
            .find(|&&(ch, _)| ch == c)
            .map(|&(_, d)| d)
    }

    /// Forward encoder for tests. Only printable ASCII is representable;
    /// zero digits encode as 口.
    #[must_use]
    pub fn encode(text: &str) -> String {
        let encode_char = |c: char| -> String {
            (c as u32)
                .to_string()
                .chars()
                .map(|d| {
                    let d = d.to_digit(10).unwrap_or(0) as u8;
                    PAWNSHOP_DIGITS
                        .iter()
                        .find(|&&(_, v)| v == d)
                        .map_or('口', |&(ch, _)| ch)
                })
                .collect()
        };
        text.chars()
            .map(encode_char)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Decoder for Pawnshop {
    fn identifier(&self) -> &'static str {
        "pawnshop"
    }

    fn can_apply(&self, text: &str) -> bool {
        let mut mapped = 0usize;
        for c in text.chars() {
            if c.is_whitespace() {
                continue;
            }
            if Self::digit(c).is_none() {
                return false;
            }
            mapped += 1;
        }
        mapped >= 2
    }

    fn decode(&self, text: &str, _params: &DecoderParams) -> DecodeOutcome {
        let mut out = String::new();
        for group in text.split_whitespace() {
            let mut value: u32 = 0;
            let mut digits = 0usize;
            for c in group.chars() {
                let Some(d) = Self::digit(c) else {
                    return DecodeOutcome::failure();
                };
                value = value.saturating_mul(10).saturating_add(u32::from(d));
                digits += 1;
            }
            // Printable ASCII only; anything else means this was not a
            // pawnshop message.
            if digits == 0 || !(32..=126).contains(&value) {
                return DecodeOutcome::failure();
            }
            out.push(char::from_u32(value).unwrap_or('?'));
        }
        if out.is_empty() {
            DecodeOutcome::failure()
        } else {
            DecodeOutcome::single(out)
        }
    }
}

/// Atomic number to element symbol, `H`(1) through `Og`(118).
const ELEMENT_SYMBOLS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk",
    "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn",
    "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

/// Periodic-table cipher: a run of atomic numbers becomes the concatenated
/// element symbols, lowercased (`32 28 92 16` → `genius`).
pub struct PeriodicTable;

impl PeriodicTable {
    fn numbers(text: &str) -> Vec<u32> {
        let mut out = Vec::new();
        let mut current: Option<u32> = None;
        for c in text.chars() {
            if let Some(d) = c.to_digit(10) {
                current = Some(current.unwrap_or(0).saturating_mul(10).saturating_add(d));
            } else if let Some(v) = current.take() {
                out.push(v);
            }
        }
        if let Some(v) = current {
            out.push(v);
        }
        out
    }
}

impl Decoder for PeriodicTable {
    fn identifier(&self) -> &'static str {
        "periodic-table"
    }

    fn can_apply(&self, text: &str) -> bool {
        let mut has_digit = false;
        for c in text.chars() {
            match c {
                '0'..='9' => has_digit = true,
                ',' | ';' => {}
                c if c.is_whitespace() => {}
                _ => return false,
            }
        }
        has_digit
    }

    fn decode(&self, text: &str, _params: &DecoderParams) -> DecodeOutcome {
        let numbers = Self::numbers(text);
        if numbers.is_empty() {
            return DecodeOutcome::failure();
        }
        let mut out = String::new();
        for n in numbers {
            if n == 0 || n > 118 {
                return DecodeOutcome::failure();
            }
            out.push_str(ELEMENT_SYMBOLS[(n - 1) as usize]);
        }
        DecodeOutcome::single(out.to_ascii_lowercase())
    }
}
