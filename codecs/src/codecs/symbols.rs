//! Symbolic substitutions: Morse code, leet-speak, tap code, and text
//! reversal.

use crate::decoder::{DecodeOutcome, Decoder};
use crate::params::DecoderParams;

const MORSE_TABLE: [(&str, char); 36] = [
    (".-", 'A'),
    ("-...", 'B'),
    ("-.-.", 'C'),
    ("-..", 'D'),
    (".", 'E'),
    ("..-.", 'F'),
    ("--.", 'G'),
    ("....", 'H'),
    ("..", 'I'),
    (".---", 'J'),
    ("-.-", 'K'),
    (".-..", 'L'),
    ("--", 'M'),
    ("-.", 'N'),
    ("---", 'O'),
    (".--.", 'P'),
    ("--.-", 'Q'),
    (".-.", 'R'),
    ("...", 'S'),
    ("-", 'T'),
    ("..-", 'U'),
    ("...-", 'V'),
    (".--", 'W'),
    ("-..-", 'X'),
    ("-.--", 'Y'),
    ("--..", 'Z'),
    ("-----", '0'),
    (".----", '1'),
    ("..---", '2'),
    ("...--", '3'),
    ("....-", '4'),
    (".....", '5'),
    ("-....", '6'),
    ("--...", '7'),
    ("---..", '8'),
    ("----.", '9'),
];

/// International Morse: letter tokens separated by spaces, words by `/`.
pub struct Morse;

impl Morse {
    /// Forward encoder for tests (letters and digits only; other characters
    /// are dropped, spaces become `/`).
    #[must_use]
    pub fn encode(text: &str) -> String {
        let mut tokens = Vec::new();
        for c in text.chars() {
            if c == ' ' {
                tokens.push("/".to_string());
            } else {
                let upper = c.to_ascii_uppercase();
                if let Some((code, _)) = MORSE_TABLE.iter().find(|&&(_, ch)| ch == upper) {
                    tokens.push((*code).to_string());
                }
            }
        }
        tokens.join(" ")
    }

    fn lookup(token: &str) -> Option<char> {
        MORSE_TABLE
            .iter()
            .find(|&&(code, _)| code == token)
            .map(|&(_, c)| c)
    }
}

impl Decoder for Morse {
    fn identifier(&self) -> &'static str {
        "morse"
    }

    fn can_apply(&self, text: &str) -> bool {
        let mut signal = false;
        for c in text.chars() {
            match c {
                '.' | '-' => signal = true,
                '/' | '|' => {}
                c if c.is_whitespace() => {}
                _ => return false,
            }
        }
        signal
    }

    fn decode(&self, text: &str, _params: &DecoderParams) -> DecodeOutcome {
        let mut out = String::new();
        for token in text.split_whitespace() {
            match token {
                "/" | "|" => out.push(' '),
                t => match Self::lookup(t) {
                    Some(c) => out.push(c),
                    None => return DecodeOutcome::failure(),
                },
            }
        }
        if out.is_empty() {
            DecodeOutcome::failure()
        } else {
            DecodeOutcome::single(out)
        }
    }
}

/// Leet-speak normalization: digits and symbols back to the letters they
/// stand in for. Lossy and not uniquely invertible, so there is no encoder.
pub struct Leet;

impl Leet {
    fn substitute(c: char) -> Option<char> {
        match c {
            '4' | '@' => Some('a'),
            '8' => Some('b'),
            '3' => Some('e'),
            '6' => Some('g'),
            '1' | '!' => Some('i'),
            '0' => Some('o'),
            '5' | '$' => Some('s'),
            '7' | '+' => Some('t'),
            '2' => Some('z'),
            _ => None,
        }
    }
}

impl Decoder for Leet {
    fn identifier(&self) -> &'static str {
        "leet"
    }

    fn can_apply(&self, text: &str) -> bool {
        text.chars().any(|c| Self::substitute(c).is_some())
            && text.chars().any(|c| c.is_ascii_alphabetic())
    }

    fn decode(&self, text: &str, _params: &DecoderParams) -> DecodeOutcome {
        let out: String = text
            .chars()
            .map(|c| Self::substitute(c).unwrap_or(c))
            .collect();
        if out == text {
            DecodeOutcome::failure()
        } else {
            DecodeOutcome::single(out)
        }
    }
}

/// Tap code: digit pairs over the 5×5 Polybius square (K collapsed into C).
pub struct TapCode;

const TAP_GRID: [char; 25] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't',
    'u', 'v', 'w', 'x', 'y', 'z',
];

impl TapCode {
    /// Forward encoder for tests (letters only; `k` encodes as `c`).
    #[must_use]
    pub fn encode(text: &str) -> String {
        let mut tokens = Vec::new();
        for c in text.chars() {
            let c = match c.to_ascii_lowercase() {
                'k' => 'c',
                other => other,
            };
            if let Some(i) = TAP_GRID.iter().position(|&g| g == c) {
                tokens.push(format!("{}{}", i / 5 + 1, i % 5 + 1));
            }
        }
        tokens.join(" ")
    }
}

impl Decoder for TapCode {
    fn identifier(&self) -> &'static str {
        "tap-code"
    }

    fn can_apply(&self, text: &str) -> bool {
        let mut tokens = 0usize;
        for token in text.split_whitespace() {
            let b = token.as_bytes();
            if b.len() != 2 || !b.iter().all(|&c| (b'1'..=b'5').contains(&c)) {
                return false;
            }
            tokens += 1;
        }
        tokens >= 2
    }

    fn decode(&self, text: &str, _params: &DecoderParams) -> DecodeOutcome {
        let mut out = String::new();
        for token in text.split_whitespace() {
            let b = token.as_bytes();
            if b.len() != 2 {
                return DecodeOutcome::failure();
            }
            let (row, col) = (b[0], b[1]);
            if !(b'1'..=b'5').contains(&row) || !(b'1'..=b'5').contains(&col) {
                return DecodeOutcome::failure();
            }
            let index = usize::from(row - b'1') * 5 + usize::from(col - b'1');
            out.push(TAP_GRID[index]);
        }
        if out.is_empty() {
            DecodeOutcome::failure()
        } else {
            DecodeOutcome::single(out)
        }
    }
}

/// Whole-string reversal. Self-inverse; the search's duplicate suppression
/// is what keeps reverse∘reverse from looping.
pub struct Reverse;

impl Reverse {
    #[must_use]
    pub fn encode(text: &str) -> String {
        text.chars().rev().collect()
    }
}

impl Decoder for Reverse {
    fn identifier(&self) -> &'static str {
        "reverse"
    }

    fn can_apply(&self, text: &str) -> bool {
        text.chars().count() >= 2
    }

    fn decode(&self, text: &str, _params: &DecoderParams) -> DecodeOutcome {
        let reversed: String = text.chars().rev().collect();
        if reversed == text {
            DecodeOutcome::failure()
        } else {
            DecodeOutcome::single(reversed)
        }
    }
}
