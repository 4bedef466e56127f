//! Field masking formatter.
//!
//! Payment product fields carry display masks such as
//! `{{9999}} {{9999}} {{9999}} {{9999}}`. Characters between `{{` and `}}`
//! are input slots, everything else is a literal inserted for display.
//!
//! # Example
//!
//! ```
//! use cardkit_lib::formatter::{apply_mask, remove_mask};
//!
//! let mask = "{{9999}} {{9999}} {{9999}} {{9999}}";
//! assert_eq!(apply_mask(mask, "4567350000427977"), "4567 3500 0042 7977");
//! assert_eq!(remove_mask(mask, "4567 3500 0042 7977"), "4567350000427977");
//! ```

const OBFUSCATION_CHAR: char = '*';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Token {
    Slot,
    Literal(char),
}

/// A parsed display mask.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    pattern: String,
    tokens: Vec<Token>,
}

impl Mask {
    /// Parse a mask pattern. Unterminated `{{` groups run to the end of the pattern.
    pub fn parse(pattern: &str) -> Self {
        let chars: Vec<char> = pattern.chars().collect();
        let mut tokens = Vec::with_capacity(chars.len());
        let mut in_slot_group = false;
        let mut i = 0;

        while i < chars.len() {
            let pair = (chars[i], chars.get(i + 1).copied());
            match pair {
                ('{', Some('{')) if !in_slot_group => {
                    in_slot_group = true;
                    i += 2;
                }
                ('}', Some('}')) if in_slot_group => {
                    in_slot_group = false;
                    i += 2;
                }
                (c, _) => {
                    tokens.push(if in_slot_group {
                        Token::Slot
                    } else {
                        Token::Literal(c)
                    });
                    i += 1;
                }
            }
        }

        Self {
            pattern: pattern.to_string(),
            tokens,
        }
    }

    /// The original pattern string.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Number of input characters the mask accepts.
    pub fn slot_count(&self) -> usize {
        self.tokens.iter().filter(|t| **t == Token::Slot).count()
    }

    /// Format `value` for display.
    pub fn apply(&self, value: &str) -> String {
        self.fill(value).into_iter().map(|(c, _)| c).collect()
    }

    /// Recover the raw input from a (possibly partially) masked value.
    pub fn remove(&self, value: &str) -> String {
        self.fill(value)
            .into_iter()
            .filter_map(|(c, is_slot)| is_slot.then_some(c))
            .collect()
    }

    /// Format `value` for display with every input character hidden.
    pub fn obfuscate(&self, value: &str) -> String {
        self.fill(value)
            .into_iter()
            .map(|(c, is_slot)| if is_slot { OBFUSCATION_CHAR } else { c })
            .collect()
    }

    /// Walk the tokens, pairing each emitted character with whether it sits in a slot.
    fn fill(&self, value: &str) -> Vec<(char, bool)> {
        let mut input = value.chars().peekable();
        let mut out = Vec::with_capacity(self.tokens.len());

        for token in &self.tokens {
            let Some(&next) = input.peek() else {
                break;
            };
            match token {
                Token::Slot => {
                    out.push((next, true));
                    input.next();
                }
                Token::Literal(literal) => {
                    if next == *literal {
                        input.next();
                    }
                    out.push((*literal, false));
                }
            }
        }

        out
    }
}

/// Apply `mask` to `value`. See [`Mask::apply`].
pub fn apply_mask(mask: &str, value: &str) -> String {
    Mask::parse(mask).apply(value)
}

/// Strip `mask` from `value`. See [`Mask::remove`].
pub fn remove_mask(mask: &str, value: &str) -> String {
    Mask::parse(mask).remove(value)
}

/// Hide every character of `value`, keeping mask literals when a mask is given.
pub fn obfuscate(value: &str, mask: Option<&str>) -> String {
    match mask {
        Some(mask) => Mask::parse(mask).obfuscate(value),
        None => value.chars().map(|_| OBFUSCATION_CHAR).collect(),
    }
}
