//! Built-in data restrictions.

use chrono::Datelike;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{Validate, ValidationContext, ValidationRule};

/// Expiry dates further ahead than this are rejected.
const MAX_EXPIRY_YEARS_AHEAD: i32 = 25;

/// Field consulted by the boleto bancario requiredness rule.
const FISCAL_NUMBER_FIELD: &str = "fiscalNumber";

/// Length of a company (CNPJ) fiscal number.
const COMPANY_FISCAL_NUMBER_LENGTH: usize = 14;

/// Literal pattern; compiling it cannot fail.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\.\s]+(\.[^@\.\s]+)*@([^@\.\s]+\.)*[^@\.\s]+\.[^@\.\s][^@\.\s]+$")
        .expect("e-mail pattern compiles")
});

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LengthRule {
    #[serde(default)]
    pub min_length: usize,
    pub max_length: usize,
}

impl Validate for LengthRule {
    fn rule(&self) -> ValidationRule {
        ValidationRule::Length {
            min_length: self.min_length,
            max_length: self.max_length,
        }
    }

    fn is_valid(&self, value: &str, _ctx: &ValidationContext<'_>) -> bool {
        let len = value.chars().count();
        len >= self.min_length && len <= self.max_length
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeRule {
    pub min_value: i64,
    pub max_value: i64,
}

impl Validate for RangeRule {
    fn rule(&self) -> ValidationRule {
        ValidationRule::Range {
            min_value: self.min_value,
            max_value: self.max_value,
        }
    }

    fn is_valid(&self, value: &str, _ctx: &ValidationContext<'_>) -> bool {
        value
            .parse::<i64>()
            .map(|n| n >= self.min_value && n <= self.max_value)
            .unwrap_or(false)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LuhnRule {}

impl Validate for LuhnRule {
    fn rule(&self) -> ValidationRule {
        ValidationRule::Luhn
    }

    fn is_valid(&self, value: &str, _ctx: &ValidationContext<'_>) -> bool {
        luhn_checksum_valid(value)
    }
}

/// Luhn (mod 10) check over an all-digit string.
pub fn luhn_checksum_valid(digits: &str) -> bool {
    if digits.len() < 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let sum: u32 = digits
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let d = u32::from(b - b'0');
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

/// Accepts `MMYY` or `MMYYYY`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpirationDateRule {}

impl ExpirationDateRule {
    fn parse(value: &str) -> Option<(i32, u32)> {
        if !value.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let (month, year) = match value.len() {
            4 => (&value[..2], 2000 + value[2..].parse::<i32>().ok()?),
            6 => (&value[..2], value[2..].parse::<i32>().ok()?),
            _ => return None,
        };
        let month: u32 = month.parse().ok()?;
        (1..=12).contains(&month).then_some((year, month))
    }
}

impl Validate for ExpirationDateRule {
    fn rule(&self) -> ValidationRule {
        ValidationRule::ExpirationDate
    }

    fn is_valid(&self, value: &str, ctx: &ValidationContext<'_>) -> bool {
        let Some(expiry) = Self::parse(value) else {
            return false;
        };
        let now = (ctx.today.year(), ctx.today.month());
        let latest = (now.0 + MAX_EXPIRY_YEARS_AHEAD, now.1);
        expiry >= now && expiry <= latest
    }
}

/// Whole-value match against the declared pattern.
///
/// The pattern is compiled once, when the rule is built or decoded. A
/// pattern that does not compile rejects every value.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "RegularExpressionDocument", into = "RegularExpressionDocument")]
pub struct RegularExpressionRule {
    pattern: String,
    compiled: Option<Regex>,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegularExpressionDocument {
    regular_expression: String,
}

impl RegularExpressionRule {
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let compiled = match Regex::new(&format!("^(?:{})$", pattern)) {
            Ok(re) => Some(re),
            Err(err) => {
                tracing::warn!(pattern = %pattern, "unusable validation pattern: {err}");
                None
            }
        };
        Self { pattern, compiled }
    }

    /// The pattern as declared by the field.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled.is_some()
    }
}

impl From<RegularExpressionDocument> for RegularExpressionRule {
    fn from(doc: RegularExpressionDocument) -> Self {
        Self::new(doc.regular_expression)
    }
}

impl From<RegularExpressionRule> for RegularExpressionDocument {
    fn from(rule: RegularExpressionRule) -> Self {
        Self {
            regular_expression: rule.pattern,
        }
    }
}

impl PartialEq for RegularExpressionRule {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for RegularExpressionRule {}

impl Validate for RegularExpressionRule {
    fn rule(&self) -> ValidationRule {
        ValidationRule::RegularExpression {
            pattern: self.pattern.clone(),
        }
    }

    fn is_valid(&self, value: &str, _ctx: &ValidationContext<'_>) -> bool {
        self.compiled.as_ref().is_some_and(|re| re.is_match(value))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddressRule {}

impl Validate for EmailAddressRule {
    fn rule(&self) -> ValidationRule {
        ValidationRule::EmailAddress
    }

    fn is_valid(&self, value: &str, _ctx: &ValidationContext<'_>) -> bool {
        EMAIL_REGEX.is_match(value)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedListRule {
    #[serde(default)]
    pub allowed_values: Vec<String>,
}

impl Validate for FixedListRule {
    fn rule(&self) -> ValidationRule {
        ValidationRule::FixedList
    }

    fn is_valid(&self, value: &str, _ctx: &ValidationContext<'_>) -> bool {
        self.allowed_values.iter().any(|allowed| allowed == value)
    }
}

/// The value must be the literal `true`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermsAndConditionsRule {}

impl Validate for TermsAndConditionsRule {
    fn rule(&self) -> ValidationRule {
        ValidationRule::TermsAndConditions
    }

    fn is_valid(&self, value: &str, _ctx: &ValidationContext<'_>) -> bool {
        value == "true"
    }

    fn checks_empty(&self) -> bool {
        true
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IbanRule {}

impl Validate for IbanRule {
    fn rule(&self) -> ValidationRule {
        ValidationRule::Iban
    }

    fn is_valid(&self, value: &str, _ctx: &ValidationContext<'_>) -> bool {
        is_valid_iban(value)
    }
}

/// ISO 13616 structure and mod-97 check. Spaces are ignored.
pub fn is_valid_iban(value: &str) -> bool {
    let iban: Vec<char> = value
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if !(15..=34).contains(&iban.len())
        || !iban[..2].iter().all(|c| c.is_ascii_uppercase())
        || !iban[2..4].iter().all(|c| c.is_ascii_digit())
        || !iban.iter().all(|c| c.is_ascii_alphanumeric())
    {
        return false;
    }

    // Country code and check digits move to the end; letters count as 10..35.
    let remainder = iban[4..]
        .iter()
        .chain(iban[..4].iter())
        .fold(0u32, |acc, c| {
            let n = c.to_digit(36).unwrap_or(0);
            if n >= 10 {
                (acc * 100 + n) % 97
            } else {
                (acc * 10 + n) % 97
            }
        });
    remainder == 1
}

/// Chinese resident identity card number (15 digits, or 17 digits plus check character).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResidentIdNumberRule {}

impl ResidentIdNumberRule {
    const WEIGHTS: [u32; 17] = [7, 9, 10, 5, 8, 4, 2, 1, 6, 3, 7, 9, 10, 5, 8, 4, 2];
    const CHECK_CHARS: [char; 11] = ['1', '0', 'X', '9', '8', '7', '6', '5', '4', '3', '2'];
}

impl Validate for ResidentIdNumberRule {
    fn rule(&self) -> ValidationRule {
        ValidationRule::ResidentIdNumber
    }

    fn is_valid(&self, value: &str, _ctx: &ValidationContext<'_>) -> bool {
        let chars: Vec<char> = value.chars().collect();
        match chars.len() {
            15 => chars.iter().all(|c| c.is_ascii_digit()),
            18 => {
                let (body, check) = chars.split_at(17);
                if !body.iter().all(|c| c.is_ascii_digit()) {
                    return false;
                }
                let sum: u32 = body
                    .iter()
                    .zip(Self::WEIGHTS.iter())
                    .map(|(c, w)| c.to_digit(10).unwrap_or(0) * w)
                    .sum();
                let expected = Self::CHECK_CHARS[(sum % 11) as usize];
                check[0].to_ascii_uppercase() == expected
            }
            _ => false,
        }
    }
}

/// Makes a field mandatory when the fiscal number belongs to a company.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoletoBancarioRequirednessRule {
    #[serde(default)]
    pub fragment_index: u32,
}

impl Validate for BoletoBancarioRequirednessRule {
    fn rule(&self) -> ValidationRule {
        ValidationRule::BoletoBancarioRequiredness
    }

    fn is_valid(&self, value: &str, ctx: &ValidationContext<'_>) -> bool {
        let company = ctx
            .value(FISCAL_NUMBER_FIELD)
            .map(|n| n.chars().count() == COMPANY_FISCAL_NUMBER_LENGTH)
            .unwrap_or(false);
        !company || !value.is_empty()
    }

    fn checks_empty(&self) -> bool {
        true
    }
}
