//! Field value validation.
//!
//! Payment product fields declare their data restrictions as a set of
//! validators. Each validator checks an unmasked value and reports the
//! [`ValidationRule`] it enforces when the value does not satisfy it.

mod rules;

use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub use rules::{
    is_valid_iban, luhn_checksum_valid, BoletoBancarioRequirednessRule, EmailAddressRule,
    ExpirationDateRule, FixedListRule, IbanRule, LengthRule, LuhnRule, RangeRule,
    RegularExpressionRule, ResidentIdNumberRule, TermsAndConditionsRule,
};

/// The rule a value failed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "camelCase")]
pub enum ValidationRule {
    /// A required field has no value.
    Required,
    /// Value length outside the allowed bounds.
    #[serde(rename_all = "camelCase")]
    Length { min_length: usize, max_length: usize },
    /// Numeric value outside the allowed bounds, or not numeric.
    #[serde(rename_all = "camelCase")]
    Range { min_value: i64, max_value: i64 },
    /// Luhn checksum mismatch.
    Luhn,
    /// Expiry date malformed, in the past or too far ahead.
    ExpirationDate,
    /// Value does not match the declared pattern.
    RegularExpression { pattern: String },
    /// Not an e-mail address.
    EmailAddress,
    /// Value not in the allowed list.
    FixedList,
    /// Terms and conditions not accepted.
    TermsAndConditions,
    /// Not a valid IBAN.
    Iban,
    /// Not a valid resident identity number.
    ResidentIdNumber,
    /// Field required for company fiscal numbers.
    BoletoBancarioRequiredness,
}

impl ValidationRule {
    /// Localization key for the error message.
    pub fn message_id(&self) -> &'static str {
        match self {
            Self::Required => "cardkit.validation.required",
            Self::Length { .. } => "cardkit.validation.length",
            Self::Range { .. } => "cardkit.validation.range",
            Self::Luhn => "cardkit.validation.luhn",
            Self::ExpirationDate => "cardkit.validation.expirationDate",
            Self::RegularExpression { .. } => "cardkit.validation.regularExpression",
            Self::EmailAddress => "cardkit.validation.emailAddress",
            Self::FixedList => "cardkit.validation.fixedList",
            Self::TermsAndConditions => "cardkit.validation.termsAndConditions",
            Self::Iban => "cardkit.validation.iban",
            Self::ResidentIdNumber => "cardkit.validation.residentIdNumber",
            Self::BoletoBancarioRequiredness => "cardkit.validation.boletoBancarioRequiredness",
        }
    }
}

/// A failed validation for a single field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// Payment product field id.
    pub field_id: String,
    /// The rule that failed.
    #[serde(flatten)]
    pub rule: ValidationRule,
}

impl ValidationError {
    /// Create a validation error.
    pub fn new(field_id: impl Into<String>, rule: ValidationRule) -> Self {
        Self {
            field_id: field_id.into(),
            rule,
        }
    }

    /// Localization key for the error message.
    pub fn message_id(&self) -> &'static str {
        self.rule.message_id()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.rule {
            ValidationRule::Length {
                min_length,
                max_length,
            } => write!(
                f,
                "{}: length must be between {} and {}",
                self.field_id, min_length, max_length
            ),
            ValidationRule::Range {
                min_value,
                max_value,
            } => write!(
                f,
                "{}: value must be between {} and {}",
                self.field_id, min_value, max_value
            ),
            rule => write!(f, "{}: {}", self.field_id, rule.message_id()),
        }
    }
}

/// Values a validator may consult besides the one it checks.
#[derive(Clone, Debug)]
pub struct ValidationContext<'a> {
    /// Unmasked values of every field in the request.
    pub field_values: &'a BTreeMap<String, String>,
    /// Reference date for expiry checks.
    pub today: NaiveDate,
}

impl<'a> ValidationContext<'a> {
    /// Context dated today (UTC).
    pub fn new(field_values: &'a BTreeMap<String, String>) -> Self {
        Self {
            field_values,
            today: Utc::now().date_naive(),
        }
    }

    /// Override the reference date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Unmasked value of another field.
    pub fn value(&self, field_id: &str) -> Option<&str> {
        self.field_values.get(field_id).map(String::as_str)
    }
}

/// A single data restriction.
pub trait Validate {
    /// The rule reported when `value` fails.
    fn rule(&self) -> ValidationRule;

    /// Whether `value` satisfies the restriction.
    fn is_valid(&self, value: &str, ctx: &ValidationContext<'_>) -> bool;

    /// Whether the restriction must also run on empty values.
    ///
    /// Most restrictions only judge what the user entered and leave
    /// required-ness to the caller.
    fn checks_empty(&self) -> bool {
        false
    }
}

/// The validators a payment product field declares.
///
/// Mirrors the `validators` object of the field's `dataRestrictions`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validators {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<LengthRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub luhn: Option<LuhnRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<ExpirationDateRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regular_expression: Option<RegularExpressionRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<EmailAddressRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_list: Option<FixedListRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms_and_conditions: Option<TermsAndConditionsRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iban: Option<IbanRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resident_id_number: Option<ResidentIdNumberRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boleto_bancario_requiredness: Option<BoletoBancarioRequirednessRule>,
}

impl Validators {
    /// All configured validators.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Validate> {
        let all: [Option<&dyn Validate>; 11] = [
            self.length.as_ref().map(|v| v as &dyn Validate),
            self.range.as_ref().map(|v| v as &dyn Validate),
            self.luhn.as_ref().map(|v| v as &dyn Validate),
            self.expiration_date.as_ref().map(|v| v as &dyn Validate),
            self.regular_expression.as_ref().map(|v| v as &dyn Validate),
            self.email_address.as_ref().map(|v| v as &dyn Validate),
            self.fixed_list.as_ref().map(|v| v as &dyn Validate),
            self.terms_and_conditions.as_ref().map(|v| v as &dyn Validate),
            self.iban.as_ref().map(|v| v as &dyn Validate),
            self.resident_id_number.as_ref().map(|v| v as &dyn Validate),
            self.boleto_bancario_requiredness
                .as_ref()
                .map(|v| v as &dyn Validate),
        ];
        all.into_iter().flatten()
    }

    /// Number of configured validators.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// True when the field declares no validators.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every applicable validator over `value`.
    pub fn validate(
        &self,
        field_id: &str,
        value: &str,
        ctx: &ValidationContext<'_>,
    ) -> Vec<ValidationError> {
        self.iter()
            .filter(|v| !value.is_empty() || v.checks_empty())
            .filter(|v| !v.is_valid(value, ctx))
            .map(|v| ValidationError::new(field_id, v.rule()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validators(json: serde_json::Value) -> Validators {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_decode_card_number_validators() {
        let v = validators(serde_json::json!({
            "luhn": {},
            "length": { "minLength": 12, "maxLength": 19 },
            "regularExpression": { "regularExpression": "^[0-9]*$" }
        }));
        assert_eq!(v.len(), 3);
        assert!(v.luhn.is_some());
        assert_eq!(v.length.as_ref().map(|l| l.max_length), Some(19));
    }

    #[test]
    fn test_validate_collects_every_failure() {
        let v = validators(serde_json::json!({
            "luhn": {},
            "length": { "minLength": 12, "maxLength": 19 }
        }));
        let values = BTreeMap::new();
        let ctx = ValidationContext::new(&values);

        assert!(v.validate("cardNumber", "4567350000427977", &ctx).is_empty());

        let errors = v.validate("cardNumber", "4567", &ctx);
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.field_id == "cardNumber"));
        assert!(errors.iter().any(|e| e.rule == ValidationRule::Luhn));
    }

    #[test]
    fn test_empty_value_skips_value_rules() {
        let v = validators(serde_json::json!({ "luhn": {}, "length": { "minLength": 3, "maxLength": 4 } }));
        let values = BTreeMap::new();
        let ctx = ValidationContext::new(&values);
        assert!(v.validate("cvv", "", &ctx).is_empty());
    }

    #[test]
    fn test_validation_error_serializes_flat() {
        let err = ValidationError::new(
            "cvv",
            ValidationRule::Length {
                min_length: 3,
                max_length: 4,
            },
        );
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["fieldId"], "cvv");
        assert_eq!(json["rule"], "length");
        assert_eq!(json["minLength"], 3);
        assert_eq!(err.to_string(), "cvv: length must be between 3 and 4");
    }
}
