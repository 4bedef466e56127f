//! Payment product fields.

use serde::{Deserialize, Serialize};

use crate::formatter::Mask;
use crate::validation::{ValidationContext, ValidationError, ValidationRule, Validators};

/// Data type of a field value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    String,
    Integer,
    #[serde(rename = "numericstring")]
    NumericString,
    #[serde(rename = "expirydate")]
    ExpiryDate,
    Boolean,
    Date,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataRestrictions {
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub validators: Validators,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueMappingItem {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Input element the field is rendered with (`text`, `list`, `currency`, ...).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormElement {
    #[serde(rename = "type")]
    pub element_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value_mapping: Vec<ValueMappingItem>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDisplayHints {
    #[serde(default)]
    pub display_order: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<String>,
    /// Hide the value while it is typed (e.g. CVV).
    #[serde(default)]
    pub obfuscate: bool,
    #[serde(default)]
    pub always_show: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_input_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<Tooltip>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_element: Option<FormElement>,
}

/// A value the customer provides for a payment product.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentProductField {
    pub id: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub data_restrictions: DataRestrictions,
    #[serde(default)]
    pub display_hints: FieldDisplayHints,
}

impl PaymentProductField {
    pub fn is_required(&self) -> bool {
        self.data_restrictions.is_required
    }

    /// Display mask, if the field has a non-empty one.
    pub fn mask(&self) -> Option<Mask> {
        self.display_hints
            .mask
            .as_deref()
            .filter(|m| !m.is_empty())
            .map(Mask::parse)
    }

    /// Format `value` for display.
    pub fn apply_mask(&self, value: &str) -> String {
        match self.mask() {
            Some(mask) => mask.apply(value),
            None => value.to_string(),
        }
    }

    /// Strip display formatting from `value`.
    pub fn remove_mask(&self, value: &str) -> String {
        match self.mask() {
            Some(mask) => mask.remove(value),
            None => value.to_string(),
        }
    }

    /// What to show while the value is being entered: masked, and hidden
    /// when the field is obfuscated.
    pub fn display_value(&self, value: &str) -> String {
        if self.display_hints.obfuscate {
            crate::formatter::obfuscate(value, self.display_hints.mask.as_deref())
        } else {
            self.apply_mask(value)
        }
    }

    /// Validate a (possibly masked) value.
    ///
    /// An empty value fails only the required check and the rules that judge
    /// absence themselves.
    pub fn validate(&self, value: &str, ctx: &ValidationContext<'_>) -> Vec<ValidationError> {
        let unmasked = self.remove_mask(value);
        if unmasked.is_empty() && self.is_required() {
            return vec![ValidationError::new(&self.id, ValidationRule::Required)];
        }
        self.data_restrictions
            .validators
            .validate(&self.id, &unmasked, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn card_number() -> PaymentProductField {
        serde_json::from_value(json!({
            "id": "cardNumber",
            "type": "numericstring",
            "dataRestrictions": {
                "isRequired": true,
                "validators": {
                    "luhn": {},
                    "length": { "minLength": 12, "maxLength": 19 }
                }
            },
            "displayHints": {
                "displayOrder": 10,
                "label": "Card number",
                "mask": "{{9999}} {{9999}} {{9999}} {{9999}} {{999}}",
                "obfuscate": false,
                "preferredInputType": "IntegerKeyboard",
                "formElement": { "type": "text" }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_decode_field() {
        let field = card_number();
        assert_eq!(field.field_type, FieldType::NumericString);
        assert!(field.is_required());
        assert_eq!(field.display_hints.display_order, 10);
        assert_eq!(
            field.display_hints.form_element.as_ref().map(|f| f.element_type.as_str()),
            Some("text")
        );
    }

    #[test]
    fn test_unknown_field_type_is_rejected() {
        let result = serde_json::from_value::<PaymentProductField>(json!({
            "id": "x", "type": "hologram"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_mask_roundtrip() {
        let field = card_number();
        let masked = field.apply_mask("4567350000427977");
        assert_eq!(masked, "4567 3500 0042 7977");
        assert_eq!(field.remove_mask(&masked), "4567350000427977");
    }

    #[test]
    fn test_display_value_obfuscates() {
        let cvv: PaymentProductField = serde_json::from_value(json!({
            "id": "cvv",
            "type": "numericstring",
            "displayHints": { "obfuscate": true, "mask": "{{9999}}" }
        }))
        .unwrap();
        assert_eq!(cvv.display_value("123"), "***");
        assert_eq!(card_number().display_value("45673500"), "4567 3500");
    }

    #[test]
    fn test_validate_masked_value() {
        let field = card_number();
        let values = BTreeMap::new();
        let ctx = ValidationContext::new(&values);
        assert!(field.validate("4567 3500 0042 7977", &ctx).is_empty());
        assert_eq!(
            field.validate("", &ctx),
            vec![ValidationError::new("cardNumber", ValidationRule::Required)]
        );
        let errors = field.validate("4567 3500 0042 7978", &ctx);
        assert_eq!(errors, vec![ValidationError::new("cardNumber", ValidationRule::Luhn)]);
    }
}
