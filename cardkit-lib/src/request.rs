//! Payment requests.
//!
//! A [`PaymentRequest`] collects the values a customer enters for a payment
//! product, optionally on top of an account on file, and validates them
//! before they are encrypted.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::account_on_file::AccountOnFile;
use crate::product::{PaymentProduct, PaymentProductField};
use crate::validation::{ValidationContext, ValidationError};
use crate::{CardkitError, Result};

/// Values entered for one payment product.
#[derive(Clone, Debug)]
pub struct PaymentRequest {
    product: PaymentProduct,
    account_on_file: Option<AccountOnFile>,
    field_values: BTreeMap<String, String>,
    tokenize: bool,
}

impl PaymentRequest {
    /// Start an empty request for `product`.
    pub fn new(product: PaymentProduct) -> Self {
        Self {
            product,
            account_on_file: None,
            field_values: BTreeMap::new(),
            tokenize: false,
        }
    }

    /// Pay with a stored account. The account must belong to the product.
    pub fn with_account_on_file(mut self, account: AccountOnFile) -> Result<Self> {
        self.set_account_on_file(Some(account))?;
        Ok(self)
    }

    /// Ask the server to store the entered card as an account on file.
    pub fn with_tokenize(mut self, tokenize: bool) -> Self {
        self.tokenize = tokenize;
        self
    }

    pub fn set_account_on_file(&mut self, account: Option<AccountOnFile>) -> Result<()> {
        if let Some(account) = &account {
            if account.payment_product_id() != self.product.id() {
                return Err(CardkitError::invalid_data(
                    "accountOnFile",
                    format!(
                        "account {} belongs to payment product {}, not {}",
                        account.id(),
                        account.payment_product_id(),
                        self.product.id()
                    ),
                ));
            }
        }
        self.account_on_file = account;
        Ok(())
    }

    pub fn set_tokenize(&mut self, tokenize: bool) {
        self.tokenize = tokenize;
    }

    pub fn tokenize(&self) -> bool {
        self.tokenize
    }

    pub fn product(&self) -> &PaymentProduct {
        &self.product
    }

    pub fn account_on_file(&self) -> Option<&AccountOnFile> {
        self.account_on_file.as_ref()
    }

    /// Record the value entered for `field_id`, masked or not.
    ///
    /// Fields fixed by the account on file cannot be set.
    pub fn set_value(&mut self, field_id: &str, value: impl Into<String>) -> Result<()> {
        self.field(field_id)?;
        if self.is_read_only(field_id) {
            return Err(CardkitError::invalid_data(
                field_id,
                "value is fixed by the account on file",
            ));
        }
        self.field_values.insert(field_id.to_string(), value.into());
        Ok(())
    }

    pub fn remove_value(&mut self, field_id: &str) -> Option<String> {
        self.field_values.remove(field_id)
    }

    /// The value as entered.
    pub fn value(&self, field_id: &str) -> Option<&str> {
        self.field_values.get(field_id).map(String::as_str)
    }

    /// The entered value formatted with the field's mask.
    pub fn masked_value(&self, field_id: &str) -> Option<String> {
        let value = self.value(field_id)?;
        Some(match self.product.field(field_id) {
            Some(field) => field.apply_mask(value),
            None => value.to_string(),
        })
    }

    /// The entered value with display formatting removed, as submitted.
    pub fn unmasked_value(&self, field_id: &str) -> Option<String> {
        let value = self.value(field_id)?;
        Some(match self.product.field(field_id) {
            Some(field) => field.remove_mask(value),
            None => value.to_string(),
        })
    }

    /// Whether the account on file fixes the value of `field_id`.
    pub fn is_read_only(&self, field_id: &str) -> bool {
        self.account_on_file
            .as_ref()
            .is_some_and(|a| a.is_read_only(field_id))
    }

    /// Unmasked values to submit. Read-only account fields are left out;
    /// the server already has them.
    pub fn unmasked_field_values(&self) -> BTreeMap<String, String> {
        self.field_values
            .keys()
            .filter(|id| !self.is_read_only(id))
            .filter_map(|id| self.unmasked_value(id).map(|v| (id.clone(), v)))
            .collect()
    }

    /// Validate every field of the product against today's date.
    pub fn validate(&self) -> Vec<ValidationError> {
        let values = self.validation_values();
        self.validate_with(ValidationContext::new(&values))
    }

    /// Validate with an explicit reference date for expiry checks.
    pub fn validate_at(&self, today: NaiveDate) -> Vec<ValidationError> {
        let values = self.validation_values();
        self.validate_with(ValidationContext::new(&values).with_today(today))
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    fn validate_with(&self, ctx: ValidationContext<'_>) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for field in self.product.fields_in_display_order() {
            if self.is_read_only(&field.id) {
                continue;
            }
            let value = self.value(&field.id).unwrap_or_default();
            if value.is_empty() && self.stored_value_usable(&field.id) {
                continue;
            }
            errors.extend(field.validate(value, &ctx));
        }
        errors
    }

    /// Values rules may consult: what was entered, completed with the stored
    /// values of the account on file that stay in effect.
    fn validation_values(&self) -> BTreeMap<String, String> {
        let mut values = self.unmasked_field_values();
        if let Some(account) = &self.account_on_file {
            for attribute in account.attributes() {
                let key = attribute.key();
                let entered = values.get(key).is_some_and(|v| !v.is_empty());
                if entered || !self.stored_value_usable(key) {
                    continue;
                }
                if let Some(stored) = attribute.value() {
                    values.insert(key.to_string(), stored.to_string());
                }
            }
        }
        values
    }

    /// True when the account on file carries a value that need not be re-entered.
    fn stored_value_usable(&self, field_id: &str) -> bool {
        self.account_on_file.as_ref().is_some_and(|account| {
            account
                .attribute(field_id)
                .is_some_and(|a| !a.is_required() && a.value().is_some_and(|v| !v.is_empty()))
        })
    }

    fn field(&self, field_id: &str) -> Result<&PaymentProductField> {
        self.product
            .field(field_id)
            .ok_or_else(|| CardkitError::not_found("field", field_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationRule;
    use crate::CardkitErrorCode;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn product() -> PaymentProduct {
        PaymentProduct::from_json(json!({
            "id": 1,
            "paymentMethod": "card",
            "fields": [
                { "id": "cardNumber", "type": "numericstring",
                  "dataRestrictions": { "isRequired": true, "validators": {
                      "luhn": {}, "length": { "minLength": 12, "maxLength": 19 } } },
                  "displayHints": { "displayOrder": 10, "mask": "{{9999}} {{9999}} {{9999}} {{9999}} {{999}}" } },
                { "id": "expiryDate", "type": "expirydate",
                  "dataRestrictions": { "isRequired": true, "validators": { "expirationDate": {} } },
                  "displayHints": { "displayOrder": 20, "mask": "{{99}}-{{99}}" } },
                { "id": "cvv", "type": "numericstring",
                  "dataRestrictions": { "isRequired": true, "validators": {
                      "length": { "minLength": 3, "maxLength": 4 } } },
                  "displayHints": { "displayOrder": 24, "obfuscate": true } },
                { "id": "cardholderName", "type": "string",
                  "dataRestrictions": { "isRequired": false },
                  "displayHints": { "displayOrder": 30 } }
            ]
        }))
        .unwrap()
    }

    fn account(product_id: u32) -> AccountOnFile {
        AccountOnFile::from_json(json!({
            "id": "7",
            "paymentProductId": product_id,
            "attributes": [
                { "key": "cardNumber", "value": "************7977", "status": "READ_ONLY" },
                { "key": "expiryDate", "value": "1220", "status": "MUST_WRITE" },
                { "key": "cardholderName", "value": "Jan Jansen", "status": "CAN_WRITE" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_masked_and_unmasked_values() {
        let mut request = PaymentRequest::new(product());
        request.set_value("cardNumber", "4567350000427977").unwrap();
        request.set_value("expiryDate", "12-30").unwrap();

        assert_eq!(
            request.masked_value("cardNumber").as_deref(),
            Some("4567 3500 0042 7977")
        );
        assert_eq!(request.unmasked_value("expiryDate").as_deref(), Some("1230"));
        assert!(request.masked_value("cvv").is_none());
    }

    #[test]
    fn test_set_value_on_unknown_field() {
        let mut request = PaymentRequest::new(product());
        let err = request.set_value("iban", "NL91ABNA0417164300").unwrap_err();
        assert_eq!(err.code(), CardkitErrorCode::NotFound);
    }

    #[test]
    fn test_valid_new_card() {
        let mut request = PaymentRequest::new(product());
        request.set_value("cardNumber", "4567 3500 0042 7977").unwrap();
        request.set_value("expiryDate", "1230").unwrap();
        request.set_value("cvv", "123").unwrap();
        assert!(request.validate_at(today()).is_empty());
    }

    #[test]
    fn test_missing_required_fields() {
        let request = PaymentRequest::new(product());
        let errors = request.validate_at(today());
        let fields: Vec<&str> = errors.iter().map(|e| e.field_id.as_str()).collect();
        assert_eq!(fields, vec!["cardNumber", "expiryDate", "cvv"]);
        assert!(errors.iter().all(|e| e.rule == ValidationRule::Required));
    }

    #[test]
    fn test_account_on_file_must_belong_to_product() {
        let err = PaymentRequest::new(product())
            .with_account_on_file(account(3))
            .unwrap_err();
        assert_eq!(err.code(), CardkitErrorCode::InvalidData);
    }

    #[test]
    fn test_account_on_file_validation() {
        let mut request = PaymentRequest::new(product())
            .with_account_on_file(account(1))
            .unwrap();

        // Card number comes from the account; expiry is must-write; name is on file.
        let errors = request.validate_at(today());
        let fields: Vec<&str> = errors.iter().map(|e| e.field_id.as_str()).collect();
        assert_eq!(fields, vec!["expiryDate", "cvv"]);

        request.set_value("expiryDate", "1228").unwrap();
        request.set_value("cvv", "123").unwrap();
        assert!(request.validate_at(today()).is_empty());
    }

    #[test]
    fn test_read_only_fields_are_not_submitted() {
        let mut request = PaymentRequest::new(product())
            .with_account_on_file(account(1))
            .unwrap();
        assert!(request.is_read_only("cardNumber"));
        assert!(request.set_value("cardNumber", "4567350000427977").is_err());

        request.set_value("cvv", "123").unwrap();
        request.set_value("cardholderName", "J. Jansen").unwrap();
        let values = request.unmasked_field_values();
        assert!(!values.contains_key("cardNumber"));
        assert_eq!(values.get("cvv").map(String::as_str), Some("123"));
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_rules_see_read_only_account_values() {
        let product = PaymentProduct::from_json(json!({
            "id": 1503,
            "paymentMethod": "redirect",
            "fields": [
                { "id": "fiscalNumber", "type": "numericstring",
                  "dataRestrictions": { "isRequired": true, "validators": {
                      "length": { "minLength": 11, "maxLength": 14 } } },
                  "displayHints": { "displayOrder": 10 } },
                { "id": "companyName", "type": "string",
                  "dataRestrictions": { "isRequired": false, "validators": {
                      "boletoBancarioRequiredness": { "fragmentIndex": 1 } } },
                  "displayHints": { "displayOrder": 20 } }
            ]
        }))
        .unwrap();
        let account = AccountOnFile::from_json(json!({
            "id": "42",
            "paymentProductId": 1503,
            "attributes": [
                { "key": "fiscalNumber", "value": "12345678000190", "status": "READ_ONLY" }
            ]
        }))
        .unwrap();
        let mut request = PaymentRequest::new(product)
            .with_account_on_file(account)
            .unwrap();

        let errors = request.validate_at(today());
        assert_eq!(
            errors,
            vec![ValidationError::new(
                "companyName",
                ValidationRule::BoletoBancarioRequiredness
            )]
        );
        // The stored fiscal number is still not submitted.
        assert!(request.unmasked_field_values().is_empty());

        request.set_value("companyName", "Acme Ltda").unwrap();
        assert!(request.validate_at(today()).is_empty());
    }
}
