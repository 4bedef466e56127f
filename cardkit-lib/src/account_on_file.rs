//! Accounts on file.
//!
//! An account on file is a payment instrument a returning customer stored
//! earlier. The server sends it partially masked, together with the status of
//! each attribute: whether it is fixed (`READ_ONLY`), may be changed
//! (`CAN_WRITE`), or has to be entered again before the account can be used
//! (`MUST_WRITE`, e.g. an expired card's expiry date).
//!
//! # Example
//!
//! ```
//! use cardkit_lib::account_on_file::AccountOnFile;
//!
//! let account = AccountOnFile::from_json(serde_json::json!({
//!     "id": 1234,
//!     "paymentProductId": 1,
//!     "displayHints": {
//!         "labelTemplate": [{ "attributeKey": "alias", "mask": "{{9999}} {{9999}} {{9999}} {{9999}}" }]
//!     },
//!     "attributes": [
//!         { "key": "alias", "value": "************7977", "status": "READ_ONLY" },
//!         { "key": "cardNumber", "value": "************7977", "status": "READ_ONLY" },
//!         { "key": "expiryDate", "value": "1220", "status": "MUST_WRITE", "mustWriteReason": "IN_THE_PAST" }
//!     ]
//! }))
//! .expect("valid account on file");
//!
//! assert_eq!(account.value("cardNumber"), Some("************7977"));
//! assert!(!account.is_writable("cardNumber"));
//! assert_eq!(account.required_attributes().len(), 1);
//! assert_eq!(account.label(), "**** **** **** 7977");
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decode::{decode_or_log, lenient_vec, string_or_number};
use crate::formatter::apply_mask;
use crate::{CardkitError, PaymentProductId, Result};

/// Writability of a stored attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeStatus {
    /// Stored value is used as is and cannot be changed.
    ReadOnly,
    /// Stored value may be overwritten.
    CanWrite,
    /// Value has to be collected again.
    MustWrite,
}

/// A single stored attribute of an account on file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountOnFileAttribute {
    key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    status: AttributeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    must_write_reason: Option<String>,
}

impl AccountOnFileAttribute {
    /// Create an attribute.
    pub fn new(key: impl Into<String>, value: Option<String>, status: AttributeStatus) -> Self {
        Self {
            key: key.into(),
            value,
            status,
            must_write_reason: None,
        }
    }

    /// Attach the reason a must-write attribute has to be re-entered.
    pub fn with_must_write_reason(mut self, reason: impl Into<String>) -> Self {
        self.must_write_reason = Some(reason.into());
        self
    }

    /// Payment product field id this attribute belongs to.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Stored value, masked by the server where sensitive.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn status(&self) -> AttributeStatus {
        self.status
    }

    pub fn must_write_reason(&self) -> Option<&str> {
        self.must_write_reason.as_deref()
    }

    pub fn is_read_only(&self) -> bool {
        self.status == AttributeStatus::ReadOnly
    }

    pub fn is_writable(&self) -> bool {
        !self.is_read_only()
    }

    /// True when the value has to be collected again.
    pub fn is_required(&self) -> bool {
        self.status == AttributeStatus::MustWrite
    }
}

/// One element of an account's display label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelTemplateElement {
    pub attribute_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<String>,
}

/// How an account on file is presented.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountOnFileDisplayHints {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub label_template: Vec<LabelTemplateElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl AccountOnFileDisplayHints {
    /// Label mask configured for `attribute_key`.
    pub fn mask_for(&self, attribute_key: &str) -> Option<&str> {
        self.label_template
            .iter()
            .find(|e| e.attribute_key == attribute_key)
            .and_then(|e| e.mask.as_deref())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountOnFileDocument {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    payment_product_id: PaymentProductId,
    #[serde(default)]
    display_hints: AccountOnFileDisplayHints,
    #[serde(default)]
    attributes: Vec<AccountOnFileAttribute>,
}

impl TryFrom<AccountOnFileDocument> for AccountOnFile {
    type Error = CardkitError;

    fn try_from(doc: AccountOnFileDocument) -> Result<Self> {
        AccountOnFile::new(
            doc.id,
            doc.payment_product_id,
            doc.attributes,
            doc.display_hints,
        )
    }
}

/// A stored, partially masked payment instrument of a returning customer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "AccountOnFileDocument")]
pub struct AccountOnFile {
    id: String,
    payment_product_id: PaymentProductId,
    display_hints: AccountOnFileDisplayHints,
    attributes: Vec<AccountOnFileAttribute>,
}

impl AccountOnFile {
    /// Build an account on file. Attribute keys must be unique.
    pub fn new(
        id: impl Into<String>,
        payment_product_id: PaymentProductId,
        attributes: Vec<AccountOnFileAttribute>,
        display_hints: AccountOnFileDisplayHints,
    ) -> Result<Self> {
        let id = id.into();
        let mut seen = HashSet::new();
        if let Some(dup) = attributes.iter().find(|a| !seen.insert(a.key.as_str())) {
            return Err(CardkitError::decode(
                "account on file",
                format!("duplicate attribute '{}' in account {}", dup.key, id),
            ));
        }
        Ok(Self {
            id,
            payment_product_id,
            display_hints,
            attributes,
        })
    }

    /// Decode an account on file from an API document.
    ///
    /// Returns `None` (and logs the reason) when the document is missing a
    /// required key, carries an unknown attribute status, or repeats a key.
    pub fn from_json(value: Value) -> Option<Self> {
        decode_or_log(value, "account on file")
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn payment_product_id(&self) -> PaymentProductId {
        self.payment_product_id
    }

    pub fn display_hints(&self) -> &AccountOnFileDisplayHints {
        &self.display_hints
    }

    /// Attributes in the order the server sent them.
    pub fn attributes(&self) -> &[AccountOnFileAttribute] {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&AccountOnFileAttribute> {
        self.attributes.iter().find(|a| a.key == key)
    }

    /// Stored value of `key` as sent by the server.
    ///
    /// Sensitive values such as the card number are stored masked and are
    /// returned masked.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.attribute(key).and_then(AccountOnFileAttribute::value)
    }

    /// Stored value of `key` formatted with its label-template mask.
    pub fn masked_value(&self, key: &str) -> Option<String> {
        let value = self.value(key)?;
        Some(match self.display_hints.mask_for(key) {
            Some(mask) if !mask.is_empty() => apply_mask(mask, value),
            _ => value.to_string(),
        })
    }

    pub fn has_value(&self, key: &str) -> bool {
        self.value(key).is_some_and(|v| !v.is_empty())
    }

    /// False only for attributes stored read-only; fields the account does
    /// not carry are writable.
    pub fn is_writable(&self, key: &str) -> bool {
        self.attribute(key)
            .map(AccountOnFileAttribute::is_writable)
            .unwrap_or(true)
    }

    pub fn is_read_only(&self, key: &str) -> bool {
        !self.is_writable(key)
    }

    /// Attributes the customer has to enter again before reuse.
    pub fn required_attributes(&self) -> Vec<&AccountOnFileAttribute> {
        self.attributes.iter().filter(|a| a.is_required()).collect()
    }

    /// Display label built from the label template.
    pub fn label(&self) -> String {
        self.display_hints
            .label_template
            .iter()
            .filter_map(|element| self.masked_value(&element.attribute_key))
            .filter(|v| !v.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Accounts on file with unique identifiers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AccountsOnFile(Vec<AccountOnFile>);

impl AccountsOnFile {
    /// Build a collection, rejecting repeated identifiers.
    pub fn new(accounts: Vec<AccountOnFile>) -> Result<Self> {
        let mut seen = HashSet::new();
        if let Some(dup) = accounts.iter().find(|a| !seen.insert(a.id.as_str())) {
            return Err(CardkitError::invalid_data(
                "accountsOnFile",
                format!("duplicate account on file id {}", dup.id),
            ));
        }
        Ok(Self(accounts))
    }

    /// Build a collection keeping the first account for each identifier.
    pub fn dedup(accounts: impl IntoIterator<Item = AccountOnFile>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();
        for account in accounts {
            if seen.insert(account.id.clone()) {
                kept.push(account);
            } else {
                tracing::warn!(id = %account.id, "dropping duplicate account on file");
            }
        }
        Self(kept)
    }

    pub fn get(&self, id: &str) -> Option<&AccountOnFile> {
        self.0.iter().find(|a| a.id == id)
    }

    /// Accounts stored for one payment product.
    pub fn for_product(
        &self,
        product_id: PaymentProductId,
    ) -> impl Iterator<Item = &AccountOnFile> + '_ {
        self.0
            .iter()
            .filter(move |a| a.payment_product_id == product_id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AccountOnFile> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for AccountsOnFile {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let accounts: Vec<AccountOnFile> = lenient_vec(deserializer)?;
        Ok(Self::dedup(accounts))
    }
}

impl<'a> IntoIterator for &'a AccountsOnFile {
    type Item = &'a AccountOnFile;
    type IntoIter = std::slice::Iter<'a, AccountOnFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
