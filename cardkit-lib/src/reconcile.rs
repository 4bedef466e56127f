//! Reconciliation of a payment product's fields with an account on file.
//!
//! When a returning customer pays with a stored account, most fields are
//! already known. This module works out, field by field, what is fixed,
//! what is prefilled but editable, and what still has to be asked for.

use serde::Serialize;

use crate::account_on_file::{AccountOnFile, AttributeStatus};
use crate::product::{PaymentProduct, PaymentProductField};

/// How a field may be treated when paying with an account on file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldAccess {
    /// Stored value is used; the customer cannot change it.
    ReadOnly,
    /// The customer may enter or change the value.
    Writable,
    /// The stored value is unusable and has to be entered again.
    MustWrite,
}

impl From<AttributeStatus> for FieldAccess {
    fn from(status: AttributeStatus) -> Self {
        match status {
            AttributeStatus::ReadOnly => Self::ReadOnly,
            AttributeStatus::CanWrite => Self::Writable,
            AttributeStatus::MustWrite => Self::MustWrite,
        }
    }
}

/// Reconciled state of one payment product field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledField {
    pub field_id: String,
    pub access: FieldAccess,
    /// Stored value formatted for display, when the account carries one that
    /// is still usable.
    pub prefilled: Option<String>,
    /// Whether the customer has to provide a value before paying.
    pub needs_input: bool,
}

/// Reconcile every field of `product`, in display order, with `account`.
pub fn reconcile(product: &PaymentProduct, account: &AccountOnFile) -> Vec<ReconciledField> {
    product
        .fields_in_display_order()
        .into_iter()
        .map(|field| reconcile_field(field, account))
        .collect()
}

/// Reconcile a single field with `account`.
pub fn reconcile_field(field: &PaymentProductField, account: &AccountOnFile) -> ReconciledField {
    let access = account
        .attribute(&field.id)
        .map(|a| FieldAccess::from(a.status()))
        .unwrap_or(FieldAccess::Writable);

    let prefilled = match access {
        FieldAccess::MustWrite => None,
        _ => account.masked_value(&field.id).filter(|v| !v.is_empty()),
    };

    let needs_input = match access {
        FieldAccess::ReadOnly => false,
        FieldAccess::MustWrite => true,
        FieldAccess::Writable => field.is_required() && prefilled.is_none(),
    };

    ReconciledField {
        field_id: field.id.clone(),
        access,
        prefilled,
        needs_input,
    }
}

/// Ids of the fields the customer still has to fill in.
pub fn fields_needing_input(product: &PaymentProduct, account: &AccountOnFile) -> Vec<String> {
    reconcile(product, account)
        .into_iter()
        .filter(|f| f.needs_input)
        .map(|f| f.field_id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product() -> PaymentProduct {
        PaymentProduct::from_json(json!({
            "id": 1,
            "paymentMethod": "card",
            "fields": [
                { "id": "cardNumber", "type": "numericstring",
                  "dataRestrictions": { "isRequired": true },
                  "displayHints": { "displayOrder": 10, "mask": "{{9999}} {{9999}} {{9999}} {{9999}}" } },
                { "id": "expiryDate", "type": "expirydate",
                  "dataRestrictions": { "isRequired": true },
                  "displayHints": { "displayOrder": 20 } },
                { "id": "cvv", "type": "numericstring",
                  "dataRestrictions": { "isRequired": true },
                  "displayHints": { "displayOrder": 24 } },
                { "id": "cardholderName", "type": "string",
                  "dataRestrictions": { "isRequired": false },
                  "displayHints": { "displayOrder": 30 } }
            ]
        }))
        .unwrap()
    }

    fn account() -> AccountOnFile {
        AccountOnFile::from_json(json!({
            "id": "7",
            "paymentProductId": 1,
            "displayHints": { "labelTemplate": [{ "attributeKey": "cardNumber", "mask": "{{9999}} {{9999}} {{9999}} {{9999}}" }] },
            "attributes": [
                { "key": "cardNumber", "value": "************7977", "status": "READ_ONLY" },
                { "key": "expiryDate", "value": "1220", "status": "MUST_WRITE", "mustWriteReason": "IN_THE_PAST" },
                { "key": "cardholderName", "value": "Jan Jansen", "status": "CAN_WRITE" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_reconcile_fields() {
        let fields = reconcile(&product(), &account());
        assert_eq!(fields.len(), 4);

        assert_eq!(fields[0].field_id, "cardNumber");
        assert_eq!(fields[0].access, FieldAccess::ReadOnly);
        assert_eq!(fields[0].prefilled.as_deref(), Some("**** **** **** 7977"));
        assert!(!fields[0].needs_input);

        assert_eq!(fields[1].access, FieldAccess::MustWrite);
        assert!(fields[1].prefilled.is_none());
        assert!(fields[1].needs_input);

        assert_eq!(fields[2].field_id, "cvv");
        assert_eq!(fields[2].access, FieldAccess::Writable);
        assert!(fields[2].needs_input);

        assert_eq!(fields[3].access, FieldAccess::Writable);
        assert_eq!(fields[3].prefilled.as_deref(), Some("Jan Jansen"));
        assert!(!fields[3].needs_input);
    }

    #[test]
    fn test_fields_needing_input() {
        assert_eq!(
            fields_needing_input(&product(), &account()),
            vec!["expiryDate".to_string(), "cvv".to_string()]
        );
    }
}
