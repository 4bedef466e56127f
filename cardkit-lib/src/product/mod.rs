//! Payment products.
//!
//! The client API lists the payment products available in a payment
//! context as [`BasicPaymentProducts`]. Fetching one product by id returns a
//! full [`PaymentProduct`], which adds the fields the customer has to fill in.

mod field;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::account_on_file::{AccountOnFile, AccountsOnFile};
use crate::decode::{decode_or_log, lenient_vec};
use crate::PaymentProductId;

pub use field::{
    DataRestrictions, FieldDisplayHints, FieldType, FormElement, PaymentProductField, Tooltip,
    ValueMappingItem,
};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDisplayHints {
    #[serde(default)]
    pub display_order: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

/// A payment product as listed for a payment context.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicPaymentProduct {
    pub id: PaymentProductId,
    pub payment_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_product_group: Option<String>,
    #[serde(default)]
    pub allows_recurring: bool,
    #[serde(default)]
    pub allows_tokenization: bool,
    #[serde(default)]
    pub auto_tokenized: bool,
    #[serde(default)]
    pub display_hints: ProductDisplayHints,
    #[serde(default)]
    pub accounts_on_file: AccountsOnFile,
}

impl BasicPaymentProduct {
    /// Stored account of this product with the given identifier.
    pub fn account_on_file(&self, id: &str) -> Option<&AccountOnFile> {
        self.accounts_on_file.get(id)
    }
}

/// A payment product together with its input fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentProduct {
    #[serde(flatten)]
    pub basic: BasicPaymentProduct,
    #[serde(default)]
    pub fields: Vec<PaymentProductField>,
}

impl PaymentProduct {
    /// Decode a payment product document, logging and returning `None` on failure.
    pub fn from_json(value: Value) -> Option<Self> {
        decode_or_log(value, "payment product")
    }

    pub fn id(&self) -> PaymentProductId {
        self.basic.id
    }

    pub fn field(&self, id: &str) -> Option<&PaymentProductField> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Fields ordered for display. Ties keep the server order.
    pub fn fields_in_display_order(&self) -> Vec<&PaymentProductField> {
        let mut fields: Vec<&PaymentProductField> = self.fields.iter().collect();
        fields.sort_by_key(|f| f.display_hints.display_order);
        fields
    }

    pub fn accounts_on_file(&self) -> &AccountsOnFile {
        &self.basic.accounts_on_file
    }
}

/// The payment products available for a payment context.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicPaymentProducts {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub payment_products: Vec<BasicPaymentProduct>,
}

impl BasicPaymentProducts {
    /// Decode a product list document, logging and returning `None` on failure.
    ///
    /// Individual products that do not decode are dropped from the list.
    pub fn from_json(value: Value) -> Option<Self> {
        decode_or_log(value, "payment product list")
    }

    pub fn get(&self, id: PaymentProductId) -> Option<&BasicPaymentProduct> {
        self.payment_products.iter().find(|p| p.id == id)
    }

    /// Products ordered for display. Ties keep the server order.
    pub fn in_display_order(&self) -> Vec<&BasicPaymentProduct> {
        let mut products: Vec<&BasicPaymentProduct> = self.payment_products.iter().collect();
        products.sort_by_key(|p| p.display_hints.display_order);
        products
    }

    /// Every account on file across all products.
    pub fn accounts_on_file(&self) -> AccountsOnFile {
        AccountsOnFile::dedup(
            self.payment_products
                .iter()
                .flat_map(|p| p.accounts_on_file.iter().cloned()),
        )
    }

    pub fn len(&self) -> usize {
        self.payment_products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payment_products.is_empty()
    }
}
