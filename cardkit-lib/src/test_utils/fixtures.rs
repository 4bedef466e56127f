//! Client API documents for tests.

use serde_json::{json, Value};

use crate::account_on_file::AccountOnFile;
use crate::product::{BasicPaymentProducts, PaymentProduct};

/// Card number used across fixtures. Passes the Luhn check.
pub const VISA_CARD_NUMBER: &str = "4567350000427977";

/// Card number masked the way the server stores it on an account.
pub const VISA_STORED_CARD_NUMBER: &str = "************7977";

pub const CARD_NUMBER_MASK: &str = "{{9999}} {{9999}} {{9999}} {{9999}} {{999}}";

/// Account on file for the VISA fixture: card number fixed, expiry date
/// expired and must be re-entered, cardholder name editable.
pub fn visa_account_on_file_json() -> Value {
    json!({
        "id": 7,
        "paymentProductId": 1,
        "displayHints": {
            "labelTemplate": [
                { "attributeKey": "cardNumber", "mask": "{{9999}} {{9999}} {{9999}} {{9999}}" },
                { "attributeKey": "expiryDate", "mask": "{{99}}/{{99}}" }
            ],
            "logo": "templates/master/global/css/img/ppimages/pp_logo_1_v1.png"
        },
        "attributes": [
            { "key": "cardNumber", "value": VISA_STORED_CARD_NUMBER, "status": "READ_ONLY" },
            { "key": "expiryDate", "value": "1220", "status": "MUST_WRITE", "mustWriteReason": "IN_THE_PAST" },
            { "key": "cardholderName", "value": "Jan Jansen", "status": "CAN_WRITE" }
        ]
    })
}

/// Full VISA product with its four card fields.
pub fn visa_product_json() -> Value {
    json!({
        "id": 1,
        "paymentMethod": "card",
        "paymentProductGroup": "cards",
        "allowsRecurring": true,
        "allowsTokenization": true,
        "autoTokenized": false,
        "displayHints": {
            "displayOrder": 0,
            "label": "VISA",
            "logo": "templates/master/global/css/img/ppimages/pp_logo_1_v1.png"
        },
        "accountsOnFile": [visa_account_on_file_json()],
        "fields": [
            {
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
                    "placeholderLabel": "**** **** **** ****",
                    "mask": CARD_NUMBER_MASK,
                    "alwaysShow": false,
                    "obfuscate": false,
                    "preferredInputType": "IntegerKeyboard",
                    "formElement": { "type": "text" }
                }
            },
            {
                "id": "expiryDate",
                "type": "expirydate",
                "dataRestrictions": {
                    "isRequired": true,
                    "validators": { "expirationDate": {} }
                },
                "displayHints": {
                    "displayOrder": 20,
                    "label": "Expiry date",
                    "placeholderLabel": "MM/YY",
                    "mask": "{{99}}/{{99}}",
                    "formElement": { "type": "text" }
                }
            },
            {
                "id": "cvv",
                "type": "numericstring",
                "dataRestrictions": {
                    "isRequired": true,
                    "validators": { "length": { "minLength": 3, "maxLength": 4 } }
                },
                "displayHints": {
                    "displayOrder": 24,
                    "label": "CVV",
                    "mask": "{{9999}}",
                    "obfuscate": true,
                    "tooltip": { "label": "The three digits on the back of your card" },
                    "formElement": { "type": "text" }
                }
            },
            {
                "id": "cardholderName",
                "type": "string",
                "dataRestrictions": {
                    "isRequired": false,
                    "validators": { "length": { "minLength": 2, "maxLength": 51 } }
                },
                "displayHints": {
                    "displayOrder": 30,
                    "label": "Cardholder name",
                    "formElement": { "type": "text" }
                }
            }
        ]
    })
}

/// Products available in an NL/EUR context: VISA and MasterCard.
pub fn product_list_json() -> Value {
    let mut visa = visa_product_json();
    if let Some(product) = visa.as_object_mut() {
        product.remove("fields");
    }
    json!({
        "paymentProducts": [
            visa,
            {
                "id": 3,
                "paymentMethod": "card",
                "paymentProductGroup": "cards",
                "allowsRecurring": true,
                "allowsTokenization": true,
                "displayHints": {
                    "displayOrder": 1,
                    "label": "MasterCard",
                    "logo": "templates/master/global/css/img/ppimages/pp_logo_3_v1.png"
                }
            }
        ]
    })
}

/// Decoded [`visa_product_json`].
///
/// # Panics
/// Panics if the fixture does not decode.
pub fn visa_product() -> PaymentProduct {
    PaymentProduct::from_json(visa_product_json()).expect("visa product fixture decodes")
}

/// Decoded [`visa_account_on_file_json`].
///
/// # Panics
/// Panics if the fixture does not decode.
pub fn visa_account_on_file() -> AccountOnFile {
    AccountOnFile::from_json(visa_account_on_file_json()).expect("account fixture decodes")
}

/// Decoded [`product_list_json`].
///
/// # Panics
/// Panics if the fixture does not decode.
pub fn product_list() -> BasicPaymentProducts {
    BasicPaymentProducts::from_json(product_list_json()).expect("product list fixture decodes")
}
