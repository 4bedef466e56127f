//! Issuer identification number (IIN) lookups.
//!
//! The first digits of a card number identify the issuing payment product.
//! A lookup needs at least [`MIN_IIN_DIGITS`] digits; the session sends only
//! the prefix, never the full card number.

use serde::{Deserialize, Serialize};

use crate::context::PaymentContext;
use crate::PaymentProductId;

/// Fewest digits a lookup can be made with.
pub const MIN_IIN_DIGITS: usize = 6;

/// Card numbers at least this long send an eight-digit prefix.
const LONG_PREFIX_FROM: usize = 16;
const LONG_PREFIX_LEN: usize = 8;

/// Outcome of an IIN lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IinStatus {
    /// The product is known and allowed in the payment context.
    Supported,
    /// No product matches the prefix.
    Unknown,
    /// Fewer than [`MIN_IIN_DIGITS`] digits were entered.
    NotEnoughDigits,
    /// The product is known but not offered in this payment context.
    ExistingButNotAllowed,
}

/// Co-brand of a card, e.g. a local scheme next to VISA.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IinDetail {
    pub payment_product_id: PaymentProductId,
    #[serde(default)]
    pub is_allowed_in_context: bool,
}

/// Result of [`Session::iin_details`](crate::client::Session::iin_details).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IinDetailsResponse {
    #[serde(default)]
    pub payment_product_id: Option<PaymentProductId>,
    #[serde(default = "default_status")]
    pub status: IinStatus,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub is_allowed_in_context: bool,
    #[serde(default)]
    pub co_brands: Vec<IinDetail>,
}

fn default_status() -> IinStatus {
    IinStatus::Supported
}

impl IinDetailsResponse {
    /// A response carrying only a status.
    pub fn with_status(status: IinStatus) -> Self {
        Self {
            payment_product_id: None,
            status,
            country_code: None,
            is_allowed_in_context: false,
            co_brands: Vec::new(),
        }
    }

    /// Derive the status of a successful server response, which carries
    /// only `isAllowedInContext`.
    pub(crate) fn resolve_status(mut self) -> Self {
        self.status = if self.is_allowed_in_context {
            IinStatus::Supported
        } else {
            IinStatus::ExistingButNotAllowed
        };
        self
    }

    /// Whether the payment can go ahead with [`Self::payment_product_id`].
    pub fn is_supported(&self) -> bool {
        self.status == IinStatus::Supported
    }
}

/// Body of the `getIINdetails` request.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IinDetailsRequest<'a> {
    pub bin: String,
    pub payment_context: &'a PaymentContext,
}

/// Prefix of `partial_card_number` to look up, or `None` when fewer than
/// [`MIN_IIN_DIGITS`] digits are present. Spaces and other separators are
/// ignored.
///
/// ```
/// use cardkit_lib::iin::iin_prefix;
///
/// assert_eq!(iin_prefix("4567 35").as_deref(), Some("456735"));
/// assert_eq!(iin_prefix("4567 3500 0042 7977").as_deref(), Some("45673500"));
/// assert_eq!(iin_prefix("4567"), None);
/// ```
pub fn iin_prefix(partial_card_number: &str) -> Option<String> {
    let digits: String = partial_card_number
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    if digits.len() < MIN_IIN_DIGITS {
        return None;
    }
    let len = if digits.len() >= LONG_PREFIX_FROM {
        LONG_PREFIX_LEN
    } else {
        MIN_IIN_DIGITS
    };
    Some(digits[..len].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prefix_lengths() {
        assert_eq!(iin_prefix("45673"), None);
        assert_eq!(iin_prefix("456735000042797").as_deref(), Some("456735"));
        assert_eq!(iin_prefix("4567350000427977").as_deref(), Some("45673500"));
        assert_eq!(iin_prefix("45-67-35").as_deref(), Some("456735"));
    }

    #[test]
    fn test_decode_server_response() {
        let response: IinDetailsResponse = serde_json::from_value(json!({
            "paymentProductId": 3,
            "countryCode": "NL",
            "isAllowedInContext": false,
            "coBrands": [{ "paymentProductId": 117, "isAllowedInContext": true }]
        }))
        .unwrap();
        let response = response.resolve_status();
        assert_eq!(response.status, IinStatus::ExistingButNotAllowed);
        assert!(!response.is_supported());
        assert_eq!(response.co_brands[0].payment_product_id, PaymentProductId(117));
    }

    #[test]
    fn test_status_names() {
        assert_eq!(
            serde_json::to_value(IinStatus::NotEnoughDigits).unwrap(),
            json!("NOT_ENOUGH_DIGITS")
        );
        let status: IinStatus = serde_json::from_value(json!("EXISTING_BUT_NOT_ALLOWED")).unwrap();
        assert_eq!(status, IinStatus::ExistingButNotAllowed);
    }

    #[test]
    fn test_request_body() {
        let ctx = PaymentContext::new(100, "EUR", "NL");
        let body = serde_json::to_value(IinDetailsRequest {
            bin: "456735".into(),
            payment_context: &ctx,
        })
        .unwrap();
        assert_eq!(body["bin"], "456735");
        assert_eq!(body["paymentContext"]["countryCode"], "NL");
    }
}
