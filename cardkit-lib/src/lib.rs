//! Cardkit library.
//!
//! Client-side building blocks for card payments: decode the payment
//! products a merchant offers, collect and validate the customer's input
//! with each field's mask and data restrictions, reuse stored accounts on
//! file, and encrypt the result for the payment platform.
//!
//! The library never sees a card number in the clear once it has been
//! encrypted, and it never stores anything.
//!
//! # Features
//!
//! - **Payment products**: Decode product lists and product details, including fields
//! - **Masking**: Apply and strip display masks such as `{{9999}} {{9999}}`
//! - **Validation**: Luhn, expiry date, length, range, pattern, IBAN and more
//! - **Accounts on file**: Decide which fields are fixed, editable or must be re-entered
//! - **Encryption**: Seal customer input to the platform's public key
//! - **Client session**: Async access to the client API (`http-client` feature)
//!
//! # Example
//!
//! ```ignore
//! use cardkit_lib::prelude::*;
//!
//! let session = Session::connect(SessionConfig::from_env()?)?;
//! let context = PaymentContext::new(1000, "EUR", "NL");
//!
//! let product = session.payment_product(PaymentProductId(1), &context).await?;
//! let mut request = PaymentRequest::new(product);
//! request.set_value("cardNumber", "4567 3500 0042 7977")?;
//! request.set_value("expiryDate", "12/30")?;
//! request.set_value("cvv", "123")?;
//!
//! let prepared = session.prepare_payment_request(&request).await?;
//! // Hand prepared.encrypted_customer_input to the merchant server.
//! ```

pub mod account_on_file;
pub mod client;
pub mod config;
pub mod context;
mod decode;
pub mod encryption;
pub mod errors;
pub mod formatter;
pub mod iin;
pub mod meta;
pub mod prelude;
pub mod prepare;
pub mod product;
pub mod reconcile;
pub mod request;
pub mod validation;

/// Test utilities for payment testing.
///
/// This module is only available with the `test-utils` feature or in test builds.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use errors::{CardkitError, CardkitErrorCode};

/// Common result alias for cardkit operations.
pub type Result<T> = std::result::Result<T, CardkitError>;

/// Identifier of a payment product (e.g. `1` for VISA).
///
/// # Example
///
/// ```
/// use cardkit_lib::PaymentProductId;
///
/// let visa: PaymentProductId = 1.into();
/// assert_eq!(visa, PaymentProductId(1));
/// assert_eq!(visa.to_string(), "1");
/// ```
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct PaymentProductId(pub u32);

impl PaymentProductId {
    /// Get the numeric id.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl From<u32> for PaymentProductId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::str::FromStr for PaymentProductId {
    type Err = CardkitError;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse()
            .map(Self)
            .map_err(|e| CardkitError::invalid_data("paymentProductId", format!("{e}")))
    }
}

impl std::fmt::Display for PaymentProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_product_id_parse() {
        assert_eq!("3".parse::<PaymentProductId>().unwrap(), PaymentProductId(3));
        assert_eq!(" 809 ".parse::<PaymentProductId>().unwrap().get(), 809);
        let err = "visa".parse::<PaymentProductId>().unwrap_err();
        assert_eq!(err.code(), CardkitErrorCode::InvalidData);
    }

    #[test]
    fn test_payment_product_id_json() {
        let id: PaymentProductId = serde_json::from_str("1").unwrap();
        assert_eq!(id, PaymentProductId(1));
        assert_eq!(serde_json::to_string(&id).unwrap(), "1");
    }
}
