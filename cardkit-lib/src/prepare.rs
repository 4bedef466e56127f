//! Preparation of a payment request for submission.
//!
//! The merchant server never sees the customer's card data: the request's
//! values are serialized together with the session id and a fresh nonce,
//! sealed to the platform's public key, and handed over as an opaque string.

use chrono::NaiveDate;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::encryption::{CustomerInputEncryptor, PublicKeyResponse};
use crate::meta::ClientMetaInfo;
use crate::request::PaymentRequest;
use crate::validation::ValidationError;
use crate::{CardkitError, PaymentProductId, Result};

const NONCE_BYTES: usize = 16;

/// Output of preparation, forwarded to the merchant server as is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedPaymentRequest {
    pub encrypted_customer_input: String,
    pub encoded_client_meta_info: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentValue {
    pub key: String,
    pub value: String,
}

/// Plaintext sealed into `encryptedCustomerInput`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    pub client_session_id: String,
    pub nonce: String,
    pub payment_product_id: PaymentProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_on_file_id: Option<String>,
    #[serde(default)]
    pub tokenize: bool,
    pub payment_values: Vec<PaymentValue>,
}

impl CustomerInput {
    /// Collect the submittable values of `request`.
    pub fn from_request(client_session_id: &str, request: &PaymentRequest) -> Self {
        let mut nonce = [0u8; NONCE_BYTES];
        rand::thread_rng().fill_bytes(&mut nonce);

        Self {
            client_session_id: client_session_id.to_string(),
            nonce: hex::encode(nonce),
            payment_product_id: request.product().id(),
            account_on_file_id: request.account_on_file().map(|a| a.id().to_string()),
            tokenize: request.tokenize(),
            payment_values: request
                .unmasked_field_values()
                .into_iter()
                .map(|(key, value)| PaymentValue { key, value })
                .collect(),
        }
    }
}

/// Seals payment requests for one client session and public key.
pub struct PaymentRequestPreparer {
    client_session_id: String,
    meta: ClientMetaInfo,
    encryptor: CustomerInputEncryptor,
}

impl PaymentRequestPreparer {
    pub fn new(
        client_session_id: impl Into<String>,
        meta: ClientMetaInfo,
        public_key: &PublicKeyResponse,
    ) -> Result<Self> {
        Ok(Self {
            client_session_id: client_session_id.into(),
            meta,
            encryptor: CustomerInputEncryptor::new(public_key)?,
        })
    }

    pub fn key_id(&self) -> &str {
        self.encryptor.key_id()
    }

    /// Validate and seal `request`.
    ///
    /// Fails with [`CardkitError::ValidationFailed`] when any field is invalid.
    pub fn prepare(&self, request: &PaymentRequest) -> Result<PreparedPaymentRequest> {
        self.seal(request, request.validate())
    }

    /// [`Self::prepare`] with an explicit reference date for expiry checks.
    pub fn prepare_at(
        &self,
        request: &PaymentRequest,
        today: NaiveDate,
    ) -> Result<PreparedPaymentRequest> {
        self.seal(request, request.validate_at(today))
    }

    fn seal(
        &self,
        request: &PaymentRequest,
        errors: Vec<ValidationError>,
    ) -> Result<PreparedPaymentRequest> {
        if !errors.is_empty() {
            tracing::debug!(
                product = %request.product().id(),
                errors = errors.len(),
                "refusing to prepare invalid payment request"
            );
            return Err(CardkitError::ValidationFailed(errors));
        }

        let input = CustomerInput::from_request(&self.client_session_id, request);
        tracing::debug!(
            product = %input.payment_product_id,
            account_on_file = ?input.account_on_file_id,
            values = input.payment_values.len(),
            key_id = self.key_id(),
            "preparing payment request"
        );

        let plaintext = zeroize::Zeroizing::new(serde_json::to_vec(&input)?);
        Ok(PreparedPaymentRequest {
            encrypted_customer_input: self.encryptor.encrypt(&plaintext)?,
            encoded_client_meta_info: self.meta.encode()?,
        })
    }
}
