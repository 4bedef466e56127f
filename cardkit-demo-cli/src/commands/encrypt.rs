//! Encrypt command - prepare a payment request offline

use anyhow::{Context, Result};
use cardkit_lib::encryption::PublicKeyResponse;
use cardkit_lib::meta::ClientMetaInfo;
use cardkit_lib::prepare::{PaymentRequestPreparer, PreparedPaymentRequest};
use cardkit_lib::CardkitError;
use chrono::NaiveDate;
use std::path::Path;

use crate::ui;

/// Options for [`prepare`].
#[derive(Debug)]
pub struct EncryptOptions<'a> {
    pub product_path: &'a Path,
    pub public_key_path: &'a Path,
    pub account_id: Option<&'a str>,
    pub fields: &'a [(String, String)],
    pub tokenize: bool,
    pub session_id: &'a str,
    pub today: Option<NaiveDate>,
}

/// Validate and encrypt the request described by `options`.
pub fn prepare(options: &EncryptOptions<'_>) -> Result<PreparedPaymentRequest> {
    let product = super::load_product(options.product_path)?;
    let public_key: PublicKeyResponse = serde_json::from_value(super::read_json(
        options.public_key_path,
    )?)
    .with_context(|| format!("{} is not a public key", options.public_key_path.display()))?;

    let request = super::build_request(
        product,
        options.account_id,
        options.fields,
        options.tokenize,
    )?;
    let preparer = PaymentRequestPreparer::new(
        options.session_id,
        ClientMetaInfo::new(concat!("cardkit-demo/", env!("CARGO_PKG_VERSION"))),
        &public_key,
    )?;

    let prepared = match options.today {
        Some(today) => preparer.prepare_at(&request, today),
        None => preparer.prepare(&request),
    };
    Ok(prepared?)
}

pub fn run(options: &EncryptOptions<'_>, json: bool) -> Result<()> {
    let prepared = match prepare(options) {
        Ok(prepared) => prepared,
        Err(e) => {
            if let Some(CardkitError::ValidationFailed(errors)) = e.downcast_ref::<CardkitError>() {
                for error in errors {
                    ui::error(&error.to_string());
                }
            }
            return Err(e);
        }
    };

    if json {
        ui::json(&serde_json::to_value(&prepared)?);
    } else {
        ui::success("Payment request prepared");
        ui::key_value("encryptedCustomerInput", &prepared.encrypted_customer_input);
        ui::key_value("encodedClientMetaInfo", &prepared.encoded_client_meta_info);
        ui::separator();
        ui::info("Forward both values to the merchant server to create the payment");
    }
    Ok(())
}
