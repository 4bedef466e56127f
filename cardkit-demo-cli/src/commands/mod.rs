//! CLI command implementations

pub mod accounts;
pub mod encrypt;
pub mod keys;
pub mod mask;
pub mod online;
pub mod reconcile;
pub mod validate;

use anyhow::{anyhow, Context, Result};
use cardkit_lib::product::{BasicPaymentProducts, PaymentProduct};
use cardkit_lib::request::PaymentRequest;
use serde_json::Value;
use std::path::Path;

/// Parse a `key=value` field argument.
pub fn parse_field(arg: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{arg}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing field id in '{arg}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Read a JSON document from disk.
pub fn read_json(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Load a payment product document (with fields).
pub fn load_product(path: &Path) -> Result<PaymentProduct> {
    serde_json::from_value(read_json(path)?)
        .with_context(|| format!("{} is not a payment product", path.display()))
}

/// Load a payment product list document.
pub fn load_products(path: &Path) -> Result<BasicPaymentProducts> {
    serde_json::from_value(read_json(path)?)
        .with_context(|| format!("{} is not a payment product list", path.display()))
}

/// Build a payment request from command-line input.
pub fn build_request(
    product: PaymentProduct,
    account_id: Option<&str>,
    fields: &[(String, String)],
    tokenize: bool,
) -> Result<PaymentRequest> {
    let account = match account_id {
        Some(id) => Some(
            product
                .accounts_on_file()
                .get(id)
                .cloned()
                .ok_or_else(|| anyhow!("Account on file '{}' not found on product {}", id, product.id()))?,
        ),
        None => None,
    };

    let mut request = PaymentRequest::new(product).with_tokenize(tokenize);
    request.set_account_on_file(account)?;
    for (key, value) in fields {
        tracing::debug!(field = %key, "setting field value");
        request.set_value(key, value.as_str())?;
    }
    Ok(request)
}
