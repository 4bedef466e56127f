//! Validate command - check field values against a payment product

use anyhow::{bail, Result};
use chrono::NaiveDate;
use std::path::Path;

use crate::ui;

#[tracing::instrument(skip(fields))]
pub fn run(
    product_path: &Path,
    account_id: Option<&str>,
    fields: &[(String, String)],
    today: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let product = super::load_product(product_path)?;
    let request = super::build_request(product, account_id, fields, false)?;
    let errors = match today {
        Some(today) => request.validate_at(today),
        None => request.validate(),
    };

    if json {
        ui::json(&serde_json::json!({
            "valid": errors.is_empty(),
            "errors": errors,
        }));
    } else {
        ui::header(&format!("Payment product {}", request.product().id()));
        for field in request.product().fields_in_display_order() {
            let shown = if request.is_read_only(&field.id) {
                "(from account on file)".to_string()
            } else {
                request
                    .value(&field.id)
                    .map(|v| field.display_value(v))
                    .unwrap_or_default()
            };
            ui::key_value(&field.id, &shown);
        }
        ui::separator();

        if errors.is_empty() {
            ui::success("All fields are valid");
        } else {
            for error in &errors {
                ui::error(&format!("{} ({})", error, error.message_id()));
            }
        }
    }

    if !errors.is_empty() {
        bail!("{} field(s) failed validation", errors.len());
    }
    Ok(())
}
