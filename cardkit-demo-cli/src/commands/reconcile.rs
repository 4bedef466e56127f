//! Reconcile command - show how an account on file prefills a product's fields

use anyhow::{anyhow, Result};
use cardkit_lib::reconcile::{reconcile, FieldAccess};
use std::path::Path;

use crate::ui;

pub fn run(product_path: &Path, account_id: &str, json: bool) -> Result<()> {
    let product = super::load_product(product_path)?;
    let account = product
        .accounts_on_file()
        .get(account_id)
        .ok_or_else(|| anyhow!("Account on file '{}' not found", account_id))?;

    let fields = reconcile(&product, account);

    if json {
        ui::json(&serde_json::to_value(&fields)?);
        return Ok(());
    }

    ui::header(&format!("Account {} ({})", account.id(), account.label()));
    for field in &fields {
        let access = match field.access {
            FieldAccess::ReadOnly => "read-only",
            FieldAccess::Writable => "writable",
            FieldAccess::MustWrite => "must re-enter",
        };
        let prefilled = field.prefilled.as_deref().unwrap_or("-");
        ui::key_value(&field.field_id, &format!("{access:<14} {prefilled}"));
    }

    ui::separator();
    let pending: Vec<&str> = fields
        .iter()
        .filter(|f| f.needs_input)
        .map(|f| f.field_id.as_str())
        .collect();
    if pending.is_empty() {
        ui::success("Nothing left to enter");
    } else {
        ui::info(&format!("Customer still has to enter: {}", pending.join(", ")));
    }
    Ok(())
}
