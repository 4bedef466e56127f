//! Accounts command - list the accounts on file of a product list

use anyhow::Result;
use cardkit_lib::account_on_file::AccountOnFile;
use std::path::Path;

use crate::ui;

/// One line per account: id, product and display label.
pub fn summarize(account: &AccountOnFile) -> serde_json::Value {
    serde_json::json!({
        "id": account.id(),
        "paymentProductId": account.payment_product_id(),
        "label": account.label(),
        "mustWrite": account
            .required_attributes()
            .iter()
            .map(|a| a.key())
            .collect::<Vec<_>>(),
    })
}

pub fn run(products_path: &Path, json: bool) -> Result<()> {
    let products = super::load_products(products_path)?;
    let accounts = products.accounts_on_file();

    if json {
        ui::json(&serde_json::Value::Array(
            accounts.iter().map(summarize).collect(),
        ));
        return Ok(());
    }

    ui::header("Accounts on file");
    if accounts.is_empty() {
        ui::info("No accounts on file");
        return Ok(());
    }

    for account in &accounts {
        let product = products
            .get(account.payment_product_id())
            .and_then(|p| p.display_hints.label.clone())
            .unwrap_or_else(|| account.payment_product_id().to_string());
        ui::key_value(account.id(), &format!("{} {}", product, account.label()));

        let required = account.required_attributes();
        if !required.is_empty() {
            let keys: Vec<&str> = required.iter().map(|a| a.key()).collect();
            ui::warning(&format!("  must re-enter: {}", keys.join(", ")));
        }
    }
    ui::separator();
    ui::success(&format!("{} account(s)", accounts.len()));
    Ok(())
}
