//! Online commands - query the client API of a live session
//!
//! The session is configured from `CARDKIT_*` environment variables.

use anyhow::{Context, Result};
use cardkit_lib::client::{HttpTransport, Session};
use cardkit_lib::config::SessionConfig;
use cardkit_lib::context::PaymentContext;
use cardkit_lib::iin::IinStatus;
use cardkit_lib::PaymentProductId;

use crate::ui;

fn connect() -> Result<Session<HttpTransport>> {
    let config = SessionConfig::from_env().context(
        "Set CARDKIT_CLIENT_SESSION_ID, CARDKIT_CUSTOMER_ID and CARDKIT_CLIENT_API_URL",
    )?;
    tracing::debug!(customer = %config.customer_id, url = %config.client_api_url, "connecting");
    Ok(Session::connect(config)?)
}

#[tracing::instrument(skip(context), fields(country = %context.country_code))]
pub async fn products(context: &PaymentContext, json: bool) -> Result<()> {
    let session = connect()?;
    let spinner = ui::spinner("Fetching payment products...");
    let result = session.basic_payment_products(context).await;
    spinner.finish_and_clear();
    let products = result?;

    if json {
        ui::json(&serde_json::to_value(&products)?);
        return Ok(());
    }

    ui::header("Payment products");
    for product in products.in_display_order() {
        let label = product.display_hints.label.as_deref().unwrap_or("");
        ui::key_value(
            &product.id.to_string(),
            &format!("{} [{}] {}", label, product.payment_method, session.logo_url(product).unwrap_or_default()),
        );
    }
    ui::separator();
    ui::success(&format!("{} product(s)", products.len()));
    Ok(())
}

#[tracing::instrument(skip(context))]
pub async fn product(id: PaymentProductId, context: &PaymentContext, json: bool) -> Result<()> {
    let session = connect()?;
    let product = session.payment_product(id, context).await?;

    if json {
        ui::json(&serde_json::to_value(&product)?);
        return Ok(());
    }

    ui::header(&format!(
        "Payment product {} {}",
        product.id(),
        product.basic.display_hints.label.as_deref().unwrap_or("")
    ));
    for field in product.fields_in_display_order() {
        let required = if field.is_required() { "required" } else { "optional" };
        let mask = field.display_hints.mask.as_deref().unwrap_or("-");
        ui::key_value(&field.id, &format!("{required:<9} mask {mask}"));
    }
    Ok(())
}

#[tracing::instrument(skip(partial_card_number, context))]
pub async fn iin(partial_card_number: &str, context: &PaymentContext, json: bool) -> Result<()> {
    let session = connect()?;
    let details = session.iin_details(partial_card_number, context).await?;

    if json {
        ui::json(&serde_json::to_value(&details)?);
        return Ok(());
    }

    match details.status {
        IinStatus::Supported => ui::success(&format!(
            "Payment product {}",
            details
                .payment_product_id
                .map(|id| id.to_string())
                .unwrap_or_default()
        )),
        IinStatus::ExistingButNotAllowed => {
            ui::warning("Card is known but not allowed for this payment")
        }
        IinStatus::NotEnoughDigits => ui::info("Enter at least six digits"),
        IinStatus::Unknown => ui::error("Unknown card"),
    }
    for co_brand in &details.co_brands {
        ui::key_value(
            "Co-brand",
            &format!("{} (allowed: {})", co_brand.payment_product_id, co_brand.is_allowed_in_context),
        );
    }
    Ok(())
}
