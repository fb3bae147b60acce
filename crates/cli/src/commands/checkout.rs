//! Checkout quote command.
//!
//! # Usage
//!
//! ```bash
//! parts-cli checkout quote --province "British Columbia"
//! ```

use parts_store_core::checkout::{CheckoutSummary, Province};
use parts_store_storefront::store::StoreClient;

use super::CliError;

/// Price the current cart.
///
/// Without a province no tax is applied, matching the checkout page before
/// a province is selected.
///
/// # Errors
///
/// Returns an error if the province is unknown or the cart cannot be fetched.
pub async fn quote(client: &StoreClient, province: Option<&str>) -> Result<String, CliError> {
    let province = province.map(str::parse::<Province>).transpose()?;
    let items = client.list_cart().await?;
    Ok(render_summary(&CheckoutSummary::compute(&items, province)))
}

fn render_summary(summary: &CheckoutSummary) -> String {
    let province = summary.province.map_or("none selected", Province::name);
    [
        format!("Province:     {province}"),
        format!("Subtotal:     {}", summary.subtotal.display()),
        format!("Delivery Fee: {}", summary.delivery_fee.display()),
        format!("Tax:          {}", summary.tax.display()),
        format!("Total:        {}", summary.total.display()),
    ]
    .join("\n")
}
