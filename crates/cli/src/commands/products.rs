//! Catalog commands.
//!
//! # Usage
//!
//! ```bash
//! parts-cli products list --search bolt
//! parts-cli products show 3
//! parts-cli products categories
//! ```

use parts_store_core::catalog::{self, ProductFilter};
use parts_store_core::{Product, ProductId};
use parts_store_storefront::store::StoreClient;

use super::CliError;

/// List products matching `filter`.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched.
pub async fn list(client: &StoreClient, filter: &ProductFilter) -> Result<String, CliError> {
    let products = client.list_products().await?;
    let matching = filter.apply(&products);
    tracing::info!(total = products.len(), matching = matching.len(), "Fetched catalog");
    Ok(render_list(&matching))
}

/// Show one product.
///
/// # Errors
///
/// Returns `CliError::ProductNotFound` if the store has no such product.
pub async fn show(client: &StoreClient, id: ProductId) -> Result<String, CliError> {
    let product = client
        .get_product(id)
        .await?
        .ok_or(CliError::ProductNotFound(id))?;
    Ok(render_product(&product))
}

/// List distinct categories in catalog order.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched.
pub async fn categories(client: &StoreClient) -> Result<String, CliError> {
    let products = client.list_products().await?;
    let names = catalog::categories(&products);
    if names.is_empty() {
        return Ok("No categories.".to_string());
    }
    Ok(names.join("\n"))
}

fn render_list(products: &[&Product]) -> String {
    if products.is_empty() {
        return "No products match your filters.".to_string();
    }

    products
        .iter()
        .map(|p| {
            let line = format!("{:>5}  {:>10}  {}", p.id, p.price.display(), p.name);
            match p.category() {
                Some(category) => format!("{line}  [{category}]"),
                None => line,
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_product(product: &Product) -> String {
    let mut lines = vec![
        format!("{} (#{})", product.name, product.id),
        format!("Price: {}", product.price.display()),
    ];
    if let Some(category) = product.category() {
        lines.push(format!("Category: {category}"));
    }
    if !product.description.is_empty() {
        lines.push(String::new());
        lines.push(product.description.clone());
    }
    lines.join("\n")
}
