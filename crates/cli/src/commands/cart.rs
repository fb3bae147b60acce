//! Cart commands.
//!
//! The cart is shared with the storefront: changes here show up on the next
//! page load there.
//!
//! # Usage
//!
//! ```bash
//! parts-cli cart add 3 -q 2
//! parts-cli cart set 3 5
//! parts-cli cart remove 3
//! parts-cli cart clear
//! ```

use parts_store_core::cart::{self, CartMutation};
use parts_store_core::{CartItem, ProductId, Quantity};
use parts_store_storefront::store::StoreClient;

use super::CliError;

/// Show cart lines and the total.
///
/// # Errors
///
/// Returns an error if the cart cannot be fetched.
pub async fn show(client: &StoreClient) -> Result<String, CliError> {
    let items = client.list_cart().await?;
    Ok(render_cart(&items))
}

/// Add `quantity` units of a product.
///
/// # Errors
///
/// Returns an error if the quantity is zero, the product does not exist, or
/// the store rejects the change.
pub async fn add(client: &StoreClient, id: ProductId, quantity: u32) -> Result<String, CliError> {
    let quantity = Quantity::new(quantity)?;
    let product = client
        .get_product(id)
        .await?
        .ok_or(CliError::ProductNotFound(id))?;

    let message = match client.add_to_cart(&product, quantity).await? {
        CartMutation::SetQuantity { quantity, .. } => {
            format!("{} now has quantity {quantity} in the cart.", product.name)
        }
        CartMutation::Create(item) => {
            format!("Added {} x {} to the cart.", item.quantity, product.name)
        }
    };
    tracing::info!(product_id = %id, "Cart updated");
    Ok(message)
}

/// Set the quantity of an existing line.
///
/// # Errors
///
/// Returns an error if the quantity is zero or the product is not in the cart.
pub async fn set(client: &StoreClient, id: ProductId, quantity: u32) -> Result<String, CliError> {
    let quantity = Quantity::new(quantity)?;
    let items = client.list_cart().await?;
    let item = cart::find(&items, id).ok_or(CliError::NotInCart(id))?;

    client.set_quantity(id, quantity).await?;
    Ok(format!("{} now has quantity {quantity}.", item.product.name))
}

/// Remove a line.
///
/// # Errors
///
/// Returns an error if the product is not in the cart or the store rejects
/// the removal.
pub async fn remove(client: &StoreClient, id: ProductId) -> Result<String, CliError> {
    let items = client.list_cart().await?;
    let item = cart::find(&items, id).ok_or(CliError::NotInCart(id))?;

    client.remove_cart_item(id).await?;
    Ok(format!("Removed {} from the cart.", item.product.name))
}

/// Remove every line.
///
/// # Errors
///
/// Returns an error if the store rejects the request.
pub async fn clear(client: &StoreClient) -> Result<String, CliError> {
    client.clear_cart().await?;
    Ok("Cart cleared.".to_string())
}

fn render_cart(items: &[CartItem]) -> String {
    if items.is_empty() {
        return "Your cart is empty.".to_string();
    }

    let mut lines: Vec<String> = items
        .iter()
        .map(|item| {
            format!(
                "{:>5}  {:>3} x {:>10} = {:>10}  {}",
                item.id(),
                item.quantity,
                item.price().display(),
                item.line_total().display(),
                item.product.name
            )
        })
        .collect();
    lines.push(format!(
        "{} item(s), total {}",
        cart::item_count(items),
        cart::subtotal(items).display()
    ));
    lines.join("\n")
}
