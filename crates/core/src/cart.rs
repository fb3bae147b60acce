//! Cart arithmetic and the add-to-cart merge decision.
//!
//! The record store does not enforce one line per product. Callers keep that
//! invariant by fetching the current cart, asking [`plan_add`] what to do, and
//! sending exactly the one mutation it returns.

use crate::types::{CartItem, Money, Product, ProductId, Quantity};

/// Sum of price × quantity over all lines. Zero for an empty cart.
#[must_use]
pub fn subtotal(items: &[CartItem]) -> Money {
    items.iter().map(CartItem::line_total).sum()
}

/// Total number of units across all lines.
#[must_use]
pub fn item_count(items: &[CartItem]) -> u32 {
    items
        .iter()
        .fold(0u32, |acc, item| acc.saturating_add(item.quantity.get()))
}

/// Find the line for a product, if the cart has one.
#[must_use]
pub fn find(items: &[CartItem], id: ProductId) -> Option<&CartItem> {
    items.iter().find(|item| item.id() == id)
}

/// The single store mutation that adds a product to the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartMutation {
    /// The product already has a line: replace its quantity.
    SetQuantity { id: ProductId, quantity: Quantity },
    /// No line yet: create one.
    Create(CartItem),
}

/// Decide how to add `quantity` units of `product` to `items`.
///
/// An existing line gets `existing + quantity`; otherwise a new line is created
/// from the product's current fields.
#[must_use]
pub fn plan_add(items: &[CartItem], product: &Product, quantity: Quantity) -> CartMutation {
    match find(items, product.id) {
        Some(existing) => CartMutation::SetQuantity {
            id: existing.id(),
            quantity: existing.quantity.saturating_add(quantity),
        },
        None => CartMutation::Create(CartItem::new(product.clone(), quantity)),
    }
}

/// Apply a mutation to a local copy of the cart.
///
/// Mirrors what the store does with the mutation, for callers that patch their
/// fetched copy instead of fetching again.
pub fn apply(items: &mut Vec<CartItem>, mutation: CartMutation) {
    match mutation {
        CartMutation::SetQuantity { id, quantity } => {
            if let Some(item) = items.iter_mut().find(|item| item.id() == id) {
                item.quantity = quantity;
            }
        }
        CartMutation::Create(item) => items.push(item),
    }
}
