//! Catalog products and the cart lines created from them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Money, ProductId, Quantity};

/// A purchasable product from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    #[serde(default)]
    pub description: String,
    /// Image URL or path, rendered as-is.
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Any other fields on the record, kept so a cart line copies them too.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// The product's category label, if it has a non-empty one.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }
}

/// A line in the cart.
///
/// The product fields are copied at add-time and the line shares the product's
/// id, so on the wire a cart item is a product record with a `quantity` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: Quantity,
}

impl CartItem {
    /// Create a new cart line for a product.
    #[must_use]
    pub const fn new(product: Product, quantity: Quantity) -> Self {
        Self { product, quantity }
    }

    /// The cart item id (equal to the product id).
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price at the time the item was added.
    #[must_use]
    pub const fn price(&self) -> Money {
        self.product.price
    }

    /// Price × quantity.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.product.price.times(self.quantity.get())
    }
}
