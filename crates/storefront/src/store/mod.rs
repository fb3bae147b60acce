//! REST client for the catalog and cart record store.
//!
//! # Architecture
//!
//! - The record store (json-server style) is the source of truth - no local
//!   sync, every view fetches what it needs per request
//! - Optional in-memory caching via `moka` for the read-only catalog
//! - The cart is never cached
//!
//! # Resources
//!
//! ```text
//! GET    /products          catalog
//! GET    /products/:id      one product (404 or {} when missing)
//! GET    /cart              cart lines
//! POST   /cart              create line (product fields + quantity)
//! PATCH  /cart/:id          {quantity}
//! DELETE /cart/:id          remove line
//! DELETE /cart              clear
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use parts_store_storefront::store::StoreClient;
//!
//! let client = StoreClient::new(&config.store)?;
//!
//! let product = client.get_product(ProductId::new(3)).await?;
//! if let Some(product) = product {
//!     client.add_to_cart(&product, Quantity::ONE).await?;
//! }
//! ```

mod cache;
mod client;

pub use client::StoreClient;

use thiserror::Error;

/// Errors that can occur when talking to the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed (connection refused, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl StoreError {
    /// HTTP status returned by the store, if it answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(_) | Self::Parse(_) => None,
        }
    }
}
