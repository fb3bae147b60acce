//! Command implementations.
//!
//! Each command talks to the record store through the storefront's
//! [`StoreClient`] and returns the text to print.

pub mod cart;
pub mod checkout;
pub mod products;

use thiserror::Error;

use parts_store_core::checkout::ProvinceError;
use parts_store_core::{ProductId, QuantityError};
use parts_store_storefront::config::{ConfigError, StoreApiConfig};
use parts_store_storefront::store::{StoreClient, StoreError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Bad `--api-url`.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Record store request failed.
    #[error("Record store error: {0}")]
    Store(#[from] StoreError),

    /// No product with this id.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// No cart line with this id.
    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),

    /// Quantity below one.
    #[error("Invalid quantity: {0}")]
    Quantity(#[from] QuantityError),

    /// Unknown province name.
    #[error("{0}. Valid provinces: Ontario, Quebec, British Columbia, Alberta")]
    Province(#[from] ProvinceError),
}

/// Build a record store client for `api_url`.
///
/// # Errors
///
/// Returns an error if the URL is not an http(s) URL or the client cannot
/// be built.
pub fn connect(api_url: &str) -> Result<StoreClient, CliError> {
    let config = StoreApiConfig::new(api_url)?;
    tracing::debug!(api_url = %config.base_url, "Connecting to record store");
    Ok(StoreClient::new(&config)?)
}
