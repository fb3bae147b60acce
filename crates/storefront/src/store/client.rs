//! Record store client implementation.
//!
//! Uses `reqwest` for HTTP. Catalog reads are optionally cached with `moka`.

use std::sync::Arc;

use moka::future::Cache;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use parts_store_core::cart::{self, CartMutation};
use parts_store_core::{CartItem, Product, ProductId, Quantity};

use super::StoreError;
use super::cache::{CacheKey, CacheValue};
use crate::config::StoreApiConfig;

/// Longest slice of an error body kept in errors and logs.
const MAX_ERROR_BODY_CHARS: usize = 200;

// =============================================================================
// StoreClient
// =============================================================================

/// Client for the catalog and cart record store.
///
/// Cheap to clone; all clones share one connection pool and cache.
#[derive(Clone)]
pub struct StoreClient {
    inner: Arc<StoreClientInner>,
}

struct StoreClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Option<Cache<CacheKey, CacheValue>>,
}

impl StoreClient {
    /// Create a new record store client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &StoreApiConfig) -> Result<Self, StoreError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let cache = config.catalog_cache_ttl.map(|ttl| {
            Cache::builder()
                .max_capacity(1000)
                .time_to_live(ttl)
                .build()
        });

        Ok(Self {
            inner: Arc::new(StoreClientInner {
                client,
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
                cache,
            }),
        })
    }

    /// The store's base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.inner.base_url)
    }

    /// Send a request and turn non-success statuses into `StoreError::Api`.
    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(
            status = %status,
            body = %body.chars().take(MAX_ERROR_BODY_CHARS).collect::<String>(),
            "Record store returned non-success status"
        );
        Err(StoreError::Api {
            status: status.as_u16(),
            message: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        })
    }

    /// Read a response body as JSON.
    ///
    /// The body is read as text first for better error diagnostics.
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(MAX_ERROR_BODY_CHARS).collect::<String>(),
                "Failed to parse record store response"
            );
            StoreError::Parse(e)
        })
    }

    async fn cached(&self, key: CacheKey) -> Option<CacheValue> {
        match &self.inner.cache {
            Some(cache) => cache.get(&key).await,
            None => None,
        }
    }

    async fn remember(&self, key: CacheKey, value: CacheValue) {
        if let Some(cache) = &self.inner.cache {
            cache.insert(key, value).await;
        }
    }

    // =========================================================================
    // Catalog Methods
    // =========================================================================

    /// Get the full product catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a product list.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        if let Some(CacheValue::Products(products)) = self.cached(CacheKey::Products).await {
            debug!("Cache hit for products");
            return Ok(products.as_ref().clone());
        }

        let response = self.send(self.inner.client.get(self.url("products"))).await?;
        let products: Vec<Product> = Self::decode(response).await?;
        debug!(count = products.len(), "Fetched catalog");

        self.remember(
            CacheKey::Products,
            CacheValue::Products(Arc::new(products.clone())),
        )
        .await;

        Ok(products)
    }

    /// Get a product by id.
    ///
    /// Returns `Ok(None)` when the store reports the product missing, either
    /// with a 404 or with an empty record.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any other reason.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        if let Some(CacheValue::Product(product)) = self.cached(CacheKey::Product(id)).await {
            debug!("Cache hit for product");
            return Ok(Some(*product));
        }

        let request = self.inner.client.get(self.url(&format!("products/{id}")));
        let response = match self.send(request).await {
            Ok(response) => response,
            Err(StoreError::Api { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                debug!("Product not found");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let record: serde_json::Value = Self::decode(response).await?;
        if record.get("id").is_none() {
            debug!("Empty product record");
            return Ok(None);
        }
        let product: Product = serde_json::from_value(record)?;

        self.remember(
            CacheKey::Product(id),
            CacheValue::Product(Box::new(product.clone())),
        )
        .await;

        Ok(Some(product))
    }

    // =========================================================================
    // Cart Methods
    // =========================================================================

    /// Get all cart lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a cart.
    #[instrument(skip(self))]
    pub async fn list_cart(&self) -> Result<Vec<CartItem>, StoreError> {
        let response = self.send(self.inner.client.get(self.url("cart"))).await?;
        Self::decode(response).await
    }

    /// Create a cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, item), fields(product_id = %item.id(), quantity = %item.quantity))]
    pub async fn create_cart_item(&self, item: &CartItem) -> Result<(), StoreError> {
        self.send(self.inner.client.post(self.url("cart")).json(item))
            .await?;
        Ok(())
    }

    /// Replace the quantity of a cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %id, quantity = %quantity))]
    pub async fn set_quantity(&self, id: ProductId, quantity: Quantity) -> Result<(), StoreError> {
        let body = serde_json::json!({ "quantity": quantity });
        self.send(
            self.inner
                .client
                .patch(self.url(&format!("cart/{id}")))
                .json(&body),
        )
        .await?;
        Ok(())
    }

    /// Remove a cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn remove_cart_item(&self, id: ProductId) -> Result<(), StoreError> {
        self.send(self.inner.client.delete(self.url(&format!("cart/{id}"))))
            .await?;
        Ok(())
    }

    /// Remove every cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<(), StoreError> {
        self.send(self.inner.client.delete(self.url("cart"))).await?;
        Ok(())
    }

    /// Add units of a product to the cart, keeping one line per product.
    ///
    /// Fetches the cart, then sends exactly one mutation: a quantity update when
    /// the product already has a line, a create otherwise. Returns the mutation
    /// that was sent.
    ///
    /// # Errors
    ///
    /// Returns an error if fetching the cart or sending the mutation fails.
    #[instrument(skip(self, product), fields(product_id = %product.id, quantity = %quantity))]
    pub async fn add_to_cart(
        &self,
        product: &Product,
        quantity: Quantity,
    ) -> Result<CartMutation, StoreError> {
        let items = self.list_cart().await?;
        let mutation = cart::plan_add(&items, product, quantity);

        match &mutation {
            CartMutation::SetQuantity { id, quantity } => {
                self.set_quantity(*id, *quantity).await?;
            }
            CartMutation::Create(item) => self.create_cart_item(item).await?,
        }

        Ok(mutation)
    }

    /// Check that the store answers.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog endpoint is unreachable or failing.
    pub async fn ping(&self) -> Result<(), StoreError> {
        self.send(self.inner.client.get(self.url("products")))
            .await?;
        Ok(())
    }
}
