//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::store::{StoreClient, StoreError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the record store client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: StoreClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the record store client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, StoreError> {
        let store = StoreClient::new(&config.store)?;

        Ok(Self {
            inner: Arc::new(AppStateInner { config, store }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the record store client.
    #[must_use]
    pub fn store(&self) -> &StoreClient {
        &self.inner.store
    }
}
