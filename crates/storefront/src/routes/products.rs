//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tower_sessions::Session;
use tracing::instrument;

use parts_store_core::{Product, ProductId};

use crate::error::{AppError, Result};
use crate::filters;
use crate::notices::{self, Notice};
use crate::state::AppState;

/// Message for a missing product.
pub const PRODUCT_NOT_FOUND: &str = "Product not found.";

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image: String,
    /// Empty when the product has no category.
    pub category: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.display(),
            image: product.image.clone(),
            category: product.category().unwrap_or_default().to_string(),
        }
    }
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductView,
    pub notices: Vec<Notice>,
}

/// Display product detail page.
///
/// A malformed id and a product the store does not have both render the
/// not-found page without an error notice.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id: ProductId = id
        .parse()
        .map_err(|_| AppError::NotFound(PRODUCT_NOT_FOUND.to_string()))?;

    let product = state
        .store()
        .get_product(id)
        .await
        .map_err(|e| AppError::upstream("Failed to load product details.", e))?
        .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_FOUND.to_string()))?;

    Ok(ProductShowTemplate {
        product: ProductView::from(&product),
        notices: notices::take(&session).await,
    })
}
