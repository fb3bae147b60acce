//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use tower_sessions::Session;
use tracing::instrument;

use parts_store_core::catalog::{self, ProductFilter};

use crate::error::{AppError, Result};
use crate::filters;
use crate::notices::{self, Notice};
use crate::routes::products::ProductView;
use crate::state::AppState;

/// Category dropdown entry.
pub struct CategoryOption {
    pub name: String,
    pub selected: bool,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub products: Vec<ProductView>,
    pub categories: Vec<CategoryOption>,
    pub search: String,
    /// Listing URL with the current filter, so add-to-cart lands back here.
    pub return_to: String,
    pub notices: Vec<Notice>,
}

/// Display the home page.
#[instrument(skip(state, session))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    Query(filter): Query<ProductFilter>,
) -> Result<impl IntoResponse> {
    let all = state
        .store()
        .list_products()
        .await
        .map_err(|e| AppError::upstream("Failed to load products.", e))?;

    let categories = catalog::categories(&all)
        .into_iter()
        .map(|name| CategoryOption {
            name: name.to_string(),
            selected: filter.category() == Some(name),
        })
        .collect();

    let products = filter
        .apply(&all)
        .into_iter()
        .map(ProductView::from)
        .collect();

    Ok(HomeTemplate {
        products,
        categories,
        search: filter.search().to_string(),
        return_to: listing_path(&filter),
        notices: notices::take(&session).await,
    })
}

/// Build the listing URL that reproduces `filter`.
#[must_use]
pub fn listing_path(filter: &ProductFilter) -> String {
    if filter.is_empty() {
        return "/".to_string();
    }

    let mut query = url::form_urlencoded::Serializer::new(String::new());
    if !filter.search().is_empty() {
        query.append_pair("q", filter.search());
    }
    if let Some(category) = filter.category() {
        query.append_pair("category", category);
    }
    format!("/?{}", query.finish())
}
