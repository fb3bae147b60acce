//! Cart route handlers.
//!
//! Cart lines live in the record store's `/cart` collection. Every mutation
//! here is a form post that queues a notice and redirects.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use parts_store_core::{CartItem, ProductId, Quantity, cart};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::notices::{self, Notice};
use crate::routes::products::PRODUCT_NOT_FOUND;
use crate::routes::safe_return_path;
use crate::state::AppState;

const ADD_FAILED: &str = "Failed to add item to cart.";

// =============================================================================
// Display Types
// =============================================================================

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub image: String,
    pub price: String,
    pub quantity: u32,
    pub line_total: String,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id().to_string(),
            name: item.product.name.clone(),
            image: item.product.image.clone(),
            price: item.price().display(),
            quantity: item.quantity.get(),
            line_total: item.line_total().display(),
        }
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub notices: Vec<Notice>,
}

// =============================================================================
// Form Types
// =============================================================================

/// Which page the add-to-cart form was posted from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddOrigin {
    #[default]
    Listing,
    Detail,
}

/// Add to cart form input.
///
/// Numbers arrive as raw strings so a blank or garbled quantity falls back to
/// one instead of rejecting the whole form.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    #[serde(default)]
    pub quantity: Option<String>,
    #[serde(default)]
    pub origin: AddOrigin,
    #[serde(default)]
    pub return_to: Option<String>,
}

/// Set quantity form input.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityForm {
    pub id: String,
    #[serde(default)]
    pub quantity: String,
}

/// Remove line form input.
#[derive(Debug, Deserialize)]
pub struct RemoveItemForm {
    pub id: String,
}

/// Quantity requested on an add form; missing, zero, or unparsable means one.
#[must_use]
pub fn requested_quantity(raw: Option<&str>) -> Quantity {
    Quantity::requested(raw.and_then(|q| q.trim().parse().ok()))
}

/// Quantity on an update form. Anything below one is not an update.
#[must_use]
pub fn updated_quantity(raw: &str) -> Option<Quantity> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .and_then(|q| Quantity::new(q).ok())
}

// =============================================================================
// Route Handlers
// =============================================================================

/// Display the cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let items = state
        .store()
        .list_cart()
        .await
        .map_err(|e| AppError::upstream("Failed to load cart items.", e))?;

    Ok(CartShowTemplate {
        total: cart::subtotal(&items).display(),
        items: items.iter().map(CartItemView::from).collect(),
        notices: notices::take(&session).await,
    })
}

/// Add a product to the cart, merging into an existing line.
#[instrument(skip(state, session, form), fields(product_id = %form.product_id))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Redirect {
    let return_to = safe_return_path(form.return_to.as_deref(), "/");
    let quantity = requested_quantity(form.quantity.as_deref());

    let Ok(id) = form.product_id.parse::<ProductId>() else {
        notices::push(&session, Notice::error(ADD_FAILED)).await;
        return Redirect::to(&return_to);
    };

    let product = match state.store().get_product(id).await {
        Ok(Some(product)) => product,
        Ok(None) => {
            notices::push(&session, Notice::error(PRODUCT_NOT_FOUND)).await;
            return Redirect::to(&return_to);
        }
        Err(e) => {
            tracing::error!(product_id = %id, "Failed to load product for cart: {e}");
            notices::push(&session, Notice::error(ADD_FAILED)).await;
            return Redirect::to(&return_to);
        }
    };

    match state.store().add_to_cart(&product, quantity).await {
        Ok(_) => {
            let (id_text, quantity_text) = (id.to_string(), quantity.to_string());
            add_breadcrumb(
                "cart",
                "Added to cart",
                Some(&[
                    ("product_id", id_text.as_str()),
                    ("quantity", quantity_text.as_str()),
                ]),
            );
            let message = match form.origin {
                AddOrigin::Listing => format!("{} added to cart!", product.name),
                AddOrigin::Detail => "Item added to cart!".to_string(),
            };
            notices::push(&session, Notice::success(message)).await;
        }
        Err(e) => {
            tracing::error!(product_id = %id, "Failed to add to cart: {e}");
            notices::push(&session, Notice::error(ADD_FAILED)).await;
        }
    }

    Redirect::to(&return_to)
}

/// Set a cart line's quantity.
#[instrument(skip(state, session, form), fields(id = %form.id))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateQuantityForm>,
) -> Redirect {
    let (Ok(id), Some(quantity)) = (
        form.id.parse::<ProductId>(),
        updated_quantity(&form.quantity),
    ) else {
        tracing::debug!("Ignoring quantity update below one");
        return Redirect::to("/cart");
    };

    if let Err(e) = state.store().set_quantity(id, quantity).await {
        tracing::error!(product_id = %id, "Failed to update cart quantity: {e}");
        notices::push(&session, Notice::error("Failed to update item quantity.")).await;
    }

    Redirect::to("/cart")
}

/// Remove a cart line.
#[instrument(skip(state, session, form), fields(id = %form.id))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveItemForm>,
) -> Redirect {
    let result = match form.id.parse::<ProductId>() {
        Ok(id) => state.store().remove_cart_item(id).await.map_err(|e| {
            tracing::error!(product_id = %id, "Failed to remove cart item: {e}");
        }),
        Err(_) => Err(()),
    };

    let notice = match result {
        Ok(()) => Notice::success("Item removed from cart."),
        Err(()) => Notice::error("Failed to remove item from cart."),
    };
    notices::push(&session, notice).await;

    Redirect::to("/cart")
}
