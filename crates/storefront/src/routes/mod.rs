//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page: hero + filterable product listing
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (record store reachable)
//!
//! # Products
//! GET  /product/{id}           - Product detail
//!
//! # Cart (forms, Post/Redirect/Get)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart, redirect to `return_to`
//! POST /cart/update            - Set line quantity, redirect to /cart
//! POST /cart/remove            - Remove line, redirect to /cart
//!
//! # Checkout
//! GET  /checkout               - Checkout form (?province= preselects)
//! POST /checkout               - Review totals or place the order
//! ```
//!
//! Mutations never render. They queue a notice in the session and redirect;
//! the next page shows it once.

pub mod cart;
pub mod checkout;
pub mod home;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page with product listing
        .route("/", get(home::home))
        // Product detail
        .route("/product/{id}", get(products::show))
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout
        .route("/checkout", get(checkout::show).post(checkout::submit))
}

/// Resolve a post-action redirect target.
///
/// Only same-site absolute paths are honored; anything else (full URLs,
/// protocol-relative `//host`, backslash tricks) falls back to `fallback`.
#[must_use]
pub fn safe_return_path(raw: Option<&str>, fallback: &str) -> String {
    match raw {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(char::is_control) =>
        {
            path.to_string()
        }
        _ => fallback.to_string(),
    }
}
