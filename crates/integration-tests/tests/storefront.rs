//! End-to-end storefront flows against a mock record store.
//!
//! A cookie-keeping client follows the Post/Redirect/Get cycle, so the page a
//! test inspects after a form post is the one a shopper would land on,
//! notices included.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::json;

use parts_store_integration_tests::TestShop;

const CHECKOUT_FIELDS: [(&str, &str); 5] = [
    ("name", "Ada Lovelace"),
    ("address", "12 Engine Row"),
    ("card_number", "4111111111111111"),
    ("card_expiry", "2030-01"),
    ("card_cvv", "123"),
];

/// Two Hex Bolts and one Flat Washer: $25.00.
async fn fill_cart(shop: &TestShop) {
    shop.store
        .set_cart(vec![
            json!({ "id": 1, "name": "Hex Bolt", "price": 10.0, "quantity": 2 }),
            json!({ "id": 3, "name": "Flat Washer", "price": 5.0, "quantity": 1 }),
        ])
        .await;
}

fn checkout_form<'a>(province: &'a str, action: &'a str) -> Vec<(&'a str, &'a str)> {
    let mut form = vec![("province", province), ("action", action)];
    form.extend(CHECKOUT_FIELDS);
    form
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn test_home_lists_all_products() {
    let shop = TestShop::start().await.unwrap();

    let page = shop.get("/").await.unwrap();

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Welcome to Bob's Machine Parts Store."));
    assert!(page.body.contains("Your one-stop shop for amazing products."));
    for name in ["Hex Bolt", "Spur Gear", "Flat Washer", "Ball Bearing"] {
        assert!(page.body.contains(name), "missing {name}");
    }
    assert!(page.body.contains("$19.99"));
    assert!(page.body.contains("<option value=\"Fasteners\">Fasteners</option>"));
    assert!(page.body.contains("<option value=\"Gears\">Gears</option>"));
}

#[tokio::test]
async fn test_home_filters_by_search_and_category() {
    let shop = TestShop::start().await.unwrap();

    let page = shop.get("/?q=WASH&category=Fasteners").await.unwrap();

    assert!(page.body.contains("Flat Washer"));
    assert!(!page.body.contains("Hex Bolt"));
    assert!(!page.body.contains("Spur Gear"));
    assert!(page.body.contains("<option value=\"Fasteners\" selected>Fasteners</option>"));
    assert!(page.body.contains("value=\"WASH\""));
}

#[tokio::test]
async fn test_home_reports_no_matches() {
    let shop = TestShop::start().await.unwrap();

    let page = shop.get("/?q=gear&category=Fasteners").await.unwrap();

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("No products match your filters."));
}

#[tokio::test]
async fn test_home_when_store_down() {
    let shop = TestShop::start().await.unwrap();
    shop.store.set_failing(true).await;

    let page = shop.get("/").await.unwrap();

    assert_eq!(page.status, StatusCode::BAD_GATEWAY);
    assert!(page.body.contains("Failed to load products."));
    assert!(page.body.contains("href=\"/cart\""));
}

// ============================================================================
// Product detail
// ============================================================================

#[tokio::test]
async fn test_product_detail() {
    let shop = TestShop::start().await.unwrap();

    let page = shop.get("/product/2").await.unwrap();

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Spur Gear"));
    assert!(page.body.contains("20 tooth steel spur gear."));
    assert!(page.body.contains("$19.99"));
    assert!(page.body.contains("name=\"origin\" value=\"detail\""));
}

#[tokio::test]
async fn test_product_not_found() {
    let shop = TestShop::start().await.unwrap();

    for path in ["/product/999", "/product/not-a-number"] {
        let page = shop.get(path).await.unwrap();
        assert_eq!(page.status, StatusCode::NOT_FOUND, "{path}");
        assert!(page.body.contains("Product not found."), "{path}");
    }
}

#[tokio::test]
async fn test_product_detail_when_store_down() {
    let shop = TestShop::start().await.unwrap();
    shop.store.set_failing(true).await;

    let page = shop.get("/product/1").await.unwrap();

    assert_eq!(page.status, StatusCode::BAD_GATEWAY);
    assert!(page.body.contains("Failed to load product details."));
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
async fn test_add_from_listing_returns_to_filtered_listing() {
    let shop = TestShop::start().await.unwrap();

    let page = shop
        .post(
            "/cart/add",
            &[
                ("product_id", "1"),
                ("quantity", "2"),
                ("origin", "listing"),
                ("return_to", "/?category=Fasteners"),
            ],
        )
        .await
        .unwrap();

    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.path, "/?category=Fasteners");
    assert!(page.body.contains("Hex Bolt added to cart!"));

    let cart = shop.store.cart().await;
    assert_eq!(cart.len(), 1);
    assert_eq!(cart[0]["quantity"], json!(2));
}

#[tokio::test]
async fn test_notice_shown_once() {
    let shop = TestShop::start().await.unwrap();

    let page = shop
        .post(
            "/cart/add",
            &[
                ("product_id", "2"),
                ("origin", "detail"),
                ("return_to", "/product/2"),
            ],
        )
        .await
        .unwrap();
    assert_eq!(page.path, "/product/2");
    assert!(page.body.contains("Item added to cart!"));

    let again = shop.get("/product/2").await.unwrap();
    assert!(!again.body.contains("Item added to cart!"));
}

#[tokio::test]
async fn test_add_twice_keeps_one_line() {
    let shop = TestShop::start().await.unwrap();

    for _ in 0..2 {
        shop.post("/cart/add", &[("product_id", "3"), ("quantity", "abc")])
            .await
            .unwrap();
    }

    let cart = shop.store.cart().await;
    assert_eq!(cart.len(), 1);
    assert_eq!(cart[0]["quantity"], json!(2));
    assert_eq!(shop.store.mutations().await, vec!["POST /cart", "PATCH /cart/3"]);
}

#[tokio::test]
async fn test_add_rejects_offsite_return() {
    let shop = TestShop::start().await.unwrap();

    let page = shop
        .post("/cart/add", &[("product_id", "1"), ("return_to", "//evil.example/")])
        .await
        .unwrap();

    assert_eq!(page.path, "/");
    assert!(page.body.contains("Hex Bolt added to cart!"));
}

#[tokio::test]
async fn test_add_unknown_product() {
    let shop = TestShop::start().await.unwrap();

    let page = shop.post("/cart/add", &[("product_id", "999")]).await.unwrap();

    assert!(page.body.contains("Product not found."));
    assert!(shop.store.cart().await.is_empty());
}

#[tokio::test]
async fn test_add_when_store_down_shows_failure_on_error_page() {
    let shop = TestShop::start().await.unwrap();
    shop.store.set_failing(true).await;

    let page = shop
        .post("/cart/add", &[("product_id", "1"), ("return_to", "/")])
        .await
        .unwrap();

    assert_eq!(page.status, StatusCode::BAD_GATEWAY);
    assert_eq!(page.path, "/");
    assert!(page.body.contains("Failed to add item to cart."));
    assert!(page.body.contains("Failed to load products."));

    shop.store.set_failing(false).await;
    let later = shop.get("/cart").await.unwrap();
    assert!(!later.body.contains("Failed to add item to cart."));
    assert!(shop.store.cart().await.is_empty());
}

#[tokio::test]
async fn test_add_when_cart_write_fails() {
    let shop = TestShop::start().await.unwrap();
    shop.store.fail_route("POST /cart").await;

    let page = shop.post("/cart/add", &[("product_id", "1")]).await.unwrap();

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Failed to add item to cart."));
    assert!(!page.body.contains("Hex Bolt added to cart!"));
    assert!(shop.store.cart().await.is_empty());
}

#[tokio::test]
async fn test_add_returning_to_checkout_shows_notice() {
    let shop = TestShop::start().await.unwrap();

    let page = shop
        .post("/cart/add", &[("product_id", "1"), ("return_to", "/checkout")])
        .await
        .unwrap();

    assert_eq!(page.path, "/checkout");
    assert!(page.body.contains("Hex Bolt added to cart!"));
    assert!(page.body.contains("Subtotal: $10.00"));
}

#[tokio::test]
async fn test_checkout_load_failure_keeps_queued_notice() {
    let shop = TestShop::start().await.unwrap();
    shop.store.fail_route("GET /cart").await;

    let page = shop
        .post("/cart/add", &[("product_id", "1"), ("return_to", "/checkout")])
        .await
        .unwrap();

    assert_eq!(page.status, StatusCode::BAD_GATEWAY);
    assert_eq!(page.path, "/checkout");
    assert!(page.body.contains("Failed to add item to cart."));
    assert!(page.body.contains("Failed to load cart data."));
}

#[tokio::test]
async fn test_cart_page_lists_lines_and_total() {
    let shop = TestShop::start().await.unwrap();
    fill_cart(&shop).await;

    let page = shop.get("/cart").await.unwrap();

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Hex Bolt"));
    assert!(page.body.contains("Flat Washer"));
    assert!(page.body.contains("Total: $25.00"));
    assert!(page.body.contains("href=\"/checkout\""));
}

#[tokio::test]
async fn test_empty_cart_page() {
    let shop = TestShop::start().await.unwrap();

    let page = shop.get("/cart").await.unwrap();

    assert!(page.body.contains("Your cart is empty."));
    assert!(page.body.contains("Go back to shopping"));
    assert!(!page.body.contains("Total:"));
}

#[tokio::test]
async fn test_update_quantity() {
    let shop = TestShop::start().await.unwrap();
    fill_cart(&shop).await;

    let page = shop
        .post("/cart/update", &[("id", "3"), ("quantity", "4")])
        .await
        .unwrap();

    assert_eq!(page.path, "/cart");
    assert!(page.body.contains("Total: $40.00"));
}

#[tokio::test]
async fn test_update_below_one_is_ignored() {
    let shop = TestShop::start().await.unwrap();
    fill_cart(&shop).await;

    for quantity in ["0", "-2", ""] {
        shop.post("/cart/update", &[("id", "1"), ("quantity", quantity)])
            .await
            .unwrap();
    }

    assert!(shop.store.mutations().await.is_empty());
    assert_eq!(shop.store.cart().await[0]["quantity"], json!(2));
}

#[tokio::test]
async fn test_update_failure_keeps_quantity() {
    let shop = TestShop::start().await.unwrap();
    fill_cart(&shop).await;
    shop.store.fail_route("PATCH /cart/3").await;

    let page = shop
        .post("/cart/update", &[("id", "3"), ("quantity", "4")])
        .await
        .unwrap();

    assert_eq!(page.path, "/cart");
    assert!(page.body.contains("Failed to update item quantity."));
    assert!(page.body.contains("Total: $25.00"));
    assert_eq!(shop.store.cart().await[1]["quantity"], json!(1));
}

#[tokio::test]
async fn test_remove_line() {
    let shop = TestShop::start().await.unwrap();
    fill_cart(&shop).await;

    let page = shop.post("/cart/remove", &[("id", "1")]).await.unwrap();

    assert_eq!(page.path, "/cart");
    assert!(page.body.contains("Item removed from cart."));
    assert!(page.body.contains("Total: $5.00"));
}

#[tokio::test]
async fn test_remove_missing_line_reports_failure() {
    let shop = TestShop::start().await.unwrap();

    let page = shop.post("/cart/remove", &[("id", "42")]).await.unwrap();

    assert!(page.body.contains("Failed to remove item from cart."));
}

#[tokio::test]
async fn test_cart_page_when_store_down() {
    let shop = TestShop::start().await.unwrap();
    shop.store.set_failing(true).await;

    let page = shop.get("/cart").await.unwrap();

    assert_eq!(page.status, StatusCode::BAD_GATEWAY);
    assert!(page.body.contains("Failed to load cart items."));
}

// ============================================================================
// Checkout
// ============================================================================

#[tokio::test]
async fn test_checkout_totals_without_province() {
    let shop = TestShop::start().await.unwrap();
    fill_cart(&shop).await;

    let page = shop.get("/checkout").await.unwrap();

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Subtotal: $25.00"));
    assert!(page.body.contains("Delivery Fee: $10.00"));
    assert!(page.body.contains("Tax: $0.00"));
    assert!(page.body.contains("Total: $35.00"));
    assert!(page.body.contains("value=\"place\" disabled"));
}

#[tokio::test]
async fn test_checkout_totals_for_alberta() {
    let shop = TestShop::start().await.unwrap();
    fill_cart(&shop).await;

    let page = shop.get("/checkout?province=Alberta").await.unwrap();

    assert!(page.body.contains("<option value=\"Alberta\" selected>Alberta</option>"));
    assert!(page.body.contains("Tax: $1.25"));
    assert!(page.body.contains("Total: $36.25"));
}

#[tokio::test]
async fn test_checkout_review_enables_place_order() {
    let shop = TestShop::start().await.unwrap();
    fill_cart(&shop).await;

    let page = shop
        .post("/checkout", &checkout_form("Ontario", "review"))
        .await
        .unwrap();

    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Tax: $3.25"));
    assert!(page.body.contains("Total: $38.25"));
    assert!(page.body.contains("value=\"Ada Lovelace\""));
    assert!(!page.body.contains("value=\"place\" disabled"));
}

#[tokio::test]
async fn test_place_order_requires_all_fields() {
    let shop = TestShop::start().await.unwrap();
    fill_cart(&shop).await;

    let page = shop
        .post(
            "/checkout",
            &[("province", "Quebec"), ("name", "Ada"), ("action", "place")],
        )
        .await
        .unwrap();

    assert_eq!(page.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(page.body.contains("Please fill in all required fields."));
    assert_eq!(shop.store.cart().await.len(), 2);
}

#[tokio::test]
async fn test_place_order_requires_province() {
    let shop = TestShop::start().await.unwrap();
    fill_cart(&shop).await;

    let page = shop.post("/checkout", &checkout_form("", "place")).await.unwrap();

    assert_eq!(page.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(shop.store.mutations().await.is_empty());
}

#[tokio::test]
async fn test_place_order_clears_cart() {
    let shop = TestShop::start().await.unwrap();
    fill_cart(&shop).await;

    let page = shop
        .post("/checkout", &checkout_form("British Columbia", "place"))
        .await
        .unwrap();

    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.path, "/");
    assert!(page.body.contains("Thank you, Ada Lovelace. Your order has been placed!"));
    assert!(shop.store.cart().await.is_empty());
    assert_eq!(shop.store.mutations().await, vec!["DELETE /cart"]);
}

#[tokio::test]
async fn test_place_order_when_clear_fails() {
    let shop = TestShop::start().await.unwrap();
    fill_cart(&shop).await;
    shop.store.fail_route("DELETE /cart").await;

    let page = shop
        .post("/checkout", &checkout_form("Ontario", "place"))
        .await
        .unwrap();

    assert_eq!(page.status, StatusCode::BAD_GATEWAY);
    assert!(page.body.contains("Thank you, Ada Lovelace. Your order has been placed!"));
    assert!(page.body.contains("Failed to clear cart after placing order."));
    assert_eq!(shop.store.cart().await.len(), 2);

    let later = shop.get("/cart").await.unwrap();
    assert!(!later.body.contains("Thank you, Ada Lovelace."));
}

#[tokio::test]
async fn test_place_order_when_store_down() {
    let shop = TestShop::start().await.unwrap();
    fill_cart(&shop).await;
    shop.store.set_failing(true).await;

    let page = shop
        .post("/checkout", &checkout_form("Alberta", "place"))
        .await
        .unwrap();

    assert_eq!(page.status, StatusCode::BAD_GATEWAY);
    assert!(page.body.contains("Thank you, Ada Lovelace. Your order has been placed!"));
    assert!(page.body.contains("Failed to clear cart after placing order."));
    assert!(!page.body.contains("Failed to load cart data."));
    assert_eq!(shop.store.cart().await.len(), 2);
}

#[tokio::test]
async fn test_checkout_when_store_down() {
    let shop = TestShop::start().await.unwrap();
    shop.store.set_failing(true).await;

    let page = shop.get("/checkout").await.unwrap();

    assert_eq!(page.status, StatusCode::BAD_GATEWAY);
    assert!(page.body.contains("Failed to load cart data."));
}

// ============================================================================
// Operational
// ============================================================================

#[tokio::test]
async fn test_health_and_readiness() {
    let shop = TestShop::start().await.unwrap();

    assert_eq!(shop.get("/health").await.unwrap().body, "ok");
    assert_eq!(shop.get("/health/ready").await.unwrap().status, StatusCode::OK);

    shop.store.set_failing(true).await;
    assert_eq!(
        shop.get("/health/ready").await.unwrap().status,
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[tokio::test]
async fn test_unknown_route_renders_not_found_page() {
    let shop = TestShop::start().await.unwrap();

    let page = shop.get("/nope").await.unwrap();

    assert_eq!(page.status, StatusCode::NOT_FOUND);
    assert!(page.body.contains("Page not found."));
}

#[tokio::test]
async fn test_stylesheet_served() {
    let shop = TestShop::start().await.unwrap();

    let home = shop.get("/").await.unwrap();
    let href = home
        .body
        .split("href=\"")
        .find_map(|rest| rest.split('"').next().filter(|h| h.ends_with(".css")))
        .unwrap()
        .to_string();

    let css = shop.get(&href).await.unwrap();
    assert_eq!(css.status, StatusCode::OK);
    assert!(css.body.contains(".product-grid"));
}
