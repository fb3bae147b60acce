//! Integration test support for Bob's Machine Parts Store.
//!
//! Everything runs in-process: [`MockStore`] stands in for the json-server
//! record store on an ephemeral port, and [`TestShop`] puts a real storefront
//! in front of it, driven by a cookie-keeping `reqwest` client so notices
//! survive redirects the way they do in a browser.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p parts-store-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `store_client` - REST client against the mock record store
//! - `storefront` - Full page flows: listing, detail, cart, checkout

use std::error::Error;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use parts_store_storefront::build_router;
use parts_store_storefront::config::{StoreApiConfig, StorefrontConfig};
use parts_store_storefront::state::AppState;

// =============================================================================
// Mock Record Store
// =============================================================================

#[derive(Default)]
struct MockData {
    products: Vec<Value>,
    cart: Vec<Value>,
    mutations: Vec<String>,
    requests: Vec<String>,
    failing: bool,
    failing_routes: Vec<String>,
}

type Shared = Arc<Mutex<MockData>>;

/// In-memory json-server lookalike serving `/products` and `/cart`.
pub struct MockStore {
    data: Shared,
    addr: SocketAddr,
}

impl MockStore {
    /// Start a mock store with the given catalog and an empty cart.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn start(products: Vec<Value>) -> std::io::Result<Self> {
        let data = Arc::new(Mutex::new(MockData {
            products,
            ..MockData::default()
        }));

        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
        let addr = listener.local_addr()?;
        let app = mock_router(Arc::clone(&data));
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { data, addr })
    }

    /// Base URL to hand to a client.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Current cart records, as stored.
    pub async fn cart(&self) -> Vec<Value> {
        self.data.lock().await.cart.clone()
    }

    /// Replace the cart records.
    pub async fn set_cart(&self, cart: Vec<Value>) {
        self.data.lock().await.cart = cart;
    }

    /// Cart mutations received so far, e.g. `"POST /cart"`, `"PATCH /cart/3"`.
    pub async fn mutations(&self) -> Vec<String> {
        self.data.lock().await.mutations.clone()
    }

    /// Number of received requests equal to `route`, e.g. `"GET /cart"`.
    /// Failed requests count too.
    pub async fn request_count(&self, route: &str) -> usize {
        self.data
            .lock()
            .await
            .requests
            .iter()
            .filter(|r| *r == route)
            .count()
    }

    /// Make every request fail with a 500 until switched back.
    pub async fn set_failing(&self, failing: bool) {
        self.data.lock().await.failing = failing;
    }

    /// Make one route fail with a 500, e.g. `"DELETE /cart"` or
    /// `"PATCH /cart/1"`. Other routes keep working.
    pub async fn fail_route(&self, route: &str) {
        self.data.lock().await.failing_routes.push(route.to_string());
    }
}

/// Catalog used by most tests.
///
/// Prices are chosen so two Hex Bolts and one Flat Washer make $25.00.
#[must_use]
pub fn sample_products() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "name": "Hex Bolt",
            "price": 10.0,
            "description": "Zinc plated M8 hex bolt.",
            "image": "https://img.example/hex-bolt.png",
            "category": "Fasteners"
        }),
        json!({
            "id": 2,
            "name": "Spur Gear",
            "price": 19.99,
            "description": "20 tooth steel spur gear.",
            "image": "https://img.example/spur-gear.png",
            "category": "Gears"
        }),
        json!({
            "id": 3,
            "name": "Flat Washer",
            "price": 5.0,
            "description": "M8 flat washer.",
            "image": "https://img.example/washer.png",
            "category": "Fasteners"
        }),
        json!({
            "id": 4,
            "name": "Ball Bearing",
            "price": 12.5,
            "description": "Sealed 608 bearing.",
            "image": ""
        }),
    ]
}

fn mock_router(data: Shared) -> Router {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/{id}", get(get_product))
        .route(
            "/cart",
            get(list_cart).post(create_cart_item).delete(clear_cart),
        )
        .route(
            "/cart/{id}",
            axum::routing::patch(patch_cart_item).delete(delete_cart_item),
        )
        .layer(axum::middleware::from_fn_with_state(
            Arc::clone(&data),
            record_and_fail,
        ))
        .with_state(data)
}

async fn record_and_fail(State(data): State<Shared>, request: Request, next: Next) -> Response {
    let route = format!("{} {}", request.method(), request.uri().path());
    let failing = {
        let mut data = data.lock().await;
        let failing = data.failing || data.failing_routes.contains(&route);
        data.requests.push(route);
        failing
    };

    if failing {
        return (StatusCode::INTERNAL_SERVER_ERROR, "store unavailable").into_response();
    }
    next.run(request).await
}

/// json-server ids may be numbers or strings; the path segment is always text.
fn id_matches(record: &Value, id: &str) -> bool {
    match record.get("id") {
        Some(Value::Number(n)) => n.to_string() == id,
        Some(Value::String(s)) => s == id,
        _ => false,
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({}))).into_response()
}

async fn list_products(State(data): State<Shared>) -> Json<Vec<Value>> {
    Json(data.lock().await.products.clone())
}

async fn get_product(State(data): State<Shared>, Path(id): Path<String>) -> Response {
    let data = data.lock().await;
    data.products
        .iter()
        .find(|p| id_matches(p, &id))
        .map_or_else(not_found, |p| Json(p.clone()).into_response())
}

async fn list_cart(State(data): State<Shared>) -> Json<Vec<Value>> {
    Json(data.lock().await.cart.clone())
}

async fn create_cart_item(
    State(data): State<Shared>,
    Json(item): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut data = data.lock().await;
    data.mutations.push("POST /cart".to_string());
    data.cart.push(item.clone());
    (StatusCode::CREATED, Json(item))
}

async fn patch_cart_item(
    State(data): State<Shared>,
    Path(id): Path<String>,
    Json(patch): Json<Value>,
) -> Response {
    let mut guard = data.lock().await;
    let data = &mut *guard;
    data.mutations.push(format!("PATCH /cart/{id}"));

    let Some(item) = data.cart.iter_mut().find(|i| id_matches(i, &id)) else {
        return not_found();
    };
    if let (Some(record), Some(fields)) = (item.as_object_mut(), patch.as_object()) {
        for (key, value) in fields {
            record.insert(key.clone(), value.clone());
        }
    }
    Json(item.clone()).into_response()
}

async fn delete_cart_item(State(data): State<Shared>, Path(id): Path<String>) -> Response {
    let mut data = data.lock().await;
    data.mutations.push(format!("DELETE /cart/{id}"));

    let before = data.cart.len();
    data.cart.retain(|i| !id_matches(i, &id));
    if data.cart.len() == before {
        return not_found();
    }
    Json(json!({})).into_response()
}

async fn clear_cart(State(data): State<Shared>) -> StatusCode {
    let mut data = data.lock().await;
    data.mutations.push("DELETE /cart".to_string());
    data.cart.clear();
    StatusCode::OK
}

// =============================================================================
// Storefront Harness
// =============================================================================

/// A rendered response: status, final URL path (after redirects), and body.
#[derive(Debug)]
pub struct Page {
    pub status: reqwest::StatusCode,
    pub path: String,
    pub body: String,
}

/// A storefront served on an ephemeral port in front of a [`MockStore`].
pub struct TestShop {
    pub store: MockStore,
    pub base_url: String,
    client: reqwest::Client,
}

impl TestShop {
    /// Start a mock store with [`sample_products`] and a storefront over it.
    ///
    /// # Errors
    ///
    /// Returns an error if either server cannot start.
    pub async fn start() -> Result<Self, Box<dyn Error>> {
        let store = MockStore::start(sample_products()).await?;
        let base_url = start_storefront(&store.url()).await?;
        let client = reqwest::Client::builder().cookie_store(true).build()?;

        Ok(Self {
            store,
            base_url,
            client,
        })
    }

    /// GET a storefront path, following redirects.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get(&self, path: &str) -> reqwest::Result<Page> {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await?;
        Self::page(response).await
    }

    /// POST a form to a storefront path, following the redirect.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn post(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Result<Page> {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .form(form)
            .send()
            .await?;
        Self::page(response).await
    }

    async fn page(response: reqwest::Response) -> reqwest::Result<Page> {
        let status = response.status();
        let url = response.url();
        let path = match url.query() {
            Some(query) => format!("{}?{query}", url.path()),
            None => url.path().to_string(),
        };
        let body = response.text().await?;
        Ok(Page { status, path, body })
    }
}

/// Serve a storefront backed by `api_url` and return its base URL.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or no port can be bound.
pub async fn start_storefront(api_url: &str) -> Result<String, Box<dyn Error>> {
    let config = StorefrontConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://localhost".to_string(),
        store: StoreApiConfig::new(api_url)?,
        sentry_dsn: None,
        sentry_environment: None,
    };
    let app = build_router(AppState::new(config)?);

    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(format!("http://{addr}"))
}
