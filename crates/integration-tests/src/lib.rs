//! End-to-end tests for the Bazaar storefront.
//!
//! [`FakeBackend`] serves the REST API the storefront talks to from an
//! in-memory catalog on an ephemeral port. Tests drive a real
//! [`Storefront`] session against it.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bazaar-integration-tests
//! ```
//!
//! # Fixtures
//!
//! - User `user1` / `password1` (token `test-jwt`)
//! - Products 1 to 4 across the `Electronics` and `Clothing` categories

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Path, Query, RawQuery, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use bazaar_core::{
    AddressId, CartId, CategoryId, OrderId, OrderItemId, ProductId, UserId,
};
use bazaar_storefront::api::{
    Address, AddressInput, CartItemRequest, Category, Order, OrderItem, Page, Pagination,
    Payment, PlaceOrderRequest, Product,
};
use bazaar_storefront::session::{CredentialStore, MemoryCredentialStore};
use bazaar_storefront::{ApiClient, SessionSettings, Storefront, StorefrontConfig};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use url::Url;

pub const USERNAME: &str = "user1";
pub const PASSWORD: &str = "password1";
pub const TOKEN: &str = "test-jwt";
pub const CLIENT_SECRET: &str = "pi_test_secret_123";
pub const PUBLISHABLE_KEY: &str = "pk_test_456";
pub const FRONTEND_URL: &str = "https://shop.example.com";

/// A catalog entry and the category it is listed under.
#[derive(Debug, Clone)]
pub struct Listing {
    pub category: String,
    pub product: Product,
}

/// Everything the fake backend has seen and stores.
#[derive(Debug, Default)]
pub struct BackendState {
    pub listings: Vec<Listing>,
    pub categories: Vec<Category>,
    pub addresses: Vec<Address>,
    pub orders: Vec<Order>,
    pub carts: Vec<Vec<CartItemRequest>>,
    /// Raw query string of every catalog request, in arrival order.
    pub product_queries: Vec<String>,
    /// Amounts of every client secret request, in cents.
    pub secret_amounts: Vec<i64>,
    pub sign_outs: usize,
    next_address_id: i64,
}

/// In-process HTTP server standing in for the backend.
pub struct FakeBackend {
    base_url: Url,
    state: Arc<Mutex<BackendState>>,
    handle: JoinHandle<()>,
}

type Shared = Arc<Mutex<BackendState>>;

fn lock(state: &Shared) -> MutexGuard<'_, BackendState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl FakeBackend {
    /// Start the server with the default fixtures.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn spawn() -> Self {
        let state: Shared = Arc::new(Mutex::new(BackendState {
            listings: fixture_listings(),
            categories: fixture_categories(),
            next_address_id: 1,
            ..BackendState::default()
        }));

        let app = Router::new()
            .route("/api/public/products", get(list_products))
            .route("/api/public/categories", get(list_categories))
            .route("/api/auth/signin", post(sign_in))
            .route("/api/auth/signup", post(sign_up))
            .route("/api/auth/signout", post(sign_out))
            .route("/api/users/addresses", get(list_addresses))
            .route("/api/addresses", post(create_address))
            .route(
                "/api/addresses/{id}",
                put(update_address).delete(delete_address),
            )
            .route("/api/cart/create", post(create_cart))
            .route("/api/order/stripe-client-secret", post(client_secret))
            .route("/api/order/users/payments/{method}", post(place_order))
            .route("/api/orders/users", get(list_orders))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake backend");
        let addr = listener.local_addr().expect("local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let base_url = Url::parse(&format!("http://{addr}/api")).expect("base url");
        Self {
            base_url,
            state,
            handle,
        }
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Inspect or modify the backend's state.
    pub fn state(&self) -> MutexGuard<'_, BackendState> {
        lock(&self.state)
    }

    /// Configuration pointing at this backend.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is rejected.
    #[must_use]
    pub fn config(&self) -> StorefrontConfig {
        let api_url = self.base_url.to_string();
        StorefrontConfig::from_lookup(move |key| match key {
            "BAZAAR_API_URL" => Some(api_url.clone()),
            "BAZAAR_PAGE_SIZE" => Some("2".to_string()),
            "BAZAAR_FRONTEND_URL" => Some(FRONTEND_URL.to_string()),
            "STRIPE_PUBLISHABLE_KEY" => Some(PUBLISHABLE_KEY.to_string()),
            _ => None,
        })
        .expect("fake backend config")
    }

    /// A fresh session with an in-memory credential store.
    #[must_use]
    pub fn storefront(&self) -> (Storefront, Arc<MemoryCredentialStore>) {
        let credentials = Arc::new(MemoryCredentialStore::new());
        let storefront = self.storefront_with(Arc::clone(&credentials) as Arc<dyn CredentialStore>);
        (storefront, credentials)
    }

    /// A session backed by `credentials`.
    ///
    /// # Panics
    ///
    /// Panics if the session cannot be created.
    #[must_use]
    pub fn storefront_with(&self, credentials: Arc<dyn CredentialStore>) -> Storefront {
        let config = self.config();
        let api = ApiClient::new(&config).expect("api client");
        let settings = SessionSettings::from_config(&config).expect("session settings");
        Storefront::new(api, credentials, settings).expect("storefront")
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// =============================================================================
// Fixtures
// =============================================================================

#[must_use]
pub fn product(id: i64, name: &str, price: i64, quantity: u32) -> Product {
    Product {
        product_id: ProductId::new(id),
        product_name: name.to_string(),
        image: format!("https://img.example.com/{id}.png"),
        description: format!("{name} description"),
        quantity,
        price: Decimal::from(price),
        discount: Decimal::ZERO,
        special_price: None,
    }
}

fn fixture_listings() -> Vec<Listing> {
    let mut headphones = product(2, "Headphones", 150, 3);
    headphones.special_price = Some(Decimal::from(120));

    vec![
        Listing {
            category: "Electronics".to_string(),
            product: product(1, "Phone", 100, 5),
        },
        Listing {
            category: "Electronics".to_string(),
            product: headphones,
        },
        Listing {
            category: "Clothing".to_string(),
            product: product(3, "Shirt", 25, 10),
        },
        Listing {
            category: "Clothing".to_string(),
            product: product(4, "Scarf", 40, 0),
        },
    ]
}

fn fixture_categories() -> Vec<Category> {
    ["Electronics", "Clothing"]
        .into_iter()
        .zip(1..)
        .map(|(name, id)| Category {
            category_id: CategoryId::new(id),
            category_name: name.to_string(),
        })
        .collect()
}

// =============================================================================
// Handlers
// =============================================================================

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

fn unauthorized() -> Response {
    message(StatusCode::UNAUTHORIZED, "Full authentication is required")
}

fn paginate<T: Clone>(items: &[T], page_number: u32, page_size: u32) -> Page<T> {
    let size = page_size.max(1) as usize;
    let total = items.len();
    let total_pages = total.div_ceil(size);
    let content = items
        .iter()
        .skip(page_number as usize * size)
        .take(size)
        .cloned()
        .collect();

    Page {
        content,
        pagination: Pagination {
            page_number,
            page_size,
            total_elements: total as u64,
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
            last_page: page_number as usize + 1 >= total_pages,
        },
    }
}

async fn list_products(
    State(state): State<Shared>,
    RawQuery(raw): RawQuery,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut state = lock(&state);
    state.product_queries.push(raw.unwrap_or_default());

    let keyword = params.get("keyword").map(|k| k.to_lowercase());
    let category = params.get("category");

    let mut products: Vec<Product> = state
        .listings
        .iter()
        .filter(|l| category.is_none_or(|c| &l.category == c))
        .filter(|l| {
            keyword
                .as_deref()
                .is_none_or(|k| l.product.product_name.to_lowercase().contains(k))
        })
        .map(|l| l.product.clone())
        .collect();

    products.sort_by_key(Product::effective_price);
    if params.get("sortOrder").map(String::as_str) == Some("desc") {
        products.reverse();
    }

    let page_number = params
        .get("pageNumber")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let page_size = params
        .get("pageSize")
        .and_then(|v| v.parse().ok())
        .unwrap_or(50);

    Json(paginate(&products, page_number, page_size)).into_response()
}

async fn list_categories(State(state): State<Shared>) -> Response {
    let state = lock(&state);
    Json(paginate(&state.categories, 0, 100)).into_response()
}

async fn sign_in(Json(body): Json<Value>) -> Response {
    let username = body["username"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    if username != USERNAME || password != PASSWORD {
        return message(StatusCode::UNAUTHORIZED, "Bad credentials");
    }

    Json(json!({
        "id": 1,
        "username": USERNAME,
        "email": "user1@example.com",
        "roles": ["ROLE_USER"],
        "jwtToken": TOKEN,
    }))
    .into_response()
}

async fn sign_up(Json(body): Json<Value>) -> Response {
    if body["username"].as_str() == Some(USERNAME) {
        return message(StatusCode::BAD_REQUEST, "Error: Username is already taken!");
    }
    message(StatusCode::OK, "User registered successfully!")
}

async fn sign_out(State(state): State<Shared>) -> Response {
    lock(&state).sign_outs += 1;
    message(StatusCode::OK, "You've been signed out!")
}

async fn list_addresses(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(lock(&state).addresses.clone()).into_response()
}

async fn create_address(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(input): Json<AddressInput>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }

    let mut state = lock(&state);
    let address = Address {
        address_id: AddressId::new(state.next_address_id),
        city: input.city,
        street: input.street,
        postcode: input.postcode,
        country: input.country,
    };
    state.next_address_id += 1;
    state.addresses.push(address.clone());

    (StatusCode::CREATED, Json(address)).into_response()
}

async fn update_address(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(input): Json<AddressInput>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }

    let mut state = lock(&state);
    let Some(address) = state
        .addresses
        .iter_mut()
        .find(|a| a.address_id == AddressId::new(id))
    else {
        return message(StatusCode::NOT_FOUND, "Address not found");
    };

    address.city = input.city;
    address.street = input.street;
    address.postcode = input.postcode;
    address.country = input.country;
    Json(address.clone()).into_response()
}

async fn delete_address(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }

    let mut state = lock(&state);
    let before = state.addresses.len();
    state.addresses.retain(|a| a.address_id != AddressId::new(id));

    if state.addresses.len() == before {
        return message(StatusCode::NOT_FOUND, "Address not found");
    }
    (StatusCode::OK, "Address deleted successfully").into_response()
}

async fn create_cart(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(items): Json<Vec<CartItemRequest>>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }

    let mut state = lock(&state);
    let total: Decimal = items
        .iter()
        .filter_map(|item| {
            state
                .listings
                .iter()
                .find(|l| l.product.product_id == item.product_id)
                .map(|l| l.product.effective_price() * Decimal::from(item.quantity))
        })
        .sum();

    state.carts.push(items);
    let cart_id = CartId::new(i64::try_from(state.carts.len()).unwrap_or(i64::MAX));

    (
        StatusCode::CREATED,
        Json(json!({ "cartId": cart_id, "totalPrice": total })),
    )
        .into_response()
}

async fn client_secret(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }

    let Some(amount) = body["amount"].as_i64() else {
        return message(StatusCode::BAD_REQUEST, "Amount is required");
    };
    lock(&state).secret_amounts.push(amount);

    (StatusCode::CREATED, CLIENT_SECRET).into_response()
}

async fn place_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(method): Path<String>,
    Json(request): Json<PlaceOrderRequest>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }

    let mut state = lock(&state);
    let Some(items) = state.carts.last().cloned() else {
        return message(StatusCode::NOT_FOUND, "Cart not found");
    };
    if !state.addresses.iter().any(|a| a.address_id == request.address_id) {
        return message(StatusCode::NOT_FOUND, "Address not found");
    }

    let mut order_items = Vec::with_capacity(items.len());
    for (item, id) in items.iter().zip(1..) {
        let Some(listing) = state
            .listings
            .iter_mut()
            .find(|l| l.product.product_id == item.product_id)
        else {
            return message(StatusCode::NOT_FOUND, "Product not found");
        };
        listing.product.quantity = listing.product.quantity.saturating_sub(item.quantity);

        order_items.push(OrderItem {
            order_item_id: OrderItemId::new(id),
            ordered_product_price: listing.product.effective_price(),
            product: listing.product.clone(),
            quantity: item.quantity,
        });
    }

    let total_amount = order_items.iter().map(OrderItem::line_total).sum();
    let order_id = OrderId::new(i64::try_from(state.orders.len()).unwrap_or(i64::MAX) + 1);

    let order = Order {
        order_id,
        email: "user1@example.com".to_string(),
        order_date: chrono::NaiveDate::from_ymd_opt(2026, 1, 15).unwrap_or_default(),
        order_items,
        payment: Payment {
            payment_id: Some(order_id.as_i64()),
            payment_method: method,
            pg_payment_id: Some(request.pg_payment_id),
            pg_status: Some(request.pg_status),
            pg_response_message: Some(request.pg_response_message),
            pg_name: Some(request.pg_name),
        },
        total_amount,
        order_status: "Order Accepted !".to_string(),
        address_id: request.address_id,
    };
    state.orders.push(order.clone());

    (StatusCode::CREATED, Json(order)).into_response()
}

async fn list_orders(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(lock(&state).orders.clone()).into_response()
}

/// Fixture user id, for assertions.
#[must_use]
pub const fn fixture_user_id() -> UserId {
    UserId::new(1)
}
