//! Backend REST API client.
//!
//! Talks to the store backend over JSON. Public catalog endpoints are cached
//! with `moka`; account endpoints take the caller's bearer token.
//!
//! # Example
//!
//! ```rust,ignore
//! use bazaar_storefront::api::ApiClient;
//!
//! let client = ApiClient::new(&config)?;
//! let categories = client.get_categories().await?;
//! ```

mod cache;
pub mod types;

use std::sync::Arc;

use bazaar_core::{AddressId, PaymentMethod};
use moka::future::Cache;
use reqwest::{RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::config::StorefrontConfig;
use cache::{CacheKey, CacheValue};
pub use types::*;

/// Page size used when listing categories for the filter dropdown.
pub const CATEGORY_PAGE_SIZE: u32 = 100;

/// Maximum number of cached catalog responses.
const CACHE_CAPACITY: u64 = 1000;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: StatusCode, message: String },

    /// The call needs a signed-in user but no token is held.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Response body did not match the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// Message to show the shopper, when the failure carries one.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => Some(message),
            Self::NotAuthenticated => Some("Please login to continue"),
            Self::Http(_) | Self::Parse(_) | Self::InvalidUrl(_) => None,
        }
    }

    /// HTTP status, for errors returned by the backend.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Client for the backend REST API.
///
/// Cheap to clone; clones share the connection pool and the catalog cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &StorefrontConfig) -> Result<Self, ApiError> {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(config.cache_ttl)
            .build();

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        // Joining relative paths replaces the last segment unless the base ends with '/'
        let mut base_url = config.api_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url,
                cache,
            }),
        })
    }

    /// Base URL all endpoint paths are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Send a request and return the raw body of a successful response.
    async fn send_raw(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<MessageResponse>(&body).map_or_else(
                |_| status.canonical_reason().unwrap_or("Request failed").to_string(),
                |m| m.message,
            );
            tracing::warn!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(ApiError::Api { status, message });
        }

        Ok(body)
    }

    /// Send a request and decode the JSON body.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send_raw(request).await?;

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            ApiError::Parse(e.to_string())
        })
    }

    fn get(&self, url: Url) -> RequestBuilder {
        self.inner.client.get(url)
    }

    fn post(&self, url: Url) -> RequestBuilder {
        self.inner.client.post(url)
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// List a page of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(page = request.page_number))]
    pub async fn get_products(&self, request: &ProductRequest) -> Result<Page<Product>, ApiError> {
        let cache_key = CacheKey::Products(request.clone());

        if let Some(CacheValue::Products(page)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(page);
        }

        let mut url = self.endpoint("public/products")?;
        url.set_query(Some(&request.query_string()));

        let page: Page<Product> = self.send(self.get(url)).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(page.clone()))
            .await;

        Ok(page)
    }

    /// List product categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_categories(&self) -> Result<Page<Category>, ApiError> {
        if let Some(CacheValue::Categories(page)) = self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(page);
        }

        let mut url = self.endpoint("public/categories")?;
        url.query_pairs_mut()
            .append_pair("pageSize", &CATEGORY_PAGE_SIZE.to_string());

        let page: Page<Category> = self.send(self.get(url)).await?;

        self.inner
            .cache
            .insert(CacheKey::Categories, CacheValue::Categories(page.clone()))
            .await;

        Ok(page)
    }

    /// Drop every cached catalog response.
    pub fn invalidate_catalog(&self) {
        self.inner.cache.invalidate_all();
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Exchange credentials for a user and bearer token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with the server message on bad credentials.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn sign_in(&self, request: &SignInRequest) -> Result<SignInResponse, ApiError> {
        let url = self.endpoint("auth/signin")?;
        self.send(self.post(url).json(request)).await
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with the server message if registration is refused.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<MessageResponse, ApiError> {
        let url = self.endpoint("auth/signup")?;
        self.send(self.post(url).json(request)).await
    }

    /// End the server-side session.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip_all)]
    pub async fn sign_out(&self, token: &SecretString) -> Result<(), ApiError> {
        let url = self.endpoint("auth/signout")?;
        self.send_raw(self.post(url).bearer_auth(token.expose_secret()))
            .await?;
        Ok(())
    }

    // =========================================================================
    // Addresses
    // =========================================================================

    /// List the signed-in user's saved addresses.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip_all)]
    pub async fn get_user_addresses(&self, token: &SecretString) -> Result<Vec<Address>, ApiError> {
        let url = self.endpoint("users/addresses")?;
        self.send(self.get(url).bearer_auth(token.expose_secret()))
            .await
    }

    /// Save a new address.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip_all)]
    pub async fn create_address(
        &self,
        token: &SecretString,
        input: &AddressInput,
    ) -> Result<Address, ApiError> {
        let url = self.endpoint("addresses")?;
        self.send(self.post(url).bearer_auth(token.expose_secret()).json(input))
            .await
    }

    /// Replace an existing address.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token, input))]
    pub async fn update_address(
        &self,
        token: &SecretString,
        address_id: AddressId,
        input: &AddressInput,
    ) -> Result<Address, ApiError> {
        let url = self.endpoint(&format!("addresses/{address_id}"))?;
        let request = self
            .inner
            .client
            .put(url)
            .bearer_auth(token.expose_secret())
            .json(input);
        self.send(request).await
    }

    /// Delete a saved address.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn delete_address(
        &self,
        token: &SecretString,
        address_id: AddressId,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("addresses/{address_id}"))?;
        let request = self
            .inner
            .client
            .delete(url)
            .bearer_auth(token.expose_secret());
        self.send_raw(request).await?;
        Ok(())
    }

    // =========================================================================
    // Cart & Orders
    // =========================================================================

    /// Create the server-side cart from local lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip_all, fields(lines = items.len()))]
    pub async fn create_cart(
        &self,
        token: &SecretString,
        items: &[CartItemRequest],
    ) -> Result<CartResponse, ApiError> {
        let url = self.endpoint("cart/create")?;
        self.send(self.post(url).bearer_auth(token.expose_secret()).json(items))
            .await
    }

    /// Create a card payment intent and return its client secret.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token), fields(amount = request.amount))]
    pub async fn create_stripe_client_secret(
        &self,
        token: &SecretString,
        request: &ClientSecretRequest,
    ) -> Result<SecretString, ApiError> {
        let url = self.endpoint("order/stripe-client-secret")?;
        let body = self
            .send_raw(self.post(url).bearer_auth(token.expose_secret()).json(request))
            .await?;

        // The secret arrives either as a bare string or as a JSON string literal
        let secret = serde_json::from_str::<String>(&body).unwrap_or(body);
        Ok(SecretString::from(secret))
    }

    /// Place an order for a confirmed payment.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token, request, method), fields(method = %method))]
    pub async fn place_order(
        &self,
        token: &SecretString,
        method: PaymentMethod,
        request: &PlaceOrderRequest,
    ) -> Result<Order, ApiError> {
        let url = self.endpoint(&format!("order/users/payments/{}", method.as_str()))?;
        let order: Order = self
            .send(self.post(url).bearer_auth(token.expose_secret()).json(request))
            .await?;

        // Stock levels changed
        self.invalidate_catalog();

        Ok(order)
    }

    /// List the signed-in user's orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip_all)]
    pub async fn get_user_orders(&self, token: &SecretString) -> Result<Vec<Order>, ApiError> {
        let url = self.endpoint("orders/users")?;
        self.send(self.get(url).bearer_auth(token.expose_secret()))
            .await
    }
}
