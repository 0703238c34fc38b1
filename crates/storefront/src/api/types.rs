//! Wire types for the backend REST API.
//!
//! Field names are camelCase on the wire.

use bazaar_core::{
    AddressId, CartId, CategoryId, OrderId, OrderItemId, PaymentMethod, ProductId, SortOrder,
    UserId,
};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use url::form_urlencoded;

// =============================================================================
// Catalog
// =============================================================================

/// A product as listed by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: ProductId,
    pub product_name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    /// Units in stock.
    pub quantity: u32,
    pub price: Decimal,
    #[serde(default)]
    pub discount: Decimal,
    #[serde(default)]
    pub special_price: Option<Decimal>,
}

impl Product {
    /// Price actually charged: the special price when present, else the list price.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        self.special_price.unwrap_or(self.price)
    }

    /// Whether any units are available.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub category_id: CategoryId,
    pub category_name: String,
}

/// Paging metadata returned alongside list responses.
///
/// `page_number` is zero-based as sent by the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page_number: u32,
    pub page_size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    pub last_page: bool,
}

/// A page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    #[serde(flatten)]
    pub pagination: Pagination,
}

/// Parameters of a catalog listing request.
///
/// `page_number` is zero-based, matching the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductRequest {
    pub page_number: u32,
    pub page_size: u32,
    pub sort_by: String,
    pub sort_order: SortOrder,
    pub keyword: Option<String>,
    pub category: Option<String>,
}

impl ProductRequest {
    /// Encode as a query string. Optional filters are appended only when set.
    #[must_use]
    pub fn query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer
            .append_pair("pageNumber", &self.page_number.to_string())
            .append_pair("pageSize", &self.page_size.to_string())
            .append_pair("sortBy", &self.sort_by)
            .append_pair("sortOrder", self.sort_order.as_str());
        if let Some(keyword) = &self.keyword {
            serializer.append_pair("keyword", keyword);
        }
        if let Some(category) = &self.category {
            serializer.append_pair("category", category);
        }
        serializer.finish()
    }
}

// =============================================================================
// Auth
// =============================================================================

/// Signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Credentials submitted by the login form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub username: String,
    #[serde(serialize_with = "serialize_secret")]
    pub password: SecretString,
}

/// Successful sign-in: the user plus the bearer token.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    #[serde(flatten)]
    pub user: User,
    #[serde(deserialize_with = "deserialize_secret")]
    pub jwt_token: SecretString,
}

/// Registration form payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub username: String,
    pub email: String,
    #[serde(serialize_with = "serialize_secret")]
    pub password: SecretString,
}

/// Secrets go over the wire as plain strings but stay redacted in `Debug`.
fn serialize_secret<S: Serializer>(
    secret: &SecretString,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

fn deserialize_secret<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(SecretString::from)
}

/// Generic `{ "message": ... }` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

// =============================================================================
// Addresses
// =============================================================================

/// A saved shipping address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub address_id: AddressId,
    pub city: String,
    pub street: String,
    pub postcode: String,
    pub country: String,
}

/// Address form payload for create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    pub city: String,
    pub street: String,
    pub postcode: String,
    pub country: String,
}

impl From<&Address> for AddressInput {
    fn from(address: &Address) -> Self {
        Self {
            city: address.city.clone(),
            street: address.street.clone(),
            postcode: address.postcode.clone(),
            country: address.country.clone(),
        }
    }
}

// =============================================================================
// Cart & Orders
// =============================================================================

/// One line of the cart sync request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Server-side cart created from the local lines.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub cart_id: CartId,
    #[serde(default)]
    pub total_price: Decimal,
}

/// Request body for a card payment intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSecretRequest {
    /// Amount in the smallest currency unit (cents).
    pub amount: i64,
    pub currency: String,
}

/// Confirmed payment submitted to place the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub address_id: AddressId,
    pub pg_name: String,
    pub pg_payment_id: String,
    pub pg_status: String,
    pub pg_response_message: String,
}

/// Payment record attached to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(default)]
    pub payment_id: Option<i64>,
    pub payment_method: String,
    #[serde(default)]
    pub pg_payment_id: Option<String>,
    #[serde(default)]
    pub pg_status: Option<String>,
    #[serde(default)]
    pub pg_response_message: Option<String>,
    #[serde(default)]
    pub pg_name: Option<String>,
}

impl Payment {
    /// Parsed payment method, when it is one the storefront knows.
    #[must_use]
    pub fn method(&self) -> Option<PaymentMethod> {
        self.payment_method.parse().ok()
    }
}

/// A line of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub order_item_id: OrderItemId,
    pub product: Product,
    pub quantity: u32,
    pub ordered_product_price: Decimal,
}

impl OrderItem {
    /// Quantity times the price paid.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.ordered_product_price * Decimal::from(self.quantity)
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: OrderId,
    pub email: String,
    pub order_date: chrono::NaiveDate,
    #[serde(default)]
    pub order_items: Vec<OrderItem>,
    pub payment: Payment,
    pub total_amount: Decimal,
    pub order_status: String,
    pub address_id: AddressId,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_product_page_deserialize() {
        let json = r#"{
            "content": [{
                "productId": 1,
                "productName": "iPhone 15",
                "image": "iphone.png",
                "description": "A phone",
                "quantity": 5,
                "price": 999.0,
                "discount": 10.0,
                "specialPrice": 899.1
            }],
            "pageNumber": 0,
            "pageSize": 50,
            "totalElements": 1,
            "totalPages": 1,
            "lastPage": true
        }"#;

        let page: Page<Product> = serde_json::from_str(json).unwrap();
        assert_eq!(page.content.len(), 1);
        let product = &page.content[0];
        assert_eq!(product.product_id, ProductId::new(1));
        assert_eq!(product.effective_price(), Decimal::from_str("899.1").unwrap());
        assert!(page.pagination.last_page);
        assert_eq!(page.pagination.page_size, 50);
    }

    #[test]
    fn test_product_request_query_string() {
        let request = ProductRequest {
            page_number: 2,
            page_size: 50,
            sort_by: "price".to_string(),
            sort_order: SortOrder::Desc,
            keyword: Some("usb c".to_string()),
            category: None,
        };
        assert_eq!(
            request.query_string(),
            "pageNumber=2&pageSize=50&sortBy=price&sortOrder=desc&keyword=usb+c"
        );
    }

    #[test]
    fn test_effective_price_falls_back_to_price() {
        let json = r#"{"productId": 2, "productName": "Cable", "quantity": 0, "price": 5}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.effective_price(), Decimal::from(5));
        assert!(!product.in_stock());
    }

    #[test]
    fn test_sign_in_response_flattens_user() {
        let json = r#"{"id": 7, "username": "user1", "roles": ["ROLE_USER"], "jwtToken": "abc"}"#;
        let response: SignInResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.user.username, "user1");
        assert_eq!(response.user.id, UserId::new(7));
        assert_eq!(response.jwt_token.expose_secret(), "abc");
        assert!(!format!("{response:?}").contains("abc"));
    }

    #[test]
    fn test_sign_up_request_redacts_password() {
        let request = SignUpRequest {
            username: "user1".to_string(),
            email: "user1@example.com".to_string(),
            password: SecretString::from("hunter22"),
        };
        assert!(!format!("{request:?}").contains("hunter22"));

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["password"], "hunter22");
        assert_eq!(value["email"], "user1@example.com");
    }

    #[test]
    fn test_place_order_request_is_camel_case() {
        let request = PlaceOrderRequest {
            address_id: AddressId::new(3),
            pg_name: "Stripe".to_string(),
            pg_payment_id: "pi_123".to_string(),
            pg_status: "succeeded".to_string(),
            pg_response_message: "Payment successful".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["addressId"], 3);
        assert_eq!(value["pgPaymentId"], "pi_123");
    }

    #[test]
    fn test_order_item_line_total() {
        let json = r#"{
            "orderItemId": 1,
            "product": {"productId": 1, "productName": "Mouse", "quantity": 3, "price": 25},
            "quantity": 2,
            "orderedProductPrice": 20.5
        }"#;
        let item: OrderItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.line_total(), Decimal::from(41));
    }

    #[test]
    fn test_unknown_payment_method() {
        let payment = Payment {
            payment_id: None,
            payment_method: "Crypto".to_string(),
            pg_payment_id: None,
            pg_status: None,
            pg_response_message: None,
            pg_name: None,
        };
        assert_eq!(payment.method(), None);
    }
}
