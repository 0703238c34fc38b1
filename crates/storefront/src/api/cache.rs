//! Cache types for catalog responses.

use super::types::{Category, Page, Product, ProductRequest};

/// Cache key for catalog listings.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products(ProductRequest),
    Categories,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Page<Product>),
    Categories(Page<Category>),
}
