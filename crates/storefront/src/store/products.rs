//! Catalog slice: the current product page and the category list.

use crate::api::{Category, Pagination, Product};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductAction {
    FetchProducts {
        products: Vec<Product>,
        pagination: Pagination,
    },
    FetchCategories {
        categories: Vec<Category>,
        pagination: Pagination,
    },
}

/// Catalog state. `None` means not loaded yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductState {
    pub products: Option<Vec<Product>>,
    pub categories: Option<Vec<Category>>,
    /// Pagination of the product listing.
    pub pagination: Pagination,
    pub category_pagination: Pagination,
}

impl ProductState {
    pub fn reduce(&mut self, action: ProductAction) {
        match action {
            ProductAction::FetchProducts {
                products,
                pagination,
            } => {
                self.products = Some(products);
                self.pagination = pagination;
            }
            ProductAction::FetchCategories {
                categories,
                pagination,
            } => {
                self.categories = Some(categories);
                self.category_pagination = pagination;
            }
        }
    }

    /// Total pages of the last listing, at least 1.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        self.pagination.total_pages.max(1)
    }
}
