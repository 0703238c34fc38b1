//! Catalog listing commands.

use bazaar_core::{format_price, truncate_description};
use bazaar_storefront::api::Product;
use bazaar_storefront::filter::{apply_keyword, select_category, toggle_sort};
use bazaar_storefront::pagination::{Paginator, go_to_page};
use bazaar_storefront::{Location, QueryParams, Route, Storefront};

use super::CliError;

/// Catalog filters from the command line.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    pub keyword: Option<String>,
    pub category: Option<String>,
    pub desc: bool,
    pub page: u32,
}

impl Filters {
    /// The catalog location these filters describe.
    #[must_use]
    pub fn location(&self) -> Location {
        let mut location = Location::new(Route::Products.path(), QueryParams::new());

        if let Some(keyword) = &self.keyword {
            location = apply_keyword(&location, keyword.trim());
        }
        if let Some(category) = &self.category {
            location = select_category(&location, category);
        }
        if self.desc {
            location = toggle_sort(&location);
        }
        if self.page > 1 {
            location = go_to_page(&location, self.page);
        }
        location
    }
}

/// List the products matching `filters`.
///
/// # Errors
///
/// Returns an error if the catalog request fails.
pub async fn products(storefront: &mut Storefront, filters: &Filters) -> Result<(), CliError> {
    let location = filters.location();
    tracing::debug!(href = %location.href(), "Fetching catalog");

    storefront.fetch_products(&location.query).await?;

    let state = storefront.store().products();
    let products = state.products.as_deref().unwrap_or_default();

    if products.is_empty() {
        tracing::info!("No products found");
        return Ok(());
    }

    for product in products {
        tracing::info!(
            id = %product.product_id,
            price = %format_price(product.effective_price()),
            stock = product.quantity,
            "{}",
            product_line(product)
        );
    }

    let paginator = Paginator::new(&location.query, state.total_pages());
    tracing::info!(
        total = state.pagination.total_elements,
        "Page {} of {}",
        paginator.page,
        paginator.total_pages
    );
    if let Some(next) = paginator.next(&location) {
        tracing::info!(next = %next.href(), "More results");
    }

    Ok(())
}

/// One listing line: the name and a shortened description.
fn product_line(product: &Product) -> String {
    format!(
        "{}: {}",
        product.product_name,
        truncate_description(&product.description)
    )
}

/// List every category.
///
/// # Errors
///
/// Returns an error if the category request fails.
pub async fn categories(storefront: &mut Storefront) -> Result<(), CliError> {
    storefront.fetch_categories().await?;

    let categories = storefront
        .store()
        .products()
        .categories
        .as_deref()
        .unwrap_or_default();

    for category in categories {
        tracing::info!(id = %category.category_id, "{}", category.category_name);
    }
    Ok(())
}
