//! Catalog filters kept in the URL query.
//!
//! Query keys: `category`, `sortby`, `keyword`, `page`. Every filter edit
//! produces the location to navigate to; the typed [`FilterState`] is always
//! re-derived from the query rather than stored.

use bazaar_core::SortOrder;

use crate::api::ProductRequest;
use crate::pagination;
use crate::query::{Location, QueryParams};

pub const CATEGORY_KEY: &str = "category";
pub const SORT_KEY: &str = "sortby";
pub const KEYWORD_KEY: &str = "keyword";

/// Category value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "all";

/// Field the catalog is sorted by.
pub const SORT_FIELD: &str = "price";

/// Typed view of the catalog query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub keyword: Option<String>,
    pub category: Option<String>,
    pub sort_order: SortOrder,
    /// One-based page number.
    pub page: u32,
}

impl FilterState {
    /// Derive filters from the query. Missing or unparsable values take
    /// their defaults; `category=all` and empty values count as absent.
    #[must_use]
    pub fn from_query(query: &QueryParams) -> Self {
        let non_empty = |key: &str| {
            query
                .get(key)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Self {
            keyword: non_empty(KEYWORD_KEY),
            category: non_empty(CATEGORY_KEY).filter(|c| c != ALL_CATEGORIES),
            sort_order: sort_order(query),
            page: pagination::current_page(query),
        }
    }

    /// Backend request for this filter. The server counts pages from zero.
    #[must_use]
    pub fn product_request(&self, page_size: u32) -> ProductRequest {
        ProductRequest {
            page_number: self.page.saturating_sub(1),
            page_size,
            sort_by: SORT_FIELD.to_string(),
            sort_order: self.sort_order,
            keyword: self.keyword.clone(),
            category: self.category.clone(),
        }
    }

    /// Category to show as selected in the dropdown.
    #[must_use]
    pub fn selected_category(&self) -> &str {
        self.category.as_deref().unwrap_or(ALL_CATEGORIES)
    }
}

/// Sort order in the query; absent or unrecognized means ascending.
#[must_use]
pub fn sort_order(query: &QueryParams) -> SortOrder {
    query
        .get(SORT_KEY)
        .and_then(|v| v.parse().ok())
        .unwrap_or_default()
}

/// Select a category. `"all"` removes the filter.
#[must_use]
pub fn select_category(location: &Location, category: &str) -> Location {
    let mut query = location.query.clone();
    if category == ALL_CATEGORIES {
        query.remove(CATEGORY_KEY);
    } else {
        query.set(CATEGORY_KEY, category);
    }
    Location::new(location.path.clone(), query)
}

/// Flip the sort order between ascending and descending.
#[must_use]
pub fn toggle_sort(location: &Location) -> Location {
    let mut query = location.query.clone();
    let next = sort_order(&query).toggle();
    query.set(SORT_KEY, next.as_str());
    Location::new(location.path.clone(), query)
}

/// Commit a search keyword. An empty keyword removes the filter.
#[must_use]
pub fn apply_keyword(location: &Location, keyword: &str) -> Location {
    let mut query = location.query.clone();
    if keyword.is_empty() {
        query.remove(KEYWORD_KEY);
    } else {
        query.set(KEYWORD_KEY, keyword);
    }
    Location::new(location.path.clone(), query)
}

/// Drop every filter: the current path with no query at all.
#[must_use]
pub fn clear_filters(location: &Location) -> Location {
    Location::new(location.path.clone(), QueryParams::new())
}
