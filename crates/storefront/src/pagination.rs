//! Page navigation through the `page` query key.

use crate::query::{Location, QueryParams};

pub const PAGE_KEY: &str = "page";

/// One-based page in the query; 1 when absent, unparsable or zero.
#[must_use]
pub fn current_page(query: &QueryParams) -> u32 {
    query
        .get(PAGE_KEY)
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|&page| page >= 1)
        .unwrap_or(1)
}

/// Location of `page`, with every other key kept verbatim and in place.
#[must_use]
pub fn go_to_page(location: &Location, page: u32) -> Location {
    let mut query = location.query.clone();
    query.set(PAGE_KEY, page.max(1).to_string());
    Location::new(location.path.clone(), query)
}

/// Previous/next controls for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    pub page: u32,
    pub total_pages: u32,
}

impl Paginator {
    #[must_use]
    pub fn new(query: &QueryParams, total_pages: u32) -> Self {
        Self {
            page: current_page(query),
            total_pages: total_pages.max(1),
        }
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Location of the previous page, `None` on the first page.
    #[must_use]
    pub fn previous(&self, location: &Location) -> Option<Location> {
        self.has_previous()
            .then(|| go_to_page(location, self.page - 1))
    }

    /// Location of the next page, `None` on the last page.
    #[must_use]
    pub fn next(&self, location: &Location) -> Option<Location> {
        self.has_next().then(|| go_to_page(location, self.page + 1))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_current_page_defaults_to_one() {
        assert_eq!(current_page(&QueryParams::parse("category=phones")), 1);
        assert_eq!(current_page(&QueryParams::parse("page=abc")), 1);
        assert_eq!(current_page(&QueryParams::parse("page=0")), 1);
        assert_eq!(current_page(&QueryParams::parse("page=4")), 4);
    }

    #[test]
    fn test_next_preserves_other_keys() {
        let location =
            Location::parse("/products?page=2&category=phones&sortby=desc&keyword=iphone");
        let paginator = Paginator::new(&location.query, 5);

        assert_eq!(
            paginator.next(&location).unwrap().href(),
            "/products?page=3&category=phones&sortby=desc&keyword=iphone"
        );
        assert_eq!(
            paginator.previous(&location).unwrap().href(),
            "/products?page=1&category=phones&sortby=desc&keyword=iphone"
        );
    }

    #[test]
    fn test_page_key_appended_when_absent() {
        let location = Location::parse("/products?category=phones");
        assert_eq!(
            go_to_page(&location, 2).href(),
            "/products?category=phones&page=2"
        );
    }

    #[test]
    fn test_bounds() {
        let first = Paginator::new(&QueryParams::new(), 5);
        assert!(!first.has_previous());
        assert!(first.has_next());
        assert!(first.previous(&Location::parse("/products")).is_none());

        let last = Paginator::new(&QueryParams::parse("page=5"), 5);
        assert!(last.has_previous());
        assert!(!last.has_next());
    }
}
