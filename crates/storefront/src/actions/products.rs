//! Catalog actions.

use tracing::instrument;

use crate::error::AppError;
use crate::filter::FilterState;
use crate::query::QueryParams;
use crate::state::Storefront;
use crate::store::{ProductAction, StatusAction};

impl Storefront {
    /// Load the product page described by the current query.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Api` if the request fails; the message is also
    /// written to the shared error slice.
    #[instrument(skip(self), fields(query = %query))]
    pub async fn fetch_products(&mut self, query: &QueryParams) -> Result<(), AppError> {
        let request = FilterState::from_query(query).product_request(self.page_size());
        self.store_mut().dispatch(StatusAction::IsFetching);

        match self.api().get_products(&request).await {
            Ok(page) => {
                tracing::debug!(count = page.content.len(), "Products loaded");
                let store = self.store_mut();
                store.dispatch(ProductAction::FetchProducts {
                    products: page.content,
                    pagination: page.pagination,
                });
                store.dispatch(StatusAction::IsSuccess);
                Ok(())
            }
            Err(e) => Err(self.request_failed(e, "Failed to fetch products")),
        }
    }

    /// Load the category list for the filter dropdown.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Api` if the request fails; the message is written
    /// to the category error field.
    #[instrument(skip(self))]
    pub async fn fetch_categories(&mut self) -> Result<(), AppError> {
        self.store_mut().dispatch(StatusAction::CategoryLoader);

        match self.api().get_categories().await {
            Ok(page) => {
                let store = self.store_mut();
                store.dispatch(ProductAction::FetchCategories {
                    categories: page.content,
                    pagination: page.pagination,
                });
                store.dispatch(StatusAction::CategorySuccess);
                Ok(())
            }
            Err(e) => {
                let message = e
                    .server_message()
                    .unwrap_or("Failed to fetch categories")
                    .to_string();
                self.store_mut()
                    .dispatch(StatusAction::CategoryError(message));
                let err = AppError::from(e);
                err.report();
                Err(err)
            }
        }
    }
}
