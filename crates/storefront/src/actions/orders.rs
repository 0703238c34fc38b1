//! Order history.

use tracing::instrument;

use crate::error::AppError;
use crate::state::Storefront;
use crate::store::{AuthAction, StatusAction};

impl Storefront {
    /// Load the signed-in user's past orders.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Api` when not signed in or if the request fails.
    #[instrument(skip(self))]
    pub async fn get_user_orders(&mut self) -> Result<(), AppError> {
        let token = self.require_token()?;
        self.store_mut().dispatch(StatusAction::IsFetching);

        match self.api().get_user_orders(&token).await {
            Ok(orders) => {
                tracing::debug!(count = orders.len(), "Orders loaded");
                let store = self.store_mut();
                store.dispatch(AuthAction::UserOrders(orders));
                store.dispatch(StatusAction::IsSuccess);
                Ok(())
            }
            Err(e) => Err(self.request_failed(e, "Failed to fetch orders")),
        }
    }
}
