//! Sign-in, registration and sign-out.

use secrecy::SecretString;
use tracing::instrument;

use crate::api::{SignInRequest, SignUpRequest};
use crate::error::{AppError, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::routes::Route;
use crate::state::Storefront;
use crate::store::{AuthAction, CartAction, Notice};
use crate::validation::{FormData, LOGIN_FORM, REGISTER_FORM};

impl Storefront {
    /// Sign in with the login form's `username` and `password`.
    ///
    /// On success the token is persisted and the route to navigate to is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` (no request sent) for an incomplete
    /// form, or `AppError::Api` when the backend refuses the credentials.
    #[instrument(skip_all, fields(username = %form.get("username")))]
    pub async fn authenticate_sign_in_user(&mut self, form: &FormData) -> Result<Route, AppError> {
        LOGIN_FORM.validate(form)?;

        let request = SignInRequest {
            username: form.get("username").to_string(),
            password: SecretString::from(form.get("password")),
        };

        let response = match self.api().sign_in(&request).await {
            Ok(response) => response,
            Err(e) => return Err(self.notify_failure(e, "Internal Server Error")),
        };

        let jwt = response.jwt_token;
        if let Err(e) = self.credentials().save(&jwt) {
            // The session still works; it just won't survive a restart
            tracing::warn!(error = %e, "Failed to persist credential");
        }

        let user = response.user;
        set_sentry_user(&user.id, &user.username, user.email.as_deref());
        add_breadcrumb("auth", "Signed in", None);

        let store = self.store_mut();
        store.dispatch(AuthAction::LoginUser { user, jwt });
        store.notify(Notice::success("Login Success"));

        Ok(Route::Profile)
    }

    /// Register a new account from the registration form.
    ///
    /// Returns the route to navigate to (the login page).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` (no request sent) for an invalid form,
    /// or `AppError::Api` when the backend refuses the registration.
    #[instrument(skip_all, fields(username = %form.get("username")))]
    pub async fn register_new_user(&mut self, form: &FormData) -> Result<Route, AppError> {
        REGISTER_FORM.validate(form)?;

        let request = SignUpRequest {
            username: form.get("username").to_string(),
            email: form.get("email").to_string(),
            password: SecretString::from(form.get("password")),
        };

        match self.api().sign_up(&request).await {
            Ok(response) => {
                let message = if response.message.is_empty() {
                    "User Registered Successfully".to_string()
                } else {
                    response.message
                };
                self.store_mut().notify(Notice::success(message));
                Ok(Route::Login)
            }
            Err(e) => Err(self.notify_failure(e, "Internal Server Error")),
        }
    }

    /// Sign out: end the server session, forget the token and clear the cart.
    ///
    /// The server call is best-effort; local state is always cleared.
    #[instrument(skip_all)]
    pub async fn log_out_user(&mut self) -> Route {
        if let Some(jwt) = self.store().auth().jwt.clone()
            && let Err(e) = self.api().sign_out(&jwt).await
        {
            tracing::warn!(error = %e, "Server sign-out failed");
        }

        if let Err(e) = self.credentials().clear() {
            tracing::warn!(error = %e, "Failed to clear persisted credential");
        }

        clear_sentry_user();

        let store = self.store_mut();
        store.dispatch(CartAction::Clear);
        store.dispatch(AuthAction::LogOut);
        store.notify(Notice::success("Log Out Successfully"));

        Route::Login
    }
}
