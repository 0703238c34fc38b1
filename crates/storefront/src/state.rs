//! The storefront session: API client, credential store and global store.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::api::{ApiClient, ApiError};
use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::query::Location;
use crate::search::SearchBox;
use crate::session::{CredentialError, CredentialStore, FileCredentialStore};
use crate::store::{AuthState, Notice, StatusAction, Store};

/// Per-session settings taken from [`StorefrontConfig`].
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Products requested per listing page
    pub page_size: u32,
    /// Delay before a search keystroke is committed
    pub search_debounce: Duration,
    /// Where the card provider sends the shopper after confirming payment
    pub payment_return_url: Url,
    /// Key the card widget is initialized with
    pub stripe_publishable_key: Option<SecretString>,
}

impl SessionSettings {
    /// # Errors
    ///
    /// Returns `url::ParseError` if the payment return URL cannot be built.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, url::ParseError> {
        Ok(Self {
            page_size: config.page_size,
            search_debounce: config.search_debounce,
            payment_return_url: config.payment_return_url()?,
            stripe_publishable_key: config.stripe.publishable_key.clone(),
        })
    }
}

/// A shopper's session.
///
/// Async actions (see [`crate::actions`]) take `&mut self`, so state
/// transitions never interleave.
pub struct Storefront {
    api: ApiClient,
    credentials: Arc<dyn CredentialStore>,
    store: Store,
    settings: SessionSettings,
}

impl Storefront {
    /// Create a session, restoring any persisted token.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError` if the credential store cannot be read.
    pub fn new(
        api: ApiClient,
        credentials: Arc<dyn CredentialStore>,
        settings: SessionSettings,
    ) -> Result<Self, CredentialError> {
        let jwt = credentials.load()?;
        if jwt.is_some() {
            tracing::debug!("Restored persisted credential");
        }

        Ok(Self {
            api,
            credentials,
            store: Store::with_auth(AuthState::with_token(jwt)),
            settings,
        })
    }

    /// Create a session from configuration with a file-backed credential.
    ///
    /// # Errors
    ///
    /// Returns `AppError` if the HTTP client cannot be built, the return URL is
    /// invalid or the credential file cannot be read.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, AppError> {
        let api = ApiClient::new(config)?;
        let credentials = Arc::new(FileCredentialStore::new(&config.credential_path));
        let settings = SessionSettings::from_config(config).map_err(ApiError::from)?;
        Ok(Self::new(api, credentials, settings)?)
    }

    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub const fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.settings.page_size
    }

    /// A search box for the listing at `location`, debounced by the
    /// configured delay.
    ///
    /// Must be used from within a tokio runtime.
    #[must_use]
    pub fn search_box(&self, location: &Location) -> SearchBox {
        SearchBox::new(location, self.settings.search_debounce)
    }

    /// Take every queued toast, oldest first.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.store.drain_notices()
    }

    pub(crate) fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    pub(crate) fn credentials(&self) -> &dyn CredentialStore {
        self.credentials.as_ref()
    }

    /// Bearer token of the signed-in user.
    ///
    /// Without one, an error notice is queued.
    pub(crate) fn require_token(&mut self) -> Result<SecretString, AppError> {
        if let Some(jwt) = self.store.auth().jwt.clone() {
            return Ok(jwt);
        }
        let err = AppError::from(ApiError::NotAuthenticated);
        self.store.notify(Notice::error(err.user_message()));
        Err(err)
    }

    /// Record a failed request in the shared error slice.
    pub(crate) fn request_failed(&mut self, err: ApiError, fallback: &str) -> AppError {
        let message = err.server_message().unwrap_or(fallback).to_string();
        self.store.dispatch(StatusAction::IsError(message));
        let err = AppError::from(err);
        err.report();
        err
    }

    /// Report a failure to the shopper as an error notice.
    pub(crate) fn notify_failure(&mut self, err: impl Into<AppError>, fallback: &str) -> AppError {
        let err = err.into();
        let message = match &err {
            AppError::Api(api) => api.server_message().unwrap_or(fallback).to_string(),
            other => other.user_message(),
        };
        self.store.notify(Notice::error(message));
        err.report();
        err
    }
}
