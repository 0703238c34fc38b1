//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BAZAAR_API_URL` - Base URL of the backend REST API (e.g., `https://api.example.com/api`)
//!
//! ## Optional
//! - `BAZAAR_FRONTEND_URL` - Public URL of the storefront, used for payment return links
//!   (default: `http://localhost:5173`)
//! - `BAZAAR_CREDENTIAL_PATH` - File holding the persisted login token
//!   (default: `.bazaar/credentials.json`)
//! - `BAZAAR_PAGE_SIZE` - Products requested per page (default: 50)
//! - `BAZAAR_SEARCH_DEBOUNCE_MS` - Search input debounce delay, 500-1000 (default: 700)
//! - `BAZAAR_CACHE_TTL_SECS` - Catalog cache lifetime (default: 300)
//! - `BAZAAR_REQUEST_TIMEOUT_SECS` - Backend request timeout (default: 30)
//! - `BAZAAR_LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! - `STRIPE_PUBLISHABLE_KEY` - Stripe publishable key for the card widget
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance trace sample rate (default: 0.0)

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::telemetry::LogFormat;

const MIN_DEBOUNCE_MS: u64 = 500;
const MAX_DEBOUNCE_MS: u64 = 1000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend REST API base URL
    pub api_url: Url,
    /// Public storefront URL (payment providers redirect back here)
    pub frontend_url: Url,
    /// Location of the persisted credential file
    pub credential_path: PathBuf,
    /// Products requested per listing page
    pub page_size: u32,
    /// Delay before a search keystroke is committed to the query
    pub search_debounce: Duration,
    /// Lifetime of cached catalog responses
    pub cache_ttl: Duration,
    /// Timeout applied to every backend request
    pub request_timeout: Duration,
    /// Stripe payment widget configuration
    pub stripe: StripeConfig,
    /// Logging and error tracking configuration
    pub telemetry: TelemetryConfig,
}

/// Stripe configuration.
///
/// Implements `Debug` manually to redact the key.
#[derive(Clone, Default)]
pub struct StripeConfig {
    /// Publishable key handed to the payment element
    pub publishable_key: Option<SecretString>,
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field(
                "publishable_key",
                &self.publishable_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Logging and Sentry configuration.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Output format for the fmt layer
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Error event sample rate
    pub sentry_sample_rate: f32,
    /// Performance trace sample rate
    pub sentry_traces_sample_rate: f32,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let api_url = env.url("BAZAAR_API_URL", None)?;
        let frontend_url = env.url("BAZAAR_FRONTEND_URL", Some("http://localhost:5173"))?;
        let credential_path =
            PathBuf::from(env.or_default("BAZAAR_CREDENTIAL_PATH", ".bazaar/credentials.json"));

        let page_size = env.parse::<u32>("BAZAAR_PAGE_SIZE", "50")?;
        if page_size == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "BAZAAR_PAGE_SIZE".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let debounce_ms = env.parse::<u64>("BAZAAR_SEARCH_DEBOUNCE_MS", "700")?;
        if !(MIN_DEBOUNCE_MS..=MAX_DEBOUNCE_MS).contains(&debounce_ms) {
            return Err(ConfigError::InvalidEnvVar(
                "BAZAAR_SEARCH_DEBOUNCE_MS".to_string(),
                format!("must be between {MIN_DEBOUNCE_MS} and {MAX_DEBOUNCE_MS} (got {debounce_ms})"),
            ));
        }

        let cache_ttl = env.parse::<u64>("BAZAAR_CACHE_TTL_SECS", "300")?;
        let request_timeout = env.parse::<u64>("BAZAAR_REQUEST_TIMEOUT_SECS", "30")?;

        let log_format = env
            .or_default("BAZAAR_LOG_FORMAT", "pretty")
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::InvalidEnvVar("BAZAAR_LOG_FORMAT".to_string(), e))?;

        let telemetry = TelemetryConfig {
            log_format,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env.parse::<f32>("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: env.parse::<f32>("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        };

        let stripe = StripeConfig {
            publishable_key: env.optional("STRIPE_PUBLISHABLE_KEY").map(SecretString::from),
        };

        Ok(Self {
            api_url,
            frontend_url,
            credential_path,
            page_size,
            search_debounce: Duration::from_millis(debounce_ms),
            cache_ttl: Duration::from_secs(cache_ttl),
            request_timeout: Duration::from_secs(request_timeout),
            stripe,
            telemetry,
        })
    }

    /// URL the payment provider returns the shopper to after confirmation.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if the joined path is invalid.
    pub fn payment_return_url(&self) -> Result<Url, url::ParseError> {
        self.frontend_url.join("order-confirm")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup with typed accessors.
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable, treating blank values as absent.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable (or its default) into `T`.
    fn parse<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.or_default(key, default)
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }

    /// Parse a URL variable. Without a default the variable is required.
    fn url(&self, key: &str, default: Option<&str>) -> Result<Url, ConfigError> {
        let raw = match (self.optional(key), default) {
            (Some(value), _) => value,
            (None, Some(default)) => default.to_string(),
            (None, None) => return Err(ConfigError::MissingEnvVar(key.to_string())),
        };
        let url = Url::parse(&raw)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                "must be an absolute http(s) URL".to_string(),
            ));
        }
        Ok(url)
    }
}
