//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SAMOVAR_API_BASE_URL` - Base URL of the Samovar REST backend
//!
//! ## Optional
//! - `SAMOVAR_DATA_DIR` - Directory for local durable snapshots
//!   (default: `.samovar`)
//! - `TELEGRAM_INIT_DATA` - Opaque Telegram WebApp init token, forwarded as
//!   the `X-Telegram-Init-Data` header when present
//! - `SAMOVAR_BONUS_CAP_RATIO` - Fraction of the order total redeemable in
//!   bonus points (default: 0.10)
//! - `SAMOVAR_POINT_VALUE` - Rouble value of one bonus point (default: 1)

use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Checkout business knobs. Configuration, not store invariants: the bonus
/// cap mirrors the backend's per-user `bonus_percent_allowed` default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutPolicy {
    /// Fraction of the order total redeemable in bonus points.
    pub bonus_cap_ratio: Decimal,
    /// Rouble value of one bonus point.
    pub point_value: Decimal,
}

impl Default for CheckoutPolicy {
    fn default() -> Self {
        Self {
            bonus_cap_ratio: Decimal::new(10, 2), // 0.10
            point_value: Decimal::ONE,
        }
    }
}

/// Storefront engine configuration.
///
/// Implements `Debug` manually to redact the init-data token.
#[derive(Clone)]
pub struct StorefrontConfig {
    /// Base URL of the REST backend, e.g. `https://api.samovar.app/api/v1`.
    pub api_base_url: Url,
    /// Directory for local durable snapshots.
    pub data_dir: PathBuf,
    /// Telegram WebApp init token; absent outside the Telegram container.
    pub telegram_init_data: Option<SecretString>,
    /// Checkout business knobs.
    pub checkout: CheckoutPolicy,
}

impl std::fmt::Debug for StorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontConfig")
            .field("api_base_url", &self.api_base_url.as_str())
            .field("data_dir", &self.data_dir)
            .field(
                "telegram_init_data",
                &self.telegram_init_data.as_ref().map(|_| "[REDACTED]"),
            )
            .field("checkout", &self.checkout)
            .finish()
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

        let api_base_url = get_required_env("SAMOVAR_API_BASE_URL")?
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SAMOVAR_API_BASE_URL".to_string(), e.to_string())
            })?;
        let data_dir = PathBuf::from(get_env_or_default("SAMOVAR_DATA_DIR", ".samovar"));
        let telegram_init_data = get_optional_env("TELEGRAM_INIT_DATA").map(SecretString::from);

        let checkout = CheckoutPolicy {
            bonus_cap_ratio: get_decimal_or("SAMOVAR_BONUS_CAP_RATIO", Decimal::new(10, 2))?,
            point_value: get_decimal_or("SAMOVAR_POINT_VALUE", Decimal::ONE)?,
        };

        Ok(Self {
            api_base_url,
            data_dir,
            telegram_init_data,
            checkout,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an optional decimal environment variable, falling back to `default`.
fn get_decimal_or(key: &str, default: Decimal) -> Result<Decimal, ConfigError> {
    match get_optional_env(key) {
        Some(raw) => Decimal::from_str(&raw)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}
