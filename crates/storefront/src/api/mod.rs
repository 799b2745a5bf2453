//! REST client for the Samovar backend.
//!
//! Covers the endpoints the storefront engine consumes: profile, addresses,
//! and orders. Requests and responses are JSON; inside the Telegram
//! container the opaque init token rides along as `X-Telegram-Init-Data`.
//! Responses use the `{ success, data?, error? }` envelope (see
//! [`types::decode_envelope`]).

mod types;

pub use types::{NewAddress, Profile, ProfileUpdate};

use std::sync::Arc;

use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::instrument;

use samovar_core::{Address, AddressId, Order, OrderDraft};

use crate::config::StorefrontConfig;
use types::{decode_ack, decode_envelope};

const INIT_DATA_HEADER: &str = "X-Telegram-Init-Data";

/// Errors from backend calls.
///
/// Store code never propagates these as panics; failures surface to the
/// caller, which decides between alerting the user and logging a background
/// degradation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body was not JSON at all.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response was JSON but did not match the envelope contract.
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),

    /// The backend reported a failure (`success: false`).
    #[error("API error: {0}")]
    Api(String),
}

/// Client for the Samovar REST API.
///
/// Cheap to clone; the underlying connection pool and credentials are
/// shared through an `Arc`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

#[derive(Debug)]
struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    init_data: Option<String>,
}

impl ApiClient {
    /// Create a new API client from configuration.
    #[must_use]
    pub fn new(config: &StorefrontConfig) -> Self {
        let base_url = config
            .api_base_url
            .as_str()
            .trim_end_matches('/')
            .to_owned();

        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                base_url,
                init_data: config
                    .telegram_init_data
                    .as_ref()
                    .map(|token| token.expose_secret().to_owned()),
            }),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    fn apply_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.inner.init_data {
            Some(token) => req.header(INIT_DATA_HEADER, token),
            None => req,
        }
    }

    /// Send a request and read the body as text first for diagnostics.
    async fn execute(&self, req: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let response = self.apply_auth(req).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "backend returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        Ok(body)
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// Fetch the user profile (`GET /profile/`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response shape is wrong.
    #[instrument(skip(self))]
    pub async fn get_profile(&self) -> Result<Profile, ApiError> {
        let body = self
            .execute(self.inner.client.get(self.endpoint("/profile/")))
            .await?;
        decode_envelope(&body)
    }

    /// Update the user profile (`PUT /profile/`). Carries the delivery-type
    /// and pickup-branch selection plus the preference version.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response shape is wrong.
    #[instrument(skip(self, update), fields(version = update.preference_version))]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile, ApiError> {
        let body = self
            .execute(self.inner.client.put(self.endpoint("/profile/")).json(update))
            .await?;
        decode_envelope(&body)
    }

    // =========================================================================
    // Addresses
    // =========================================================================

    /// Fetch the saved address list (`GET /addresses/`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response shape is wrong.
    #[instrument(skip(self))]
    pub async fn list_addresses(&self) -> Result<Vec<Address>, ApiError> {
        let body = self
            .execute(self.inner.client.get(self.endpoint("/addresses/")))
            .await?;
        decode_envelope(&body)
    }

    /// Create an address (`POST /addresses/`); the server assigns the id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response shape is wrong.
    #[instrument(skip(self, address))]
    pub async fn create_address(&self, address: &NewAddress) -> Result<Address, ApiError> {
        let body = self
            .execute(
                self.inner
                    .client
                    .post(self.endpoint("/addresses/"))
                    .json(address),
            )
            .await?;
        decode_envelope(&body)
    }

    /// Update an address (`PUT /addresses/{id}/`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response shape is wrong.
    #[instrument(skip(self, address), fields(address_id = %address.id))]
    pub async fn update_address(&self, address: &Address) -> Result<Address, ApiError> {
        let path = format!("/addresses/{}/", address.id);
        let body = self
            .execute(self.inner.client.put(self.endpoint(&path)).json(address))
            .await?;
        decode_envelope(&body)
    }

    /// Delete an address (`DELETE /addresses/{id}/`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend refuses.
    #[instrument(skip(self), fields(address_id = %id))]
    pub async fn delete_address(&self, id: &AddressId) -> Result<(), ApiError> {
        let path = format!("/addresses/{id}/");
        let body = self
            .execute(self.inner.client.delete(self.endpoint(&path)))
            .await?;
        decode_ack(&body)
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Submit an order (`POST /orders/`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response shape is wrong.
    #[instrument(skip(self, draft), fields(restaurant_id = %draft.restaurant_id))]
    pub async fn create_order(&self, draft: &OrderDraft) -> Result<Order, ApiError> {
        let body = self
            .execute(self.inner.client.post(self.endpoint("/orders/")).json(draft))
            .await?;
        decode_envelope(&body)
    }

    /// Fetch the user's order history (`GET /profile/orders/`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response shape is wrong.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        let body = self
            .execute(self.inner.client.get(self.endpoint("/profile/orders/")))
            .await?;
        decode_envelope(&body)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::CheckoutPolicy;
    use secrecy::SecretString;

    fn config(base: &str) -> StorefrontConfig {
        StorefrontConfig {
            api_base_url: base.parse().unwrap(),
            data_dir: std::path::PathBuf::from(".samovar"),
            telegram_init_data: Some(SecretString::from("init-data-token")),
            checkout: CheckoutPolicy::default(),
        }
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = ApiClient::new(&config("https://api.samovar.test/api/v1/"));
        assert_eq!(
            client.endpoint("/addresses/"),
            "https://api.samovar.test/api/v1/addresses/"
        );

        let client = ApiClient::new(&config("https://api.samovar.test/api/v1"));
        assert_eq!(
            client.endpoint("/profile/orders/"),
            "https://api.samovar.test/api/v1/profile/orders/"
        );
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Status {
            status: 404,
            body: "not found".to_owned(),
        };
        assert_eq!(err.to_string(), "HTTP 404: not found");

        let err = ApiError::Api("промокод недействителен".to_owned());
        assert_eq!(err.to_string(), "API error: промокод недействителен");
    }
}
