//! Unsplash API HTTP client.

use reqwest::header::HeaderMap;
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::params::RequestParams;
use crate::domain::errors::FetchError;

const API_BASE: &str = "https://api.unsplash.com";
/// Query parameter carrying the static client credential.
const CLIENT_ID_PARAM: &str = "client_id";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Unsplash REST client.
///
/// Every request carries the configured access key as a query parameter;
/// caller-supplied parameters cannot override it. The client never
/// retries and never touches the cache.
pub struct ApiClient {
    client: Client,
    base_url: String,
    access_key: String,
}

impl ApiClient {
    /// Creates a client against the production API host.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(access_key: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_base_url(API_BASE, access_key)
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_base_url(
        base_url: impl Into<String>,
        access_key: impl Into<String>,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| FetchError::transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            access_key: access_key.into(),
        })
    }

    /// Issues a request and decodes the JSON response into `T`.
    ///
    /// # Errors
    /// `InvalidUrl` if the URL cannot be built from the path,
    /// `TransportError` on connectivity failure, `ServerError` for any
    /// status outside [200, 299], and `DecodingError` if the body does
    /// not parse into `T`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        method: Method,
        params: Option<RequestParams>,
        headers: Option<HeaderMap>,
    ) -> Result<T, FetchError> {
        let url = self.build_url(path, params)?;

        debug!(%url, %method, "Issuing API request");

        let mut request = self.client.request(method, url);
        if let Some(headers) = headers {
            request = request.headers(headers);
        }

        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "Failed to reach API host");
            if e.is_timeout() {
                FetchError::transport("request timed out")
            } else if e.is_connect() {
                FetchError::transport("failed to connect")
            } else {
                FetchError::transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::server(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::transport(format!("failed to read body: {e}")))?;

        serde_json::from_slice(&body).map_err(|e| {
            warn!(error = %e, "Failed to decode API response");
            FetchError::decoding(e.to_string())
        })
    }

    fn build_url(&self, path: &str, params: Option<RequestParams>) -> Result<Url, FetchError> {
        let base = Url::parse(&self.base_url).map_err(|_| FetchError::InvalidUrl)?;
        let mut url = base.join(path).map_err(|_| FetchError::InvalidUrl)?;

        // The credential goes in last so callers cannot override it.
        let merged = params
            .unwrap_or_default()
            .set(CLIENT_ID_PARAM, self.access_key.clone())
            .build();

        url.query_pairs_mut().extend_pairs(merged.iter());

        Ok(url)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
