//! # HTTP Client
//!
//! Shared HTTP client wrapper for vendor gateways.
//!
//! Maps transport failures and status codes onto [`VendorError`] so every
//! HTTP-backed gateway classifies failures the same way. The wrapper never
//! retries.
//!
//! # Examples
//!
//! ```ignore
//! use vendor_aggregator::infrastructure::vendors::http_client::HttpClient;
//!
//! let client = HttpClient::new(2000)?;
//! let body = client.get_bytes("https://vendor.example.com/products/ABC123").await?;
//! ```

use crate::infrastructure::vendors::error::{VendorError, VendorResult};
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

/// HTTP client wrapper for vendor gateways.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout_ms: u64,
}

impl HttpClient {
    /// Creates a new HTTP client with the specified timeout.
    ///
    /// # Errors
    ///
    /// Returns `VendorError::Internal` if the client cannot be created.
    pub fn new(timeout_ms: u64) -> VendorResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| VendorError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout_ms })
    }

    /// Returns the configured timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Makes a GET request and returns the response body.
    ///
    /// Returns `Ok(None)` for `404 Not Found`.
    ///
    /// # Errors
    ///
    /// - `VendorError::Timeout` / `VendorError::Connection` for transport failures
    /// - `VendorError::RateLimited` for `429`
    /// - `VendorError::Upstream` for `5xx`
    /// - `VendorError::Protocol` for any other non-success status
    pub async fn get_bytes(&self, url: &str) -> VendorResult<Option<Vec<u8>>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.handle_response(response).await
    }

    /// Returns true if `url` answers with a 2xx status.
    pub async fn health_check(&self, url: &str) -> bool {
        match self.client.get(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn handle_response(&self, response: Response) -> VendorResult<Option<Vec<u8>>> {
        let status = response.status();

        if status.is_success() {
            return response
                .bytes()
                .await
                .map(|body| Some(body.to_vec()))
                .map_err(|e| self.map_reqwest_error(e));
        }

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let retry_after_ms = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(|secs| secs.saturating_mul(1000));
        let body = response.text().await.unwrap_or_default();

        Err(Self::map_status_error(status, &body, retry_after_ms))
    }

    fn map_reqwest_error(&self, error: reqwest::Error) -> VendorError {
        if error.is_timeout() {
            VendorError::timeout_with_duration("Request timed out", self.timeout_ms)
        } else if error.is_connect() {
            VendorError::connection(format!("Connection failed: {}", error))
        } else if error.is_decode() {
            VendorError::protocol(format!("Failed to read response: {}", error))
        } else {
            VendorError::connection(format!("HTTP request failed: {}", error))
        }
    }

    fn map_status_error(status: StatusCode, body: &str, retry_after_ms: Option<u64>) -> VendorError {
        if status == StatusCode::TOO_MANY_REQUESTS {
            VendorError::rate_limited("Rate limit exceeded", retry_after_ms)
        } else if status.is_server_error() {
            VendorError::upstream(status.as_u16(), format!("Server error: {}", body))
        } else {
            VendorError::protocol(format!("HTTP error ({}): {}", status, body))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn new_client() {
        let client = HttpClient::new(5000);
        assert!(client.is_ok());
        assert_eq!(client.unwrap().timeout_ms(), 5000);
    }

    #[test]
    fn status_mapping() {
        assert!(matches!(
            HttpClient::map_status_error(StatusCode::TOO_MANY_REQUESTS, "", Some(2000)),
            VendorError::RateLimited { retry_after_ms: Some(2000), .. }
        ));
        assert!(matches!(
            HttpClient::map_status_error(StatusCode::BAD_GATEWAY, "", None),
            VendorError::Upstream { status: 502, .. }
        ));
        assert!(matches!(
            HttpClient::map_status_error(StatusCode::UNAUTHORIZED, "", None),
            VendorError::Protocol { .. }
        ));
    }

    #[tokio::test]
    async fn not_found_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = HttpClient::new(1000).unwrap();
        let body = client
            .get_bytes(&format!("{}/missing", server.uri()))
            .await
            .unwrap();
        assert!(body.is_none());
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let client = HttpClient::new(50).unwrap();
        let err = client.get_bytes(&server.uri()).await.unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn health_check_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = HttpClient::new(1000).unwrap();
        assert!(client.health_check(&format!("{}/health", server.uri())).await);
        assert!(!client.health_check(&format!("{}/other", server.uri())).await);
    }
}
