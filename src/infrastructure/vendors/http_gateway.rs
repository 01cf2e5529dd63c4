//! # HTTP Vendor Gateway
//!
//! Gateway for a remote vendor exposing `GET {base_url}/products/{key}`.
//! The body is decoded in the vendor's configured [`RawFormat`]. The key is
//! percent-encoded as a single path segment.

use crate::domain::entities::quote::Quote;
use crate::domain::value_objects::{ProductKey, VendorId};
use crate::infrastructure::vendors::error::{VendorError, VendorResult};
use crate::infrastructure::vendors::http_client::HttpClient;
use crate::infrastructure::vendors::raw::RawFormat;
use crate::infrastructure::vendors::traits::VendorGateway;
use async_trait::async_trait;
use reqwest::Url;
use tokio::time::Instant;

/// Remote vendor reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpVendorGateway {
    vendor_id: VendorId,
    base_url: String,
    format: RawFormat,
    client: HttpClient,
}

impl HttpVendorGateway {
    /// Creates a gateway sharing `client`.
    #[must_use]
    pub fn new(
        vendor_id: VendorId,
        base_url: impl Into<String>,
        format: RawFormat,
        client: HttpClient,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            vendor_id,
            base_url,
            format,
            client,
        }
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the product URL for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot be parsed or cannot carry a path.
    pub fn product_url(&self, key: &ProductKey) -> VendorResult<String> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            VendorError::internal(format!("invalid base url {}: {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|()| {
                VendorError::internal(format!("base url {} cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .push("products")
            .push(key.as_str());
        Ok(url.into())
    }

    /// Returns true if the vendor's `/health` endpoint answers with 2xx.
    pub async fn health_check(&self) -> bool {
        self.client
            .health_check(&format!("{}/health", self.base_url))
            .await
    }
}

#[async_trait]
impl VendorGateway for HttpVendorGateway {
    fn vendor_id(&self) -> &VendorId {
        &self.vendor_id
    }

    async fn fetch(&self, key: &ProductKey) -> VendorResult<Option<Quote>> {
        let started = Instant::now();

        let url = self.product_url(key)?;
        let Some(body) = self.client.get_bytes(&url).await? else {
            tracing::debug!(vendor = %self.vendor_id, key = %key, "Vendor has no record");
            return Ok(None);
        };

        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let quote = self
            .format
            .decode(&body)?
            .normalize(&self.vendor_id)?
            .with_latency_ms(latency_ms);

        Ok(Some(quote))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Timestamp;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway(server: &MockServer, format: RawFormat) -> HttpVendorGateway {
        HttpVendorGateway::new(
            VendorId::new("RemoteVendor"),
            format!("{}/", server.uri()),
            format,
            HttpClient::new(1000).unwrap(),
        )
    }

    #[tokio::test]
    async fn fetches_and_normalizes() {
        let server = MockServer::start().await;
        let body = RawFormat::VendorThree
            .compose(
                &ProductKey::new("ABC123"),
                95.0,
                None,
                Timestamp::from_secs(1_732_789_800).unwrap(),
            )
            .to_json()
            .unwrap();
        Mock::given(method("GET"))
            .and(path("/products/ABC123"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;

        let quote = gateway(&server, RawFormat::VendorThree)
            .fetch(&ProductKey::new("ABC123"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(quote.vendor_id().as_str(), "RemoteVendor");
        assert_eq!(quote.stock(), 5);
        assert!(quote.latency_ms().is_some());
    }

    #[tokio::test]
    async fn not_found_maps_to_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/NOPE000"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = gateway(&server, RawFormat::VendorOne)
            .fetch(&ProductKey::new("NOPE000"))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn rate_limit_maps_to_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "2"))
            .mount(&server)
            .await;

        let err = gateway(&server, RawFormat::VendorOne)
            .fetch(&ProductKey::new("ABC123"))
            .await
            .unwrap_err();
        assert_eq!(err.retry_after_ms(), Some(2000));
    }

    #[tokio::test]
    async fn server_error_maps_to_upstream_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let err = gateway(&server, RawFormat::VendorOne)
            .fetch(&ProductKey::new("ABC123"))
            .await
            .unwrap_err();
        assert!(matches!(err, VendorError::Upstream { status: 503, .. }));
    }

    #[tokio::test]
    async fn wrong_body_is_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"unexpected\": true}"))
            .mount(&server)
            .await;

        let err = gateway(&server, RawFormat::VendorTwo)
            .fetch(&ProductKey::new("ABC123"))
            .await
            .unwrap_err();
        assert!(matches!(err, VendorError::Protocol { .. }));
    }

    #[tokio::test]
    async fn trailing_slash_is_trimmed() {
        let server = MockServer::start().await;
        let gateway = gateway(&server, RawFormat::VendorOne);
        assert_eq!(
            gateway.product_url(&ProductKey::new("ABC123")).unwrap(),
            format!("{}/products/ABC123", server.uri())
        );
        assert!(!gateway.health_check().await);
    }

    #[test]
    fn key_is_encoded_as_one_segment() {
        let gateway = HttpVendorGateway::new(
            VendorId::new("RemoteVendor"),
            "http://vendor.test/api/",
            RawFormat::VendorOne,
            HttpClient::new(1000).unwrap(),
        );
        assert_eq!(
            gateway.product_url(&ProductKey::new("A/B?C#D")).unwrap(),
            "http://vendor.test/api/products/A%2FB%3FC%23D"
        );
    }

    #[test]
    fn unusable_base_url_is_an_error() {
        let gateway = HttpVendorGateway::new(
            VendorId::new("RemoteVendor"),
            "not a url",
            RawFormat::VendorOne,
            HttpClient::new(1000).unwrap(),
        );
        let err = gateway.product_url(&ProductKey::new("ABC123")).unwrap_err();
        assert!(matches!(err, VendorError::Internal { .. }));
    }

    #[tokio::test]
    async fn key_with_slash_hits_encoded_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/AB%20C%2F1"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let result = gateway(&server, RawFormat::VendorOne)
            .fetch(&ProductKey::new("AB C/1"))
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
