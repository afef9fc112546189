//! HTTP transport used by the image fetcher.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};

use crate::config::HttpOptions;
use crate::error::{Error, Result};

/// Status and body of a completed GET request.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchResponse {
    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A client able to issue GET requests with a timeout and per-request
/// headers.
///
/// One instance is shared read-only by every fetch worker. Headers that vary
/// per request are passed as arguments, never stored on the transport.
#[async_trait]
pub trait ImageTransport: Send + Sync {
    async fn get(
        &self,
        url: &str,
        timeout: Duration,
        headers: header::HeaderMap,
    ) -> Result<FetchResponse>;
}

/// `reqwest`-backed transport with connection reuse.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build the shared client from the HTTP options.
    pub fn new(options: &HttpOptions) -> Result<Self> {
        let mut default_headers = header::HeaderMap::new();
        let accept_language = options.accept_language.parse().map_err(|_| {
            Error::ConfigValidation {
                field: "accept_language".to_string(),
                message: "Not a valid header value".to_string(),
            }
        })?;
        default_headers.insert(header::ACCEPT_LANGUAGE, accept_language);

        let client = Client::builder()
            .user_agent(&options.user_agent)
            .default_headers(default_headers)
            .cookie_store(true)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ImageTransport for HttpTransport {
    async fn get(
        &self,
        url: &str,
        timeout: Duration,
        headers: header::HeaderMap,
    ) -> Result<FetchResponse> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .headers(headers)
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status().as_u16();
        tracing::debug!("Response status: {}", status);

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Network(format!("Failed to read body of {}: {}", url, e)))?;

        Ok(FetchResponse {
            status,
            body: body.to_vec(),
        })
    }
}

/// Build the per-request headers for an image of the given volume.
pub fn request_headers(referer: Option<&str>) -> header::HeaderMap {
    let mut headers = header::HeaderMap::new();
    if let Some(value) = referer.and_then(|r| header::HeaderValue::from_str(r).ok()) {
        headers.insert(header::REFERER, value);
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_success() {
        let ok = FetchResponse {
            status: 204,
            body: Vec::new(),
        };
        let missing = FetchResponse {
            status: 404,
            body: Vec::new(),
        };
        assert!(ok.is_success());
        assert!(!missing.is_success());
    }

    #[test]
    fn test_request_headers() {
        let headers = request_headers(Some("http://x/1"));
        assert_eq!(headers.get(header::REFERER).unwrap(), "http://x/1");
        assert!(request_headers(None).is_empty());
        // invalid header values are dropped rather than failing the request
        assert!(request_headers(Some("bad\nvalue")).is_empty());
    }

    #[test]
    fn test_http_transport_builds() {
        assert!(HttpTransport::new(&HttpOptions::default()).is_ok());
    }
}
