use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use std::time::Duration;
use thiserror::Error;

use crate::error::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(#[source] BoxError),

    #[error("connection failed: {0}")]
    Connect(#[source] BoxError),

    #[error("reading response body failed: {0}")]
    Body(#[source] BoxError),
}

impl TransportError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, TransportError::Timeout(_) | TransportError::Connect(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Carries one JSON POST to the API.
///
/// Non-2xx responses are not errors at this level: the API puts its failure
/// message in the body, so the body is always handed back for decoding.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, url: Url, body: String) -> Result<TransportResponse, TransportError>;
}

/// `reqwest`-backed transport with a bounded per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::Client)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, url: Url, body: String) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout(Box::new(e))
                } else {
                    TransportError::Connect(Box::new(e))
                }
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(Box::new(e))
            } else {
                TransportError::Body(Box::new(e))
            }
        })?;

        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_returns_status_and_body_for_error_responses() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/ping")
                    .header("content-type", "application/json")
                    .body("{}");
                then.status(400)
                    .body(r#"{"status":"ERROR","message":"Invalid API key. (002)"}"#);
            })
            .await;

        let transport = HttpTransport::new(DEFAULT_TIMEOUT).unwrap();
        let url = Url::parse(&server.url("/ping")).unwrap();
        let response = transport.post(url, "{}".to_string()).await.unwrap();

        assert_eq!(response.status, 400);
        assert!(response.body.contains("Invalid API key"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_timeout_is_classified() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/ping");
                then.status(200)
                    .delay(Duration::from_secs(2))
                    .body(r#"{"status":"SUCCESS"}"#);
            })
            .await;

        let transport = HttpTransport::new(Duration::from_millis(100)).unwrap();
        let url = Url::parse(&server.url("/ping")).unwrap();
        let err = transport.post(url, "{}".to_string()).await.unwrap_err();

        assert_matches!(err, TransportError::Timeout(_));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_connection_refused_is_classified() {
        // Bind then drop to get a port nothing listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = HttpTransport::new(DEFAULT_TIMEOUT).unwrap();
        let url = Url::parse(&format!("http://{addr}/ping")).unwrap();
        let err = transport.post(url, "{}".to_string()).await.unwrap_err();

        assert_matches!(err, TransportError::Connect(_));
    }
}
