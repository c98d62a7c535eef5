//! Outbound HTTP used by the gateway client.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Url};

/// Errors below the HTTP status level.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection, DNS or timeout failure
    #[error("Network error: {0}")]
    Network(String),

    /// Response started but the body could not be read
    #[error("Body read error: {0}")]
    Body(String),
}

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Bytes,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One GET per call, no retries.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<TransportResponse, TransportError>;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("swan-demo/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;
        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_http_transport_returns_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/swan/api/v1/fetch"))
            .and(query_param("accessKey", "K1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("https://cmp.example/x"))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(Duration::from_secs(5));
        let url = Url::parse(&format!("{}/swan/api/v1/fetch?accessKey=K1", server.uri())).unwrap();
        let res = transport.get(&url).await.unwrap();

        assert!(res.is_success());
        assert_eq!(res.body, Bytes::from_static(b"https://cmp.example/x"));
    }

    #[tokio::test]
    async fn test_http_transport_passes_error_status_through() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403).set_body_string("denied"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(Duration::from_secs(5));
        let url = Url::parse(&server.uri()).unwrap();
        let res = transport.get(&url).await.unwrap();
        assert_eq!(res.status, 403);
        assert!(!res.is_success());
    }

    #[tokio::test]
    async fn test_http_transport_network_error() {
        let transport = HttpTransport::new(Duration::from_millis(200));
        // Port 9 (discard) on localhost is not listening.
        let url = Url::parse("http://127.0.0.1:9/").unwrap();
        assert!(matches!(transport.get(&url).await, Err(TransportError::Network(_))));
    }

    #[tokio::test]
    async fn test_http_transport_truncated_body() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await.unwrap();
            // Promise 100 bytes, send 5, hang up.
            socket
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 100\r\nconnection: close\r\n\r\nshort")
                .await
                .unwrap();
            socket.shutdown().await.unwrap();
        });

        let transport = HttpTransport::new(Duration::from_secs(5));
        let url = Url::parse(&format!("http://{}/swan/api/v1/fetch", addr)).unwrap();
        let result = transport.get(&url).await;
        assert!(matches!(result, Err(TransportError::Body(_))), "{result:?}");
        server.await.unwrap();
    }
}
