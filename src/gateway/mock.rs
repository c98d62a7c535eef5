//! Mock transport for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Url;

use super::transport::{Transport, TransportError, TransportResponse};

/// Transport that answers every request with a canned response and records
/// what it was asked for.
pub struct MockTransport {
    status: u16,
    body: Bytes,
    fail_with: Option<String>,
    call_count: AtomicU32,
    last_url: Mutex<Option<Url>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            status: 200,
            body: Bytes::new(),
            fail_with: None,
            call_count: AtomicU32::new(0),
            last_url: Mutex::new(None),
        }
    }

    /// Set the response status.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Set the response body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Fail every request with a network error.
    pub fn with_network_error(mut self, message: impl Into<String>) -> Self {
        self.fail_with = Some(message.into());
        self
    }

    /// Number of times `get` was called.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    /// URL of the most recent request.
    pub fn last_url(&self) -> Option<Url> {
        self.last_url.lock().ok().and_then(|u| u.clone())
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, url: &Url) -> Result<TransportResponse, TransportError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_url.lock() {
            *last = Some(url.clone());
        }

        if let Some(message) = &self.fail_with {
            return Err(TransportError::Network(message.clone()));
        }
        Ok(TransportResponse {
            status: self.status,
            body: self.body.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_transport() {
        let mock = MockTransport::new().with_body("ok");
        assert_eq!(mock.call_count(), 0);

        let url = Url::parse("https://node.example/a?b=c").unwrap();
        let res = mock.get(&url).await.unwrap();
        assert_eq!(res.body, Bytes::from_static(b"ok"));
        assert_eq!(mock.call_count(), 1);
        assert_eq!(mock.last_url(), Some(url));
    }

    #[tokio::test]
    async fn test_mock_network_error() {
        let mock = MockTransport::new().with_network_error("refused");
        let url = Url::parse("https://node.example/").unwrap();
        assert!(mock.get(&url).await.is_err());
        assert_eq!(mock.call_count(), 1);
    }
}
