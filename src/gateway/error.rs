//! Error types for access-node calls.

use reqwest::StatusCode;
use serde::Deserialize;

use super::transport::TransportError;

/// JSON error body returned by an access node.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
    #[serde(default)]
    pub code: Option<u16>,
}

/// What the access node said when it refused a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorDetail {
    Structured(ApiErrorBody),
    /// Body was not a JSON error; kept as received
    Opaque(String),
}

impl ErrorDetail {
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice::<ApiErrorBody>(body) {
            Ok(parsed) => Self::Structured(parsed),
            Err(_) => Self::Opaque(String::from_utf8_lossy(body).into_owned()),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Structured(body) => &body.error,
            Self::Opaque(raw) => raw,
        }
    }
}

impl std::fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Error type for gateway calls.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Verify '{host}' config.json for missing SWANAccessNode")]
    MissingAccessNode { host: String },

    #[error("Verify '{host}' config.json for missing SWANAccessKey")]
    MissingAccessKey { host: String },

    #[error("Invalid access node URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Raised by a caller's parameter hook or by query encoding
    #[error("Parameter error: {0}")]
    Params(String),

    #[error("Call to '{action}' failed: {source}")]
    Transport {
        action: String,
        #[source]
        source: TransportError,
    },

    #[error("Access node returned {status}: {detail}")]
    Response { status: u16, detail: ErrorDetail },

    #[error("Response body is not UTF-8: {0}")]
    InvalidBody(#[from] std::string::FromUtf8Error),
}

impl GatewayError {
    /// Status to report upstream. Errors that never reached the access node
    /// are internal errors.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Response { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<serde_urlencoded::ser::Error> for GatewayError {
    fn from(err: serde_urlencoded::ser::Error) -> Self {
        Self::Params(err.to_string())
    }
}
