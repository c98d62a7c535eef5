//! Error types for the SWAN demo

use reqwest::StatusCode;

use crate::audit::AuditError;
use crate::domain::{DomainError, IdentityError};
use crate::gateway::GatewayError;
use crate::owid::TreeError;
use crate::templates::TemplateError;

/// Main error type for demo operations
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Site not found: {0}")]
    SiteNotFound(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Audit(#[from] AuditError),

    #[error(transparent)]
    Identity(#[from] IdentityError),
}

impl DemoError {
    /// Convert error to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SiteNotFound(_) => StatusCode::NOT_FOUND,
            Self::Domain(DomainError::Gateway(e)) | Self::Gateway(e) => e.status_code(),
            Self::Domain(DomainError::NoTemplate { .. }) => StatusCode::NOT_FOUND,
            Self::Domain(DomainError::NotRegistered { .. }) => StatusCode::FORBIDDEN,
            Self::Domain(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Tree(_) | Self::Audit(_) => StatusCode::BAD_REQUEST,
            Self::Identity(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Convert to status code and body tuple for HTTP response
    pub fn into_status_code_and_body(self) -> (StatusCode, String) {
        let status = self.status_code();
        let body = self.to_string();
        (status, body)
    }
}

impl From<std::io::Error> for DemoError {
    fn from(err: std::io::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type alias for demo operations
pub type Result<T> = std::result::Result<T, DemoError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::ErrorDetail;

    #[test]
    fn test_status_codes() {
        let err: DemoError = DomainError::NotRegistered { host: "a.example".into() }.into();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);

        let err: DemoError = DomainError::Gateway(GatewayError::Response {
            status: 401,
            detail: ErrorDetail::Opaque("no".into()),
        })
        .into();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

        let (status, body) = DemoError::SiteNotFound("x.example".into()).into_status_code_and_body();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Site not found: x.example");
    }
}
