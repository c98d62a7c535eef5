//! Links into the signed-record service embedded in rendered pages.
//!
//! These endpoints are fetched by the browser, never by this process.

/// Verification-service URLs for one OWID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwidLinks {
    scheme: String,
    domain: String,
    owid: String,
}

impl OwidLinks {
    pub fn new(scheme: impl Into<String>, domain: impl Into<String>, owid: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            domain: domain.into(),
            owid: owid.into(),
        }
    }

    fn base(&self) -> String {
        format!("{}://{}/owid/api/v1", self.scheme, self.domain)
    }

    /// Public identity (name and key) of the signer.
    pub fn creator_url(&self) -> String {
        format!("{}/creator", self.base())
    }

    /// Returns `{"valid": bool}` for the OWID.
    pub fn verify_url(&self) -> String {
        format!("{}/verify?owid={}", self.base(), urlencoding::encode(&self.owid))
    }

    /// Plain-text payload after verification.
    pub fn decode_and_verify_url(&self) -> String {
        format!(
            "{}/decode-and-verify?owid={}",
            self.base(),
            urlencoding::encode(&self.owid)
        )
    }
}
