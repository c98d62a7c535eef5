//! Client for a site's SWAN access node.
//!
//! Every call is a single GET to
//! `<scheme>://<access node>/swan/api/v1/<action>?accessKey=<key>&...`.
//! The node and key are checked before any I/O, the caller may add
//! parameters, and the raw response body is returned on a 2xx status.
//! Nothing is retried.

pub mod error;
pub mod mock;
pub mod query;
pub mod transport;

pub use error::{ApiErrorBody, ErrorDetail, GatewayError};
pub use mock::MockTransport;
pub use query::{Presentation, QueryParams};
pub use transport::{HttpTransport, Transport, TransportError, TransportResponse};

use bytes::Bytes;
use tracing::{debug, warn};
use url::Url;

/// API prefix on every access node.
pub const API_PATH: &str = "/swan/api/v1/";

/// Where and how a site reaches its access node.
#[derive(Debug, Clone, Copy)]
pub struct AccessNode<'a> {
    /// Host of the calling site, used in error messages
    pub host: &'a str,
    pub scheme: &'a str,
    /// Access node host name
    pub node: &'a str,
    pub key: &'a str,
}

impl AccessNode<'_> {
    fn check(&self) -> Result<(), GatewayError> {
        if self.node.is_empty() {
            return Err(GatewayError::MissingAccessNode {
                host: self.host.to_string(),
            });
        }
        if self.key.is_empty() {
            return Err(GatewayError::MissingAccessKey {
                host: self.host.to_string(),
            });
        }
        Ok(())
    }

    fn action_url(&self, action: &str) -> Result<Url, GatewayError> {
        Ok(Url::parse(&format!(
            "{}://{}{}{}",
            self.scheme, self.node, API_PATH, action
        ))?)
    }
}

/// Call `action` on the access node and return the response body.
///
/// `add_params` runs after `accessKey` is seeded; an error from it ends the
/// call before any request is sent.
pub async fn call<F>(
    transport: &dyn Transport,
    access: &AccessNode<'_>,
    action: &str,
    add_params: F,
) -> Result<Bytes, GatewayError>
where
    F: FnOnce(&mut QueryParams) -> Result<(), GatewayError>,
{
    access.check()?;

    let mut url = access.action_url(action)?;
    let mut params = QueryParams::new();
    params.set("accessKey", access.key);
    add_params(&mut params)?;
    url.set_query(Some(&params.encode()?));

    debug!(host = %access.host, node = %access.node, action = %action, "Calling access node");

    let response = transport.get(&url).await.map_err(|source| {
        warn!(host = %access.host, action = %action, error = %source, "Access node unreachable");
        GatewayError::Transport {
            action: action.to_string(),
            source,
        }
    })?;

    if !response.is_success() {
        let detail = ErrorDetail::from_body(&response.body);
        warn!(
            host = %access.host,
            action = %action,
            status = response.status,
            error = %detail,
            "Access node refused call"
        );
        return Err(GatewayError::Response {
            status: response.status,
            detail,
        });
    }

    Ok(response.body)
}
