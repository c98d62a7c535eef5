//! A demo site: its settings, templates, access-node client and signing
//! identity.
//!
//! Each site lives in its own folder named after its host. The folder holds a
//! `config.json` and any number of `*.html` templates.

pub mod configuration;
pub mod identity;
pub mod registry;
pub mod site_config;

pub use configuration::Configuration;
pub use identity::{IdentityError, SigningIdentity, SigningIdentityStore, StaticIdentityStore};
pub use registry::SiteRegistry;
pub use site_config::{Advert, SiteConfig};

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use bytes::Bytes;
use serde_json::Value as JsonValue;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::gateway::{self, AccessNode, GatewayError, Presentation, QueryParams};
use crate::request::PageRequest;
use crate::templates::{Template, TemplateError, TemplateSet};

const CONFIG_FILE: &str = "config.json";

/// Title of the preference UI opened through the access node.
const SWAN_TITLE: &str = "Your Preference Management";

/// Request headers passed on so the access node can pick a home node.
const HOME_NODE_HEADERS: [&str; 2] = ["X-Forwarded-For", "X-Real-IP"];

/// Renders a page for a request to this site.
pub type Handler = Arc<dyn Fn(&Domain, &PageRequest) -> Result<String, DomainError> + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Site folder '{0}' has no usable name")]
    InvalidFolder(String),

    #[error("Cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid {path}: {source}")]
    Config {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("No template for '{path}' on '{host}'")]
    NoTemplate { host: String, path: String },

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(
        "Domain '{host}' is not a registered OWID creator. Register the domain for the SWAN demo \
         using http[s]://{host}/owid/register"
    )]
    NotRegistered { host: String },

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error("Handler already set for '{host}'")]
    HandlerAlreadySet { host: String },
}

/// One site of the demo.
pub struct Domain {
    host: String,
    folder: PathBuf,
    settings: SiteConfig,
    templates: TemplateSet,
    config: Configuration,
    identity: OnceCell<SigningIdentity>,
    handler: OnceLock<Handler>,
}

impl Domain {
    pub fn new(
        config: Configuration,
        host: impl Into<String>,
        settings: SiteConfig,
        templates: TemplateSet,
    ) -> Self {
        Self {
            host: host.into(),
            folder: PathBuf::new(),
            settings,
            templates,
            config,
            identity: OnceCell::new(),
            handler: OnceLock::new(),
        }
    }

    /// Load a site from its folder. The host is the folder's name.
    pub fn load(config: Configuration, folder: &Path) -> Result<Self, DomainError> {
        let host = folder
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| DomainError::InvalidFolder(folder.display().to_string()))?
            .to_string();

        let config_path = folder.join(CONFIG_FILE);
        let json = std::fs::read_to_string(&config_path).map_err(|source| DomainError::Io {
            path: config_path.display().to_string(),
            source,
        })?;
        let settings = SiteConfig::from_json(&json).map_err(|source| DomainError::Config {
            path: config_path.display().to_string(),
            source,
        })?;
        let templates = TemplateSet::from_dir(folder)?;

        info!(
            host = %host,
            category = %settings.category,
            templates = templates.len(),
            "Loaded site"
        );

        let mut domain = Self::new(config, host, settings, templates);
        domain.folder = folder.to_path_buf();
        Ok(domain)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn settings(&self) -> &SiteConfig {
        &self.settings
    }

    pub fn category(&self) -> &str {
        &self.settings.category
    }

    pub fn name(&self) -> &str {
        &self.settings.name
    }

    pub fn is_bad(&self) -> bool {
        self.settings.bad
    }

    pub fn access_node(&self) -> &str {
        &self.settings.swan_access_node
    }

    pub fn cmp(&self) -> &str {
        &self.settings.cmp
    }

    pub fn suppliers(&self) -> &[String] {
        &self.settings.suppliers
    }

    pub fn adverts(&self) -> &[Advert] {
        &self.settings.adverts
    }

    pub fn presentation(&self) -> Presentation {
        self.settings.presentation()
    }

    pub fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    /// Template for a request path, see [`TemplateSet::lookup`].
    pub fn lookup_html(&self, path: &str) -> Option<&Template> {
        self.templates.lookup(path, &self.settings.category)
    }

    pub fn render_html(&self, path: &str, context: &JsonValue) -> Result<String, DomainError> {
        let template = self.lookup_html(path).ok_or_else(|| DomainError::NoTemplate {
            host: self.host.clone(),
            path: path.to_string(),
        })?;
        Ok(template.render(context))
    }

    fn access(&self) -> AccessNode<'_> {
        AccessNode {
            host: &self.host,
            scheme: &self.config.scheme,
            node: &self.settings.swan_access_node,
            key: &self.settings.swan_access_key,
        }
    }

    /// Call `action` on this site's access node and return the raw body.
    pub async fn call_swan<F>(&self, action: &str, add_params: F) -> Result<Bytes, GatewayError>
    where
        F: FnOnce(&mut QueryParams) -> Result<(), GatewayError>,
    {
        gateway::call(self.config.transport.as_ref(), &self.access(), action, add_params).await
    }

    /// Ask the access node for a URL to send the browser to.
    ///
    /// `return_url` is where the browser comes back to afterwards; when absent
    /// or empty the path of `request` is used.
    pub async fn create_swan_url<F>(
        &self,
        request: &PageRequest,
        return_url: Option<&str>,
        action: &str,
        add_params: F,
    ) -> Result<String, DomainError>
    where
        F: FnOnce(&mut QueryParams),
    {
        let body = self
            .call_swan(action, |q| {
                self.set_common(request, q);
                let return_url = return_url.filter(|u| !u.is_empty()).unwrap_or(&request.path);
                q.set("returnUrl", return_url);
                self.settings.presentation().apply(q);
                add_params(q);
                Ok(())
            })
            .await?;

        debug!(host = %self.host, action = %action, "Created SWAN URL");
        Ok(String::from_utf8(body.to_vec()).map_err(GatewayError::from)?)
    }

    fn set_common(&self, request: &PageRequest, q: &mut QueryParams) {
        q.set("accessKey", self.settings.swan_access_key.as_str());
        q.set("title", SWAN_TITLE);
        if let Some(addr) = &request.remote_addr {
            q.set("remoteAddr", addr.as_str());
        }
        for name in HOME_NODE_HEADERS {
            if let Some(value) = request.header(name) {
                q.set(name, value);
            }
        }
    }

    /// Signing identity of this site. Fetched once; concurrent first callers
    /// wait on the same lookup. Failed lookups are not remembered.
    pub async fn signing_identity(&self) -> Result<&SigningIdentity, DomainError> {
        self.identity
            .get_or_try_init(|| async {
                match self.config.identities.get_creator(&self.host).await? {
                    Some(identity) => {
                        debug!(host = %self.host, name = %identity.name, "Resolved signing identity");
                        Ok(identity)
                    }
                    None => Err(DomainError::NotRegistered {
                        host: self.host.clone(),
                    }),
                }
            })
            .await
    }

    /// Attach the page handler. Only the first call succeeds.
    pub fn set_handler(&self, handler: Handler) -> Result<(), DomainError> {
        self.handler
            .set(handler)
            .map_err(|_| DomainError::HandlerAlreadySet {
                host: self.host.clone(),
            })
    }

    pub fn handler(&self) -> Option<&Handler> {
        self.handler.get()
    }
}

impl std::fmt::Debug for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Domain")
            .field("host", &self.host)
            .field("category", &self.settings.category)
            .field("templates", &self.templates.len())
            .finish_non_exhaustive()
    }
}
