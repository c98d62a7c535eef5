//! Process-wide settings shared by every site.

use std::sync::Arc;

use crate::gateway::Transport;

use super::identity::SigningIdentityStore;

/// Shared by all sites; cheap to clone.
#[derive(Clone)]
pub struct Configuration {
    /// `http` or `https`, used for access-node calls
    pub scheme: String,
    pub transport: Arc<dyn Transport>,
    pub identities: Arc<dyn SigningIdentityStore>,
}

impl Configuration {
    pub fn new(
        scheme: impl Into<String>,
        transport: Arc<dyn Transport>,
        identities: Arc<dyn SigningIdentityStore>,
    ) -> Self {
        Self {
            scheme: scheme.into(),
            transport,
            identities,
        }
    }
}

impl std::fmt::Debug for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Configuration")
            .field("scheme", &self.scheme)
            .finish_non_exhaustive()
    }
}
