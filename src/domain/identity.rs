//! Signing identities registered with the signed-record service.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A domain registered as a signer of OWIDs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningIdentity {
    pub domain: String,
    /// Organisation name shown in audit tables
    pub name: String,
    /// PEM or base64 public key
    #[serde(default)]
    pub public_key: String,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Cannot read identity store {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid identity store: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Identity store unavailable: {0}")]
    Unavailable(String),
}

/// Lookup of signing identities by host.
#[async_trait]
pub trait SigningIdentityStore: Send + Sync {
    /// `Ok(None)` when the host has never registered.
    async fn get_creator(&self, host: &str) -> Result<Option<SigningIdentity>, IdentityError>;
}

/// In-memory store, optionally loaded from a JSON array of identities.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityStore {
    identities: HashMap<String, SigningIdentity>,
}

impl StaticIdentityStore {
    pub fn new(identities: impl IntoIterator<Item = SigningIdentity>) -> Self {
        Self {
            identities: identities
                .into_iter()
                .map(|i| (i.domain.clone(), i))
                .collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, IdentityError> {
        let identities: Vec<SigningIdentity> = serde_json::from_str(json)?;
        Ok(Self::new(identities))
    }

    pub fn from_file(path: &Path) -> Result<Self, IdentityError> {
        let json = std::fs::read_to_string(path).map_err(|source| IdentityError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}

#[async_trait]
impl SigningIdentityStore for StaticIdentityStore {
    async fn get_creator(&self, host: &str) -> Result<Option<SigningIdentity>, IdentityError> {
        Ok(self.identities.get(host).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_store_lookup() {
        let store = StaticIdentityStore::from_json(
            r#"[{"domain": "cmp.example", "name": "Demo CMP", "publicKey": "abc"}]"#,
        )
        .unwrap();
        assert_eq!(store.len(), 1);

        let found = store.get_creator("cmp.example").await.unwrap().unwrap();
        assert_eq!(found.name, "Demo CMP");
        assert_eq!(found.public_key, "abc");
        assert!(store.get_creator("other.example").await.unwrap().is_none());
    }

    #[test]
    fn test_from_file_missing() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = StaticIdentityStore::from_file(&dir.path().join("owid.json")).unwrap_err();
        assert!(matches!(err, IdentityError::Io { .. }));
    }
}
