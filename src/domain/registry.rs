//! All sites of the demo, keyed by host.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info};

use super::{Configuration, Domain, DomainError};

/// A site folder that could not be loaded.
#[derive(Debug)]
pub struct LoadFailure {
    pub folder: PathBuf,
    pub error: DomainError,
}

#[derive(Debug, Default)]
pub struct SiteRegistry {
    sites: BTreeMap<String, Arc<Domain>>,
    failures: Vec<LoadFailure>,
}

impl SiteRegistry {
    /// Load every sub-folder of `root` as a site. A site that fails to load is
    /// logged, recorded in [`failures`](Self::failures) and skipped.
    pub fn load_dir(config: &Configuration, root: &Path) -> Result<Self, DomainError> {
        let entries = std::fs::read_dir(root).map_err(|source| DomainError::Io {
            path: root.display().to_string(),
            source,
        })?;

        let mut folders: Vec<PathBuf> = entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.is_dir())
            .collect();
        folders.sort();

        let mut registry = Self::default();
        for folder in folders {
            match Domain::load(config.clone(), &folder) {
                Ok(domain) => registry.insert(domain),
                Err(e) => {
                    error!(folder = %folder.display(), error = %e, "Skipping site");
                    registry.failures.push(LoadFailure { folder, error: e });
                }
            }
        }

        info!(
            root = %root.display(),
            sites = registry.len(),
            failed = registry.failures.len(),
            "Loaded sites"
        );
        Ok(registry)
    }

    pub fn insert(&mut self, domain: Domain) {
        self.sites.insert(domain.host().to_string(), Arc::new(domain));
    }

    /// Site for a request host. Any port is ignored.
    pub fn get(&self, host: &str) -> Option<Arc<Domain>> {
        let host = host.split(':').next().unwrap_or(host);
        self.sites.get(host).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Domain>> {
        self.sites.values()
    }

    pub fn failures(&self) -> &[LoadFailure] {
        &self.failures
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StaticIdentityStore;
    use crate::gateway::MockTransport;
    use tempfile::TempDir;

    fn config() -> Configuration {
        Configuration::new(
            "https",
            Arc::new(MockTransport::new()),
            Arc::new(StaticIdentityStore::default()),
        )
    }

    fn add_site(root: &Path, host: &str, config: &str, template: &str) {
        let folder = root.join(host);
        std::fs::create_dir(&folder).unwrap();
        std::fs::write(folder.join("config.json"), config).unwrap();
        std::fs::write(folder.join("default.html"), template).unwrap();
    }

    #[test]
    fn test_load_dir_skips_broken_sites() {
        let root = TempDir::new().unwrap();
        add_site(root.path(), "cmp.example", r#"{"Category": "CMP"}"#, "<p>cmp</p>");
        add_site(root.path(), "pub.example", r#"{"Category": "Publisher"}"#, "<p>pub</p>");
        add_site(root.path(), "bad.example", "{}", "<p>{{ .x</p>");
        std::fs::write(root.path().join("README.txt"), "not a site").unwrap();

        let registry = SiteRegistry::load_dir(&config(), root.path()).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.failures().len(), 1);
        assert!(registry.failures()[0].folder.ends_with("bad.example"));

        let hosts: Vec<_> = registry.iter().map(|d| d.host().to_string()).collect();
        assert_eq!(hosts, vec!["cmp.example", "pub.example"]);
    }

    #[test]
    fn test_get_ignores_port() {
        let root = TempDir::new().unwrap();
        add_site(root.path(), "pub.example", "{}", "<p>pub</p>");
        let registry = SiteRegistry::load_dir(&config(), root.path()).unwrap();

        assert!(registry.get("pub.example:8080").is_some());
        assert!(registry.get("pub.example").is_some());
        assert!(registry.get("other.example").is_none());
    }

    #[test]
    fn test_missing_root() {
        let root = TempDir::new().unwrap();
        assert!(SiteRegistry::load_dir(&config(), &root.path().join("nope")).is_err());
    }
}
