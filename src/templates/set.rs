//! Templates belonging to one site.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use super::normalize::compact_html;
use super::template::{Template, TemplateError};

const DEFAULT_TEMPLATE: &str = "default.html";

/// Named templates for a single site, immutable once built.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    templates: BTreeMap<String, Template>,
}

impl TemplateSet {
    /// Parse every `*.html` file directly inside `folder`. Any file that
    /// cannot be read or parsed fails the whole set.
    pub fn from_dir(folder: &Path) -> Result<Self, TemplateError> {
        let io_err = |path: &Path, source| TemplateError::Io {
            path: path.display().to_string(),
            source,
        };

        let mut sources = Vec::new();
        for entry in std::fs::read_dir(folder).map_err(|e| io_err(folder, e))? {
            let path = entry.map_err(|e| io_err(folder, e))?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("html") {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let src = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
            sources.push((name.to_string(), src));
        }

        let set = Self::from_sources(sources)?;
        debug!(folder = %folder.display(), templates = set.len(), "Parsed site templates");
        Ok(set)
    }

    /// Build from `(name, source)` pairs. Sources are normalised before parsing.
    pub fn from_sources<I, N, S>(sources: I) -> Result<Self, TemplateError>
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: AsRef<str>,
    {
        let mut templates = BTreeMap::new();
        for (name, src) in sources {
            let name = name.into();
            let template = Template::parse(name.clone(), &compact_html(src.as_ref()))?;
            templates.insert(name, template);
        }
        Ok(Self { templates })
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Template for a request path: the file name itself, then the site's
    /// category template, then `default.html`.
    pub fn lookup(&self, path: &str, category: &str) -> Option<&Template> {
        let file = path.rsplit('/').next().unwrap_or(path);
        self.get(file)
            .or_else(|| self.get(&format!("{}.html", category.to_lowercase())))
            .or_else(|| self.get(DEFAULT_TEMPLATE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn set(names: &[&str]) -> TemplateSet {
        TemplateSet::from_sources(names.iter().map(|n| (*n, format!("<p>{}</p>", n)))).unwrap()
    }

    fn resolved<'a>(set: &'a TemplateSet, path: &str, category: &str) -> Option<&'a str> {
        set.lookup(path, category).map(Template::name)
    }

    #[test]
    fn test_exact_file_name_first() {
        let s = set(&["index.html", "publisher.html", "default.html"]);
        assert_eq!(resolved(&s, "/news/index.html", "Publisher"), Some("index.html"));
    }

    #[test]
    fn test_category_second() {
        let s = set(&["publisher.html", "default.html"]);
        assert_eq!(resolved(&s, "/news/missing.html", "Publisher"), Some("publisher.html"));
    }

    #[test]
    fn test_default_third() {
        let s = set(&["default.html"]);
        assert_eq!(resolved(&s, "/news/missing.html", "Publisher"), Some("default.html"));
    }

    #[test]
    fn test_none_when_nothing_matches() {
        let s = set(&["other.html"]);
        assert_eq!(resolved(&s, "/", "Publisher"), None);
        assert!(TemplateSet::default().lookup("/a.html", "CMP").is_none());
    }

    #[test]
    fn test_from_dir_reads_only_html() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("default.html"), "<p>\n  {{ .name }}</p>").unwrap();
        std::fs::write(dir.path().join("config.json"), "{}").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "{{").unwrap();

        let s = TemplateSet::from_dir(dir.path()).unwrap();
        assert_eq!(s.len(), 1);
        let out = s.get("default.html").unwrap().render(&json!({"name": "A&B"}));
        assert_eq!(out, "<p> A&amp;B</p>");
    }

    #[test]
    fn test_from_dir_fails_on_any_bad_template() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("default.html"), "<p>ok</p>").unwrap();
        std::fs::write(dir.path().join("broken.html"), "<p>{{ .x </p>").unwrap();
        assert!(matches!(
            TemplateSet::from_dir(dir.path()),
            Err(TemplateError::Unterminated { .. })
        ));
    }

    #[test]
    fn test_from_dir_missing_folder() {
        let dir = TempDir::new().unwrap();
        let err = TemplateSet::from_dir(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, TemplateError::Io { .. }));
    }
}
