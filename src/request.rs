//! The parts of an inbound page request that sites and gateways read.

use std::collections::BTreeMap;

/// Inbound request as seen by a site.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// Host header without port
    pub host: String,
    /// Request path, e.g. `/publisher/index.html`
    pub path: String,
    /// Peer address of the connection
    pub remote_addr: Option<String>,
    /// Headers, keys lower-cased
    pub headers: BTreeMap<String, String>,
    /// Decoded query/form values
    pub form: BTreeMap<String, Vec<String>>,
}

impl PageRequest {
    pub fn new(host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    /// Build from a host and a request target such as `/a/b.html?stop=1`.
    pub fn from_target(host: impl Into<String>, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((p, q)) => (p, q),
            None => (target, ""),
        };
        let mut request = Self::new(host, path);
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).unwrap_or_default();
        for (key, value) in pairs {
            request.form.entry(key).or_default().push(value);
        }
        request
    }

    pub fn with_remote_addr(mut self, addr: impl Into<String>) -> Self {
        self.remote_addr = Some(addr.into());
        self
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn has_form_key(&self, key: &str) -> bool {
        self.form.contains_key(key)
    }

    /// First value for a form key.
    pub fn form_value(&self, key: &str) -> Option<&str> {
        self.form.get(key).and_then(|v| v.first()).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_target_splits_query() {
        let r = PageRequest::from_target("pub.example", "/news/a.html?stop=&placement=top%20banner");
        assert_eq!(r.path, "/news/a.html");
        assert!(r.has_form_key("stop"));
        assert_eq!(r.form_value("placement"), Some("top banner"));
    }

    #[test]
    fn test_headers_case_insensitive() {
        let r = PageRequest::new("h", "/").with_header("X-Forwarded-For", "10.0.0.1");
        assert_eq!(r.header("x-forwarded-for"), Some("10.0.0.1"));
        assert_eq!(r.header("X-FORWARDED-FOR"), Some("10.0.0.1"));
    }
}
