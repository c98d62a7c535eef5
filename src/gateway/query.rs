//! Query strings for access-node calls.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Query parameters, one value per key, encoded in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: BTreeMap<String, String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.params.remove(key)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// `application/x-www-form-urlencoded` form, keys sorted.
    pub fn encode(&self) -> Result<String, serde_urlencoded::ser::Error> {
        serde_urlencoded::to_string(&self.params)
    }
}

/// Strings a site passes to the preference UI. Each is sent only when set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presentation {
    pub message: String,
    pub background_color: String,
    pub message_color: String,
    pub progress_color: String,
}

impl Presentation {
    pub fn apply(&self, params: &mut QueryParams) {
        let fields = [
            ("message", &self.message),
            ("backgroundColor", &self.background_color),
            ("progressColor", &self.progress_color),
            ("messageColor", &self.message_color),
        ];
        for (key, value) in fields {
            if !value.is_empty() {
                params.set(key, value.as_str());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_sorted_and_escaped() {
        let mut q = QueryParams::new();
        q.set("returnUrl", "/publisher/index.html");
        q.set("accessKey", "K1");
        q.set("title", "Your Preference Management");
        assert_eq!(
            q.encode().unwrap(),
            "accessKey=K1&returnUrl=%2Fpublisher%2Findex.html&title=Your+Preference+Management"
        );
    }

    #[test]
    fn test_set_replaces() {
        let mut q = QueryParams::new();
        q.set("a", "1");
        q.set("a", "2");
        assert_eq!(q.get("a"), Some("2"));
        assert_eq!(q.len(), 1);
        assert_eq!(q.remove("a").as_deref(), Some("2"));
        assert!(q.is_empty());
    }

    #[test]
    fn test_presentation_emits_only_non_empty() {
        let p = Presentation {
            message: "Hello".into(),
            background_color: String::new(),
            message_color: "#fff".into(),
            progress_color: String::new(),
        };
        let mut q = QueryParams::new();
        p.apply(&mut q);
        assert_eq!(q.get("message"), Some("Hello"));
        assert_eq!(q.get("messageColor"), Some("#fff"));
        assert_eq!(q.get("backgroundColor"), None);
        assert_eq!(q.get("progressColor"), None);

        let mut empty = QueryParams::new();
        Presentation::default().apply(&mut empty);
        assert!(empty.is_empty());
    }
}
