//! Payloads carried by signed events in an offer tree.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::owid::encoding;

/// Display role of a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Bid,
    Offer,
    Empty,
    Failed,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bid => "Bid",
            Self::Offer => "Offer",
            Self::Empty => "Empty",
            Self::Failed => "Failed",
        }
    }

    /// Parse the `type` discriminant of a payload.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Bid" => Some(Self::Bid),
            "Offer" => Some(Self::Offer),
            "Empty" => Some(Self::Empty),
            "Failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A supplier's successful participation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Bid {
    /// Creative to display if this bid wins
    #[serde(rename = "mediaURL")]
    pub media_url: String,
    /// Landing page for the advertiser
    #[serde(rename = "advertiserURL")]
    pub advertiser_url: String,
}

/// The terminal payload presented to the marketer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Offer {
    pub version: u8,
    /// Site that generated the offer
    pub domain: String,
    #[serde(with = "encoding")]
    pub signature: Vec<u8>,
    /// Common browser identifier
    pub cbid: String,
    /// Signed-in identifier
    pub sid: String,
    /// Recorded personalisation preferences
    pub preferences: String,
    pub pub_domain: String,
    pub placement: String,
    /// Uniqueness token
    #[serde(with = "encoding")]
    pub uuid: Vec<u8>,
    /// Suppliers that must not be shown to this browser
    pub stopped: Vec<String>,
}

/// A participant that failed to respond.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Failed {
    /// Site that failed
    pub host: String,
    /// Human-readable reason
    pub error: String,
}

/// Decoded payload of a signed event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EventPayload {
    Bid(Bid),
    Offer(Offer),
    Empty,
    Failed(Failed),
}

/// Errors decoding a payload.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("payload has no 'type' discriminant")]
    MissingType,

    #[error("unknown payload type '{0}'")]
    UnknownType(String),

    #[error("malformed {role} payload: {source}")]
    Malformed {
        role: Role,
        #[source]
        source: serde_json::Error,
    },
}

impl EventPayload {
    /// Decode a raw payload. The discriminant is checked before the body so
    /// an unknown type is reported as such rather than as a serde error.
    pub fn from_value(value: &JsonValue) -> Result<Self, PayloadError> {
        let role = value
            .get("type")
            .and_then(JsonValue::as_str)
            .ok_or(PayloadError::MissingType)
            .and_then(|t| Role::parse(t).ok_or_else(|| PayloadError::UnknownType(t.to_string())))?;

        serde_json::from_value(value.clone()).map_err(|source| PayloadError::Malformed { role, source })
    }

    pub fn role(&self) -> Role {
        match self {
            Self::Bid(_) => Role::Bid,
            Self::Offer(_) => Role::Offer,
            Self::Empty => Role::Empty,
            Self::Failed(_) => Role::Failed,
        }
    }
}

/// Classify any value for display: a payload, or a node carrying one under
/// `payload`. Anything else classifies as the empty string.
pub fn role_name(value: &JsonValue) -> &'static str {
    if value.get("type").is_some() {
        return EventPayload::from_value(value)
            .map(|p| p.role().as_str())
            .unwrap_or("");
    }
    match value.get("payload") {
        Some(inner) => role_name(inner),
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_each_variant() {
        let bid = EventPayload::from_value(&json!({
            "type": "Bid",
            "mediaURL": "https://m.example/a.png",
            "advertiserURL": "https://adv.example"
        }))
        .unwrap();
        assert_eq!(bid.role(), Role::Bid);

        let empty = EventPayload::from_value(&json!({ "type": "Empty" })).unwrap();
        assert_eq!(empty, EventPayload::Empty);

        let failed = EventPayload::from_value(&json!({
            "type": "Failed",
            "host": "dsp.example",
            "error": "timeout"
        }))
        .unwrap();
        assert_eq!(
            failed,
            EventPayload::Failed(Failed {
                host: "dsp.example".into(),
                error: "timeout".into()
            })
        );

        let offer = EventPayload::from_value(&json!({
            "type": "Offer",
            "version": 1,
            "domain": "pub.example",
            "signature": "AQID",
            "cbid": "cbid-1",
            "pubDomain": "pub.example",
            "placement": "top",
            "uuid": "BAU=",
            "stopped": ["bad.example"]
        }))
        .unwrap();
        match offer {
            EventPayload::Offer(o) => {
                assert_eq!(o.signature, vec![1, 2, 3]);
                assert_eq!(o.uuid, vec![4, 5]);
                assert_eq!(o.stopped, vec!["bad.example"]);
                assert_eq!(o.pub_domain, "pub.example");
            }
            other => panic!("expected offer, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(
            EventPayload::from_value(&json!({ "host": "x" })),
            Err(PayloadError::MissingType)
        ));
        assert!(matches!(
            EventPayload::from_value(&json!({ "type": "Auction" })),
            Err(PayloadError::UnknownType(t)) if t == "Auction"
        ));
        assert!(matches!(
            EventPayload::from_value(&json!({ "type": "Failed", "host": 7 })),
            Err(PayloadError::Malformed { role: Role::Failed, .. })
        ));
    }

    #[test]
    fn test_role_name() {
        assert_eq!(role_name(&json!({ "type": "Bid" })), "Bid");
        assert_eq!(role_name(&json!({ "payload": { "type": "Failed" } })), "Failed");
        assert_eq!(role_name(&json!({ "type": "Offer" })), "Offer");
        assert_eq!(role_name(&json!({ "type": "Empty" })), "Empty");
        assert_eq!(role_name(&json!({ "type": "Other" })), "");
        assert_eq!(role_name(&json!("Bid")), "");
        assert_eq!(role_name(&JsonValue::Null), "");
    }
}
