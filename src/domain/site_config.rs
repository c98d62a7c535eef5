//! The `config.json` found in every site folder.

use serde::{Deserialize, Serialize};

use crate::gateway::Presentation;

/// An advert a site can serve.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Advert {
    #[serde(rename = "MediaURL")]
    pub media_url: String,
    #[serde(rename = "AdvertiserURL")]
    pub advertiser_url: String,
}

/// Settings for one site. Unknown keys are ignored and missing ones default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SiteConfig {
    /// Kind of site, e.g. "Publisher", "Marketer", "CMP"
    pub category: String,
    pub name: String,
    /// Plays a bad actor in the demo
    pub bad: bool,
    pub swan_message: String,
    pub swan_background_color: String,
    pub swan_message_color: String,
    pub swan_progress_color: String,
    /// Access node host; only CMPs have one
    #[serde(rename = "SWANAccessNode")]
    pub swan_access_node: String,
    #[serde(rename = "SWANAccessKey")]
    pub swan_access_key: String,
    /// CMP that reaches SWAN on this site's behalf
    #[serde(rename = "CMP")]
    pub cmp: String,
    pub suppliers: Vec<String>,
    pub adverts: Vec<Advert>,
}

impl SiteConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn presentation(&self) -> Presentation {
        Presentation {
            message: self.swan_message.clone(),
            background_color: self.swan_background_color.clone(),
            message_color: self.swan_message_color.clone(),
            progress_color: self.swan_progress_color.clone(),
        }
    }
}
