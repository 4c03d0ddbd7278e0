//! Discovery collection models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ResourceSummary;

/// Curated collection kinds shown on the marketplace front page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollectionType {
    SelectionOfWeek,
    HiddenGems,
    StarterPack,
    ThemeOfMonth,
}

impl CollectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionType::SelectionOfWeek => "SELECTION_OF_WEEK",
            CollectionType::HiddenGems => "HIDDEN_GEMS",
            CollectionType::StarterPack => "STARTER_PACK",
            CollectionType::ThemeOfMonth => "THEME_OF_MONTH",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "SELECTION_OF_WEEK" => Some(CollectionType::SelectionOfWeek),
            "HIDDEN_GEMS" => Some(CollectionType::HiddenGems),
            "STARTER_PACK" => Some(CollectionType::StarterPack),
            "THEME_OF_MONTH" => Some(CollectionType::ThemeOfMonth),
            _ => None,
        }
    }
}

impl std::fmt::Display for CollectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored discovery collection row.
#[derive(Debug, Clone)]
pub struct DiscoveryCollection {
    pub id: String,
    pub kind: CollectionType,
    pub title: String,
    pub description: Option<String>,
    /// Free-form settings. Always a JSON object; `{}` when unset.
    pub metadata: Value,
    pub is_active: bool,
}

/// A link from a collection to one resource.
#[derive(Debug, Clone)]
pub struct CollectionItem {
    pub resource_id: String,
    pub order: i64,
    /// Set once the item has been retired from the collection.
    pub end_date: Option<String>,
}

impl CollectionItem {
    pub fn is_live(&self) -> bool {
        self.end_date.is_none()
    }
}

/// Public view of a collection, without activation state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: CollectionType,
    pub title: String,
    pub description: Option<String>,
    pub metadata: Value,
}

impl From<DiscoveryCollection> for CollectionSummary {
    fn from(collection: DiscoveryCollection) -> Self {
        Self {
            id: collection.id,
            kind: collection.kind,
            title: collection.title,
            description: collection.description,
            metadata: collection.metadata,
        }
    }
}

/// Response body of every collection route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionResponse {
    pub collection: CollectionSummary,
    pub resources: Vec<ResourceSummary>,
}

/// Response body of the most-downloaded route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceListResponse {
    pub resources: Vec<ResourceSummary>,
}

/// Number of resources shown for a theme when metadata does not say.
pub const DEFAULT_THEME_LIMIT: usize = 4;

/// Settings read from a theme-of-month collection's metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeSettings {
    pub tag_slug: String,
    pub limit: usize,
}

impl ThemeSettings {
    /// Returns `None` when `tagSlug` is missing, empty, or not a string.
    ///
    /// A missing, non-numeric or zero `limit` falls back to the default.
    pub fn from_metadata(metadata: &Value) -> Option<Self> {
        let tag_slug = metadata
            .get("tagSlug")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())?
            .to_string();

        let limit = metadata
            .get("limit")
            .and_then(Value::as_u64)
            .filter(|&n| n > 0)
            .map(|n| n as usize)
            .unwrap_or(DEFAULT_THEME_LIMIT);

        Some(Self { tag_slug, limit })
    }
}
