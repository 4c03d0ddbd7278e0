//! Marketplace resource models as consumed by discovery.

use serde::{Deserialize, Serialize};

/// Moderation state of a resource.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceStatus {
    Draft,
    Pending,
    Approved,
    Rejected,
    Archived,
}

impl ResourceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceStatus::Draft => "DRAFT",
            ResourceStatus::Pending => "PENDING",
            ResourceStatus::Approved => "APPROVED",
            ResourceStatus::Rejected => "REJECTED",
            ResourceStatus::Archived => "ARCHIVED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "DRAFT" => Some(ResourceStatus::Draft),
            "PENDING" => Some(ResourceStatus::Pending),
            "APPROVED" => Some(ResourceStatus::Approved),
            "REJECTED" => Some(ResourceStatus::Rejected),
            "ARCHIVED" => Some(ResourceStatus::Archived),
            _ => None,
        }
    }
}

/// Kind of content a resource ships.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceType {
    Plugin,
    AssetPack,
    Mod,
    Modpack,
    PremadeServer,
    World,
    Prefab,
    DataPack,
    ToolsScripts,
}

impl ResourceType {
    /// Every type, in the order the creator pages list them.
    pub const ALL: [ResourceType; 9] = [
        ResourceType::Plugin,
        ResourceType::AssetPack,
        ResourceType::Mod,
        ResourceType::Modpack,
        ResourceType::PremadeServer,
        ResourceType::World,
        ResourceType::Prefab,
        ResourceType::DataPack,
        ResourceType::ToolsScripts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Plugin => "PLUGIN",
            ResourceType::AssetPack => "ASSET_PACK",
            ResourceType::Mod => "MOD",
            ResourceType::Modpack => "MODPACK",
            ResourceType::PremadeServer => "PREMADE_SERVER",
            ResourceType::World => "WORLD",
            ResourceType::Prefab => "PREFAB",
            ResourceType::DataPack => "DATA_PACK",
            ResourceType::ToolsScripts => "TOOLS_SCRIPTS",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    /// URL-style key, e.g. `TOOLS_SCRIPTS` becomes `tools-scripts`.
    pub fn slug(&self) -> String {
        self.as_str().to_lowercase().replace('_', "-")
    }
}

/// Owning user, reduced to what cards display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OwnerUser {
    pub id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub image: Option<String>,
}

/// Owning team, reduced to what cards display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OwnerTeam {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LatestVersion {
    pub id: String,
    pub version_number: String,
    pub name: Option<String>,
    pub channel: String,
    pub created_at: String,
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub slug: String,
}

/// Join row between a resource and a tag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceTag {
    pub tag: Tag,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
}

/// Join row between a resource and a category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceCategory {
    pub category: Category,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct ResourceCounts {
    pub versions: i64,
    pub downloads: i64,
}

/// A resource as rendered on discovery cards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSummary {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub banner_url: Option<String>,
    #[serde(rename = "type")]
    pub kind: ResourceType,
    pub status: ResourceStatus,
    pub download_count: i64,
    pub like_count: i64,
    /// Exactly one of `owner_user` and `owner_team` is set.
    pub owner_user: Option<OwnerUser>,
    pub owner_team: Option<OwnerTeam>,
    pub latest_version: Option<LatestVersion>,
    pub tags: Vec<ResourceTag>,
    pub categories: Vec<ResourceCategory>,
    #[serde(rename = "_count")]
    pub counts: ResourceCounts,
    pub created_at: String,
    pub updated_at: String,
}

/// Sortable resource columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceSortField {
    LikeCount,
    DownloadCount,
}

impl ResourceSortField {
    pub fn column(&self) -> &'static str {
        match self {
            ResourceSortField::LikeCount => "like_count",
            ResourceSortField::DownloadCount => "download_count",
        }
    }
}

/// Filter, sort and limit over resources. Sort keys are all descending.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceQuery {
    pub statuses: Vec<ResourceStatus>,
    pub tag_slug: Option<String>,
    pub order_by: Vec<ResourceSortField>,
    pub limit: usize,
}

impl ResourceQuery {
    pub fn approved() -> Self {
        Self {
            statuses: vec![ResourceStatus::Approved],
            tag_slug: None,
            order_by: Vec::new(),
            limit: usize::MAX,
        }
    }

    pub fn tagged(mut self, slug: impl Into<String>) -> Self {
        self.tag_slug = Some(slug.into());
        self
    }

    pub fn order_by(mut self, field: ResourceSortField) -> Self {
        self.order_by.push(field);
        self
    }

    pub fn take(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_type_slug() {
        assert_eq!(ResourceType::ToolsScripts.slug(), "tools-scripts");
        assert_eq!(ResourceType::PremadeServer.slug(), "premade-server");
        assert_eq!(ResourceType::Plugin.slug(), "plugin");
    }

    #[test]
    fn test_resource_type_round_trips_through_str() {
        for kind in ResourceType::ALL {
            assert_eq!(ResourceType::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(ResourceType::from_str("SKIN"), None);
    }

    #[test]
    fn test_resource_summary_counts_key() {
        let summary = ResourceSummary {
            id: "r1".to_string(),
            name: "Core".to_string(),
            slug: "core".to_string(),
            tagline: None,
            description: None,
            icon_url: None,
            banner_url: None,
            kind: ResourceType::Plugin,
            status: ResourceStatus::Approved,
            download_count: 3,
            like_count: 1,
            owner_user: None,
            owner_team: None,
            latest_version: None,
            tags: Vec::new(),
            categories: Vec::new(),
            counts: ResourceCounts {
                versions: 2,
                downloads: 3,
            },
            created_at: "2025-01-01T00:00:00Z".to_string(),
            updated_at: "2025-01-01T00:00:00Z".to_string(),
        };
        let encoded = serde_json::to_value(&summary).unwrap();
        assert_eq!(encoded["_count"]["versions"], 2);
        assert!(encoded.get("counts").is_none());
    }

    #[test]
    fn test_resource_query_builder() {
        let query = ResourceQuery::approved()
            .tagged("survival")
            .order_by(ResourceSortField::LikeCount)
            .order_by(ResourceSortField::DownloadCount)
            .take(4);

        assert_eq!(query.statuses, vec![ResourceStatus::Approved]);
        assert_eq!(query.tag_slug.as_deref(), Some("survival"));
        assert_eq!(
            query.order_by,
            vec![ResourceSortField::LikeCount, ResourceSortField::DownloadCount]
        );
        assert_eq!(query.limit, 4);
    }
}
