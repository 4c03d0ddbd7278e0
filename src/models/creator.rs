//! Creator discovery models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ResourceStatus, ResourceType};

/// Account state of a user.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Active,
    Suspended,
    Banned,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "ACTIVE",
            UserStatus::Suspended => "SUSPENDED",
            UserStatus::Banned => "BANNED",
        }
    }
}

/// Resource statuses counted when picking the top creator of each type.
///
/// Looser than elsewhere in discovery: unpublished work counts too.
pub const CATEGORY_LEADER_STATUSES: [ResourceStatus; 3] = [
    ResourceStatus::Approved,
    ResourceStatus::Pending,
    ResourceStatus::Draft,
];

/// Public profile fields of a creator.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatorProfile {
    pub id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub image: Option<String>,
    pub bio: Option<String>,
}

/// One approved resource owned by a creator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OwnedResource {
    pub kind: ResourceType,
    pub download_count: i64,
}

/// An active user owning at least one approved resource.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatorRecord {
    pub profile: CreatorProfile,
    pub followers: i64,
    pub resources: Vec<OwnedResource>,
}

impl CreatorRecord {
    pub fn total_downloads(&self) -> i64 {
        self.resources.iter().map(|r| r.download_count).sum()
    }

    /// Distinct resource types, in first-seen order.
    pub fn specialties(&self) -> Vec<ResourceType> {
        let mut kinds = Vec::new();
        for resource in &self.resources {
            if !kinds.contains(&resource.kind) {
                kinds.push(resource.kind);
            }
        }
        kinds
    }
}

/// Per-(type, creator) aggregate used to pick category leaders.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeCreatorAggregate {
    pub kind: ResourceType,
    pub profile: CreatorProfile,
    pub resources: i64,
    pub downloads: i64,
    pub followers: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CreatorStats {
    pub resources: i64,
    pub downloads: i64,
    pub followers: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatorSummary {
    pub id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub image: Option<String>,
    pub bio: Option<String>,
    pub stats: CreatorStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialties: Option<Vec<ResourceType>>,
}

impl CreatorSummary {
    pub fn new(profile: CreatorProfile, stats: CreatorStats) -> Self {
        Self {
            id: profile.id,
            username: profile.username,
            display_name: profile.display_name,
            image: profile.image,
            bio: profile.bio,
            stats,
            specialties: None,
        }
    }

    pub fn with_specialties(mut self, specialties: Vec<ResourceType>) -> Self {
        self.specialties = Some(specialties);
        self
    }
}

impl From<CreatorRecord> for CreatorSummary {
    fn from(record: CreatorRecord) -> Self {
        let stats = CreatorStats {
            resources: record.resources.len() as i64,
            downloads: record.total_downloads(),
            followers: record.followers,
        };
        let specialties = record.specialties();
        CreatorSummary::new(record.profile, stats).with_specialties(specialties)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: usize,
    /// Mirrors `rank`; no rank history is stored.
    pub previous_rank: usize,
    pub creator: CreatorSummary,
    /// All-time downloads.
    pub weekly_downloads: i64,
    /// Always zero; no rank history is stored.
    pub weekly_change: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    pub leaderboard: Vec<LeaderboardEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopByCategoryResponse {
    /// Keyed by [`ResourceType::slug`].
    pub top_by_category: BTreeMap<String, CreatorSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatorListResponse {
    pub creators: Vec<CreatorSummary>,
}
