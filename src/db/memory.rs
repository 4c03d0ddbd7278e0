//! In-memory [`DiscoveryStore`] for resolver tests.

use std::cmp::Reverse;
use std::collections::HashMap;

use async_trait::async_trait;

use super::DiscoveryStore;
use crate::errors::AppError;
use crate::models::{
    CollectionItem, CollectionType, CreatorProfile, CreatorRecord, DiscoveryCollection,
    OwnedResource, ResourceQuery, ResourceSortField, ResourceStatus, ResourceSummary,
    ResourceType, TypeCreatorAggregate, UserStatus,
};

fn matches(query: &ResourceQuery, resource: &ResourceSummary) -> bool {
    let tagged = match &query.tag_slug {
        Some(slug) => resource.tags.iter().any(|t| &t.tag.slug == slug),
        None => true,
    };
    query.statuses.contains(&resource.status) && tagged
}

fn sort_value(field: ResourceSortField, resource: &ResourceSummary) -> i64 {
    match field {
        ResourceSortField::LikeCount => resource.like_count,
        ResourceSortField::DownloadCount => resource.download_count,
    }
}

#[derive(Debug, Clone)]
pub struct MemoryUser {
    pub profile: CreatorProfile,
    pub status: UserStatus,
    pub followers: i64,
}

/// Resources owned by a team have `owner_user: None`.
#[derive(Default)]
pub struct MemoryStore {
    pub collections: Vec<(DiscoveryCollection, Vec<CollectionItem>)>,
    pub resources: Vec<ResourceSummary>,
    pub users: Vec<MemoryUser>,
    /// Set to make every query fail as a lost connection would.
    pub fail: bool,
}

impl MemoryStore {
    fn check(&self) -> Result<(), AppError> {
        if self.fail {
            return Err(AppError::Database("connection refused".to_string()));
        }
        Ok(())
    }

    fn owner_of(&self, resource: &ResourceSummary) -> Option<&MemoryUser> {
        let owner = resource.owner_user.as_ref()?;
        self.users.iter().find(|u| u.profile.id == owner.id)
    }
}

#[async_trait]
impl DiscoveryStore for MemoryStore {
    async fn find_active_collection(
        &self,
        kind: CollectionType,
    ) -> Result<Option<DiscoveryCollection>, AppError> {
        self.check()?;
        Ok(self
            .collections
            .iter()
            .map(|(c, _)| c)
            .find(|c| c.kind == kind && c.is_active)
            .cloned())
    }

    async fn live_collection_items(
        &self,
        collection_id: &str,
    ) -> Result<Vec<CollectionItem>, AppError> {
        self.check()?;
        let mut items: Vec<CollectionItem> = self
            .collections
            .iter()
            .filter(|(c, _)| c.id == collection_id)
            .flat_map(|(_, items)| items.iter().filter(|i| i.is_live()).cloned())
            .collect();
        items.sort_by_key(|i| i.order);
        Ok(items)
    }

    async fn resources_by_ids(&self, ids: &[String]) -> Result<Vec<ResourceSummary>, AppError> {
        self.check()?;
        // Reverse storage order so callers cannot rely on it.
        Ok(self
            .resources
            .iter()
            .rev()
            .filter(|r| ids.contains(&r.id))
            .cloned()
            .collect())
    }

    async fn find_resources(
        &self,
        query: &ResourceQuery,
    ) -> Result<Vec<ResourceSummary>, AppError> {
        self.check()?;
        let mut matched: Vec<ResourceSummary> = self
            .resources
            .iter()
            .filter(|r| matches(query, r))
            .cloned()
            .collect();
        matched.sort_by(|a, b| {
            query
                .order_by
                .iter()
                .map(|&field| sort_value(field, b).cmp(&sort_value(field, a)))
                .find(|o| o.is_ne())
                .unwrap_or_else(|| a.id.cmp(&b.id))
        });
        matched.truncate(query.limit);
        Ok(matched)
    }

    async fn eligible_creators(&self) -> Result<Vec<CreatorRecord>, AppError> {
        self.check()?;
        let mut owned: HashMap<&str, Vec<OwnedResource>> = HashMap::new();
        for resource in &self.resources {
            if resource.status != ResourceStatus::Approved {
                continue;
            }
            if let Some(owner) = &resource.owner_user {
                owned.entry(owner.id.as_str()).or_default().push(OwnedResource {
                    kind: resource.kind,
                    download_count: resource.download_count,
                });
            }
        }

        let mut creators: Vec<CreatorRecord> = self
            .users
            .iter()
            .filter(|u| u.status == UserStatus::Active)
            .filter_map(|u| {
                let resources = owned.remove(u.profile.id.as_str())?;
                Some(CreatorRecord {
                    profile: u.profile.clone(),
                    followers: u.followers,
                    resources,
                })
            })
            .collect();
        creators.sort_by(|a, b| a.profile.id.cmp(&b.profile.id));
        Ok(creators)
    }

    async fn creator_totals_by_type(
        &self,
        kinds: &[ResourceType],
        statuses: &[ResourceStatus],
    ) -> Result<Vec<TypeCreatorAggregate>, AppError> {
        self.check()?;
        let mut groups: HashMap<(ResourceType, String), TypeCreatorAggregate> = HashMap::new();
        for resource in &self.resources {
            if !kinds.contains(&resource.kind) || !statuses.contains(&resource.status) {
                continue;
            }
            let Some(owner) = self.owner_of(resource) else {
                continue;
            };
            if owner.status != UserStatus::Active {
                continue;
            }
            let entry = groups
                .entry((resource.kind, owner.profile.id.clone()))
                .or_insert_with(|| TypeCreatorAggregate {
                    kind: resource.kind,
                    profile: owner.profile.clone(),
                    resources: 0,
                    downloads: 0,
                    followers: owner.followers,
                });
            entry.resources += 1;
            entry.downloads += resource.download_count;
        }

        let mut rows: Vec<TypeCreatorAggregate> = groups.into_values().collect();
        rows.sort_by_key(|r| (r.kind, Reverse(r.downloads)));
        Ok(rows)
    }
}
