use std::collections::HashMap;

use crate::db::DiscoveryStore;
use crate::errors::AppError;
use crate::models::{
    CollectionResponse, CollectionType, DiscoveryCollection, ResourceListResponse, ResourceQuery,
    ResourceSortField, ResourceSummary, ThemeSettings,
};

/// Resolves curated collections and download rankings.
pub struct CollectionService<'a> {
    store: &'a dyn DiscoveryStore,
}

impl<'a> CollectionService<'a> {
    pub fn new(store: &'a dyn DiscoveryStore) -> Self {
        Self { store }
    }

    /// Resolves a collection with its live resources in item order.
    ///
    /// Theme of the month is computed from its tag instead of stored items.
    /// Fails with `NotFound` when no active collection of `kind` exists; a
    /// configured collection with no live items resolves to an empty list.
    pub async fn resolve(&self, kind: CollectionType) -> Result<CollectionResponse, AppError> {
        if kind == CollectionType::ThemeOfMonth {
            return self.resolve_theme_of_month().await;
        }

        let collection = self.active_collection(kind).await?;

        let mut items = self.store.live_collection_items(&collection.id).await?;
        items.retain(|item| item.is_live());
        items.sort_by_key(|item| item.order);

        let ids: Vec<String> = items.iter().map(|i| i.resource_id.clone()).collect();
        let by_id: HashMap<String, ResourceSummary> = self
            .store
            .resources_by_ids(&ids)
            .await?
            .into_iter()
            .map(|r| (r.id.clone(), r))
            .collect();

        let resources: Vec<ResourceSummary> = items
            .iter()
            .filter_map(|item| by_id.get(&item.resource_id).cloned())
            .collect();

        tracing::debug!(
            collection = %kind,
            items = items.len(),
            resources = resources.len(),
            "Resolved discovery collection"
        );

        Ok(CollectionResponse {
            collection: collection.into(),
            resources,
        })
    }

    /// Approved resources carrying the theme tag, most liked first.
    pub async fn resolve_theme_of_month(&self) -> Result<CollectionResponse, AppError> {
        let collection = self.active_collection(CollectionType::ThemeOfMonth).await?;

        let Some(settings) = ThemeSettings::from_metadata(&collection.metadata) else {
            tracing::warn!(collection_id = %collection.id, "Theme of the month has no tagSlug");
            return Err(AppError::NotFound(format!(
                "Theme tag not configured in metadata for {}",
                CollectionType::ThemeOfMonth
            )));
        };

        let query = ResourceQuery::approved()
            .tagged(settings.tag_slug.clone())
            .order_by(ResourceSortField::LikeCount)
            .order_by(ResourceSortField::DownloadCount)
            .take(settings.limit);
        let resources = self.store.find_resources(&query).await?;

        tracing::debug!(
            tag = %settings.tag_slug,
            limit = settings.limit,
            resources = resources.len(),
            "Resolved theme of the month"
        );

        Ok(CollectionResponse {
            collection: collection.into(),
            resources,
        })
    }

    /// The `limit` approved resources with the most downloads.
    pub async fn most_downloaded(&self, limit: usize) -> Result<ResourceListResponse, AppError> {
        let query = ResourceQuery::approved()
            .order_by(ResourceSortField::DownloadCount)
            .take(limit);
        let resources = self.store.find_resources(&query).await?;

        Ok(ResourceListResponse { resources })
    }

    async fn active_collection(
        &self,
        kind: CollectionType,
    ) -> Result<DiscoveryCollection, AppError> {
        match self.store.find_active_collection(kind).await? {
            Some(collection) if collection.is_active => Ok(collection),
            _ => {
                tracing::warn!(collection = %kind, "Discovery collection is not configured");
                Err(AppError::NotFound(format!(
                    "Collection {} not found or inactive",
                    kind
                )))
            }
        }
    }
}
