//! SQLite implementation of the discovery read queries.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use super::DiscoveryStore;
use crate::errors::AppError;
use crate::models::{
    Category, CollectionItem, CollectionType, CreatorProfile, CreatorRecord, DiscoveryCollection,
    LatestVersion, OwnedResource, OwnerTeam, OwnerUser, ResourceCategory, ResourceCounts,
    ResourceQuery, ResourceStatus, ResourceSummary, ResourceTag, ResourceType, Tag,
    TypeCreatorAggregate, UserStatus,
};

/// Resource columns plus owner, latest version and counts.
const SUMMARY_SELECT: &str = r#"
    SELECT r.id, r.name, r.slug, r.tagline, r.description, r.icon_url, r.banner_url,
           r.type, r.status, r.download_count, r.like_count, r.created_at, r.updated_at,
           u.id AS owner_user_id, u.username AS owner_username,
           u.display_name AS owner_display_name, u.image AS owner_image,
           t.id AS owner_team_id, t.name AS owner_team_name,
           t.slug AS owner_team_slug, t.logo AS owner_team_logo,
           v.id AS version_id, v.version_number, v.name AS version_name,
           v.channel AS version_channel, v.created_at AS version_created_at,
           v.published_at AS version_published_at,
           (SELECT COUNT(*) FROM resource_versions rv WHERE rv.resource_id = r.id) AS version_total,
           (SELECT COUNT(*) FROM resource_downloads rd WHERE rd.resource_id = r.id) AS download_total
    FROM resources r
    LEFT JOIN users u ON u.id = r.owner_user_id
    LEFT JOIN teams t ON t.id = r.owner_team_id
    LEFT JOIN resource_versions v ON v.id = r.latest_version_id
"#;

/// Database repository for all discovery reads.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Run a summary query and attach tags and categories to each row.
    async fn fetch_summaries(
        &self,
        mut builder: QueryBuilder<'_, Sqlite>,
    ) -> Result<Vec<ResourceSummary>, AppError> {
        let rows = builder.build().fetch_all(&self.pool).await?;
        let mut resources = rows
            .iter()
            .map(summary_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        if resources.is_empty() {
            return Ok(resources);
        }

        let ids: Vec<String> = resources.iter().map(|r| r.id.clone()).collect();
        let mut tags = self.tags_for(&ids).await?;
        let mut categories = self.categories_for(&ids).await?;

        for resource in &mut resources {
            resource.tags = tags.remove(&resource.id).unwrap_or_default();
            resource.categories = categories.remove(&resource.id).unwrap_or_default();
        }

        Ok(resources)
    }

    async fn tags_for(&self, ids: &[String]) -> Result<HashMap<String, Vec<ResourceTag>>, AppError> {
        let mut builder = QueryBuilder::new(
            "SELECT rt.resource_id, tg.id, tg.name, tg.slug \
             FROM resource_tags rt JOIN tags tg ON tg.id = rt.tag_id \
             WHERE rt.resource_id IN (",
        );
        push_bind_list(&mut builder, ids.iter().map(String::as_str));
        builder.push(") ORDER BY tg.name");

        let rows = builder.build().fetch_all(&self.pool).await?;
        let mut by_resource: HashMap<String, Vec<ResourceTag>> = HashMap::new();
        for row in rows {
            by_resource
                .entry(row.try_get("resource_id")?)
                .or_default()
                .push(ResourceTag {
                    tag: Tag {
                        id: row.try_get("id")?,
                        name: row.try_get("name")?,
                        slug: row.try_get("slug")?,
                    },
                });
        }
        Ok(by_resource)
    }

    async fn categories_for(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, Vec<ResourceCategory>>, AppError> {
        let mut builder = QueryBuilder::new(
            "SELECT rc.resource_id, c.id, c.name, c.slug \
             FROM resource_categories rc JOIN categories c ON c.id = rc.category_id \
             WHERE rc.resource_id IN (",
        );
        push_bind_list(&mut builder, ids.iter().map(String::as_str));
        builder.push(") ORDER BY c.name");

        let rows = builder.build().fetch_all(&self.pool).await?;
        let mut by_resource: HashMap<String, Vec<ResourceCategory>> = HashMap::new();
        for row in rows {
            by_resource
                .entry(row.try_get("resource_id")?)
                .or_default()
                .push(ResourceCategory {
                    category: Category {
                        id: row.try_get("id")?,
                        name: row.try_get("name")?,
                        slug: row.try_get("slug")?,
                    },
                });
        }
        Ok(by_resource)
    }
}

#[async_trait]
impl DiscoveryStore for Repository {
    async fn find_active_collection(
        &self,
        kind: CollectionType,
    ) -> Result<Option<DiscoveryCollection>, AppError> {
        let row = sqlx::query(
            "SELECT id, type, title, description, metadata, is_active \
             FROM discovery_collections WHERE type = ? AND is_active = 1",
        )
        .bind(kind.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(collection_from_row).transpose()
    }

    async fn live_collection_items(
        &self,
        collection_id: &str,
    ) -> Result<Vec<CollectionItem>, AppError> {
        let rows = sqlx::query(
            "SELECT resource_id, sort_order, end_date FROM discovery_collection_items \
             WHERE collection_id = ? AND end_date IS NULL ORDER BY sort_order ASC",
        )
        .bind(collection_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<CollectionItem, AppError> {
                Ok(CollectionItem {
                    resource_id: row.try_get("resource_id")?,
                    order: row.try_get("sort_order")?,
                    end_date: row.try_get("end_date")?,
                })
            })
            .collect()
    }

    async fn resources_by_ids(&self, ids: &[String]) -> Result<Vec<ResourceSummary>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::new(SUMMARY_SELECT);
        builder.push(" WHERE r.id IN (");
        push_bind_list(&mut builder, ids.iter().map(String::as_str));
        builder.push(")");

        self.fetch_summaries(builder).await
    }

    async fn find_resources(
        &self,
        query: &ResourceQuery,
    ) -> Result<Vec<ResourceSummary>, AppError> {
        if query.statuses.is_empty() || query.limit == 0 {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::new(SUMMARY_SELECT);
        builder.push(" WHERE r.status IN (");
        push_bind_list(&mut builder, query.statuses.iter().map(|s| s.as_str()));
        builder.push(")");

        if let Some(slug) = &query.tag_slug {
            builder.push(
                " AND EXISTS (SELECT 1 FROM resource_tags rt JOIN tags tg ON tg.id = rt.tag_id \
                 WHERE rt.resource_id = r.id AND tg.slug = ",
            );
            builder.push_bind(slug.clone());
            builder.push(")");
        }

        builder.push(" ORDER BY ");
        for field in &query.order_by {
            builder.push(format!("r.{} DESC, ", field.column()));
        }
        // Stable output for equal sort keys.
        builder.push("r.id ASC LIMIT ");
        builder.push_bind(i64::try_from(query.limit).unwrap_or(i64::MAX));

        self.fetch_summaries(builder).await
    }

    async fn eligible_creators(&self) -> Result<Vec<CreatorRecord>, AppError> {
        let users = sqlx::query(
            r#"SELECT u.id, u.username, u.display_name, u.image, u.bio,
                      (SELECT COUNT(DISTINCT f.follower_id) FROM follows f
                       WHERE f.following_id = u.id) AS followers
               FROM users u
               WHERE u.status = ?
                 AND EXISTS (SELECT 1 FROM resources r
                             WHERE r.owner_user_id = u.id AND r.status = ?)
               ORDER BY u.id"#,
        )
        .bind(UserStatus::Active.as_str())
        .bind(ResourceStatus::Approved.as_str())
        .fetch_all(&self.pool)
        .await?;

        let owned = sqlx::query(
            r#"SELECT r.owner_user_id, r.type, r.download_count
               FROM resources r
               JOIN users u ON u.id = r.owner_user_id
               WHERE u.status = ? AND r.status = ?
               ORDER BY r.created_at, r.id"#,
        )
        .bind(UserStatus::Active.as_str())
        .bind(ResourceStatus::Approved.as_str())
        .fetch_all(&self.pool)
        .await?;

        let mut resources_by_owner: HashMap<String, Vec<OwnedResource>> = HashMap::new();
        for row in &owned {
            resources_by_owner
                .entry(row.try_get("owner_user_id")?)
                .or_default()
                .push(OwnedResource {
                    kind: parse_resource_type(&row.try_get::<String, _>("type")?)?,
                    download_count: row.try_get("download_count")?,
                });
        }

        users
            .iter()
            .map(|row| -> Result<CreatorRecord, AppError> {
                let profile = profile_from_row(row)?;
                let resources = resources_by_owner.remove(&profile.id).unwrap_or_default();
                Ok(CreatorRecord {
                    followers: row.try_get("followers")?,
                    profile,
                    resources,
                })
            })
            .collect()
    }

    async fn creator_totals_by_type(
        &self,
        kinds: &[ResourceType],
        statuses: &[ResourceStatus],
    ) -> Result<Vec<TypeCreatorAggregate>, AppError> {
        if kinds.is_empty() || statuses.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::new(
            r#"SELECT r.type AS resource_type, u.id, u.username, u.display_name, u.image, u.bio,
                      COUNT(r.id) AS resources,
                      COALESCE(SUM(r.download_count), 0) AS downloads,
                      (SELECT COUNT(DISTINCT f.follower_id) FROM follows f
                       WHERE f.following_id = u.id) AS followers
               FROM users u
               JOIN resources r ON r.owner_user_id = u.id
               WHERE u.status = "#,
        );
        builder.push_bind(UserStatus::Active.as_str());
        builder.push(" AND r.status IN (");
        push_bind_list(&mut builder, statuses.iter().map(|s| s.as_str()));
        builder.push(") AND r.type IN (");
        push_bind_list(&mut builder, kinds.iter().map(|k| k.as_str()));
        builder.push(") GROUP BY r.type, u.id");

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| -> Result<TypeCreatorAggregate, AppError> {
                Ok(TypeCreatorAggregate {
                    kind: parse_resource_type(&row.try_get::<String, _>("resource_type")?)?,
                    profile: profile_from_row(row)?,
                    resources: row.try_get("resources")?,
                    downloads: row.try_get("downloads")?,
                    followers: row.try_get("followers")?,
                })
            })
            .collect()
    }
}

// Helper functions for query building and row conversion

fn push_bind_list<'a>(
    builder: &mut QueryBuilder<'a, Sqlite>,
    values: impl IntoIterator<Item = &'a str>,
) {
    let mut separated = builder.separated(", ");
    for value in values {
        separated.push_bind(value);
    }
}

fn parse_resource_type(s: &str) -> Result<ResourceType, AppError> {
    ResourceType::from_str(s)
        .ok_or_else(|| AppError::Internal(format!("Unknown resource type {:?}", s)))
}

/// Malformed metadata reads as an empty object so the collection still resolves.
fn parse_metadata(kind: &str, raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!("Ignoring malformed metadata on collection {}: {}", kind, e);
        serde_json::json!({})
    })
}

fn collection_from_row(row: &SqliteRow) -> Result<DiscoveryCollection, AppError> {
    let kind: String = row.try_get("type")?;
    let metadata: Option<String> = row.try_get("metadata")?;
    let is_active: i32 = row.try_get("is_active")?;

    Ok(DiscoveryCollection {
        id: row.try_get("id")?,
        kind: CollectionType::from_str(&kind)
            .ok_or_else(|| AppError::Internal(format!("Unknown collection type {:?}", kind)))?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        metadata: metadata
            .map(|raw| parse_metadata(&kind, &raw))
            .unwrap_or_else(|| serde_json::json!({})),
        is_active: is_active != 0,
    })
}

fn profile_from_row(row: &SqliteRow) -> Result<CreatorProfile, AppError> {
    Ok(CreatorProfile {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        display_name: row.try_get("display_name")?,
        image: row.try_get("image")?,
        bio: row.try_get("bio")?,
    })
}

fn summary_from_row(row: &SqliteRow) -> Result<ResourceSummary, AppError> {
    let status: String = row.try_get("status")?;
    let owner_user_id: Option<String> = row.try_get("owner_user_id")?;
    let owner_team_id: Option<String> = row.try_get("owner_team_id")?;
    let version_id: Option<String> = row.try_get("version_id")?;

    let owner_user = match owner_user_id {
        Some(id) => Some(OwnerUser {
            id,
            username: row.try_get("owner_username")?,
            display_name: row.try_get("owner_display_name")?,
            image: row.try_get("owner_image")?,
        }),
        None => None,
    };

    let owner_team = match owner_team_id {
        Some(id) => Some(OwnerTeam {
            id,
            name: row.try_get("owner_team_name")?,
            slug: row.try_get("owner_team_slug")?,
            logo: row.try_get("owner_team_logo")?,
        }),
        None => None,
    };

    let latest_version = match version_id {
        Some(id) => Some(LatestVersion {
            id,
            version_number: row.try_get("version_number")?,
            name: row.try_get("version_name")?,
            channel: row.try_get("version_channel")?,
            created_at: row.try_get("version_created_at")?,
            published_at: row.try_get("version_published_at")?,
        }),
        None => None,
    };

    Ok(ResourceSummary {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        slug: row.try_get("slug")?,
        tagline: row.try_get("tagline")?,
        description: row.try_get("description")?,
        icon_url: row.try_get("icon_url")?,
        banner_url: row.try_get("banner_url")?,
        kind: parse_resource_type(&row.try_get::<String, _>("type")?)?,
        status: ResourceStatus::from_str(&status)
            .ok_or_else(|| AppError::Internal(format!("Unknown resource status {:?}", status)))?,
        download_count: row.try_get("download_count")?,
        like_count: row.try_get("like_count")?,
        owner_user,
        owner_team,
        latest_version,
        tags: Vec::new(),
        categories: Vec::new(),
        counts: ResourceCounts {
            versions: row.try_get("version_total")?,
            downloads: row.try_get("download_total")?,
        },
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
