//! Database module for SQLite persistence.
//!
//! Discovery only reads; rows are written by the curation and marketplace
//! workflows that share this database.

#[cfg(test)]
pub mod memory;
mod repository;

pub use repository::*;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

use crate::errors::AppError;
use crate::models::{
    CollectionItem, CollectionType, CreatorRecord, DiscoveryCollection, ResourceQuery,
    ResourceStatus, ResourceSummary, ResourceType, TypeCreatorAggregate,
};

/// Read-side queries the discovery resolvers depend on.
#[async_trait]
pub trait DiscoveryStore: Send + Sync {
    /// The active collection of a type, if one is configured.
    async fn find_active_collection(
        &self,
        kind: CollectionType,
    ) -> Result<Option<DiscoveryCollection>, AppError>;

    /// Items without an end date, ascending by `order`.
    async fn live_collection_items(
        &self,
        collection_id: &str,
    ) -> Result<Vec<CollectionItem>, AppError>;

    /// Summaries for the given ids, in no particular order. Unknown ids are skipped.
    async fn resources_by_ids(&self, ids: &[String]) -> Result<Vec<ResourceSummary>, AppError>;

    async fn find_resources(&self, query: &ResourceQuery)
        -> Result<Vec<ResourceSummary>, AppError>;

    /// Active users owning at least one approved resource, with those resources.
    async fn eligible_creators(&self) -> Result<Vec<CreatorRecord>, AppError>;

    /// One row per (type, active owner) over resources in `statuses`.
    async fn creator_totals_by_type(
        &self,
        kinds: &[ResourceType],
        statuses: &[ResourceStatus],
    ) -> Result<Vec<TypeCreatorAggregate>, AppError>;
}

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            display_name TEXT,
            image TEXT,
            bio TEXT,
            status TEXT NOT NULL DEFAULT 'ACTIVE',
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS teams (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            logo TEXT
        );

        CREATE TABLE IF NOT EXISTS follows (
            follower_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            following_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (follower_id, following_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS resources (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            tagline TEXT,
            description TEXT,
            icon_url TEXT,
            banner_url TEXT,
            type TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'DRAFT',
            download_count INTEGER NOT NULL DEFAULT 0,
            like_count INTEGER NOT NULL DEFAULT 0,
            owner_user_id TEXT REFERENCES users(id),
            owner_team_id TEXT REFERENCES teams(id),
            latest_version_id TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            CHECK ((owner_user_id IS NULL) <> (owner_team_id IS NULL))
        );

        CREATE TABLE IF NOT EXISTS resource_versions (
            id TEXT PRIMARY KEY,
            resource_id TEXT NOT NULL REFERENCES resources(id) ON DELETE CASCADE,
            version_number TEXT NOT NULL,
            name TEXT,
            channel TEXT NOT NULL DEFAULT 'RELEASE',
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            published_at TEXT
        );

        CREATE TABLE IF NOT EXISTS resource_downloads (
            id TEXT PRIMARY KEY,
            resource_id TEXT NOT NULL REFERENCES resources(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tags (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS resource_tags (
            resource_id TEXT NOT NULL REFERENCES resources(id) ON DELETE CASCADE,
            tag_id TEXT NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
            PRIMARY KEY (resource_id, tag_id)
        );

        CREATE TABLE IF NOT EXISTS categories (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS resource_categories (
            resource_id TEXT NOT NULL REFERENCES resources(id) ON DELETE CASCADE,
            category_id TEXT NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
            PRIMARY KEY (resource_id, category_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS discovery_collections (
            id TEXT PRIMARY KEY,
            type TEXT NOT NULL UNIQUE,
            title TEXT NOT NULL,
            description TEXT,
            metadata TEXT,
            is_active INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS discovery_collection_items (
            id TEXT PRIMARY KEY,
            collection_id TEXT NOT NULL REFERENCES discovery_collections(id) ON DELETE CASCADE,
            resource_id TEXT NOT NULL REFERENCES resources(id) ON DELETE CASCADE,
            sort_order INTEGER NOT NULL DEFAULT 0,
            end_date TEXT
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes for common queries
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_resources_status_downloads ON resources(status, download_count);
        CREATE INDEX IF NOT EXISTS idx_resources_owner_user ON resources(owner_user_id);
        CREATE INDEX IF NOT EXISTS idx_users_status ON users(status);
        CREATE INDEX IF NOT EXISTS idx_follows_following ON follows(following_id);
        CREATE INDEX IF NOT EXISTS idx_collection_items_collection ON discovery_collection_items(collection_id, sort_order);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
