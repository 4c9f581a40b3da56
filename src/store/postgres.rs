use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use super::{DocumentStore, StoreError, StoreResult};
use crate::config::DatabaseConfig;
use crate::models::{Locker, PrivateResource, Resource, ResourceType};

const SCHEMA: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS resources (
        id UUID PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        resource_type TEXT NOT NULL,
        url TEXT,
        content TEXT,
        tags TEXT[] NOT NULL DEFAULT '{}',
        category TEXT NOT NULL,
        categories TEXT[] NOT NULL DEFAULT '{}',
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS lockers (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS private_resources (
        id UUID PRIMARY KEY,
        locker_id UUID NOT NULL REFERENCES lockers(id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        resource_type TEXT NOT NULL,
        url TEXT,
        content TEXT,
        tags TEXT[] NOT NULL DEFAULT '{}',
        category TEXT NOT NULL,
        categories TEXT[] NOT NULL DEFAULT '{}',
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ
    )
    "#,
    "CREATE INDEX IF NOT EXISTS private_resources_locker_idx ON private_resources (locker_id, created_at DESC)",
];

const RESOURCE_COLUMNS: &str =
    "id, title, description, resource_type, url, content, tags, category, categories, created_at, updated_at";

#[derive(Debug, FromRow)]
struct ResourceRow {
    id: Uuid,
    title: String,
    description: String,
    resource_type: String,
    url: Option<String>,
    content: Option<String>,
    tags: Vec<String>,
    category: String,
    categories: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<ResourceRow> for Resource {
    type Error = StoreError;

    fn try_from(row: ResourceRow) -> Result<Self, Self::Error> {
        let resource_type = row
            .resource_type
            .parse::<ResourceType>()
            .map_err(|_| StoreError::CorruptRow(format!("resource {} has type '{}'", row.id, row.resource_type)))?;

        Ok(Resource {
            id: row.id,
            title: row.title,
            description: row.description,
            resource_type,
            url: row.url,
            content: row.content,
            tags: row.tags,
            category: row.category,
            categories: row.categories,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct PrivateResourceRow {
    #[sqlx(flatten)]
    resource: ResourceRow,
    locker_id: Uuid,
}

impl TryFrom<PrivateResourceRow> for PrivateResource {
    type Error = StoreError;

    fn try_from(row: PrivateResourceRow) -> Result<Self, Self::Error> {
        Ok(PrivateResource::new(row.resource.try_into()?, row.locker_id))
    }
}

#[derive(Debug, FromRow)]
struct LockerRow {
    id: Uuid,
    name: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<LockerRow> for Locker {
    fn from(row: LockerRow) -> Self {
        Locker {
            id: row.id,
            name: row.name,
            password_hash: row.password_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// The private_resources FK means the owning locker is gone.
fn owner_violation(err: sqlx::Error, locker_id: Uuid) -> StoreError {
    let missing_owner = matches!(&err, sqlx::Error::Database(db) if db.is_foreign_key_violation());
    if missing_owner {
        StoreError::LockerMissing(locker_id)
    } else {
        err.into()
    }
}

/// Postgres-backed store
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect using the database section of the config and ensure the
    /// tables exist.
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let raw = config
            .url
            .as_deref()
            .ok_or(StoreError::ConfigMissing("DATABASE_URL"))?;
        let url = url::Url::parse(raw).map_err(|_| StoreError::InvalidDatabaseUrl)?;
        if !matches!(url.scheme(), "postgres" | "postgresql") {
            return Err(StoreError::InvalidDatabaseUrl);
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url.as_str())
            .await
            .map_err(|e| StoreError::ConnectionError(e.to_string()))?;

        info!(
            "Created database pool for {} (max {} connections)",
            url.path().trim_start_matches('/'),
            config.max_connections
        );

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::MigrationError(e.to_string()))?;
        }
        debug!("Schema ensured ({} statements)", SCHEMA.len());
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_resources(&self) -> StoreResult<Vec<Resource>> {
        let sql = format!("SELECT {} FROM resources ORDER BY created_at DESC", RESOURCE_COLUMNS);
        let rows = sqlx::query_as::<_, ResourceRow>(&sql).fetch_all(&self.pool).await?;
        rows.into_iter().map(Resource::try_from).collect()
    }

    async fn get_resource(&self, id: Uuid) -> StoreResult<Option<Resource>> {
        let sql = format!("SELECT {} FROM resources WHERE id = $1", RESOURCE_COLUMNS);
        let row = sqlx::query_as::<_, ResourceRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Resource::try_from).transpose()
    }

    async fn insert_resource(&self, r: &Resource) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO resources (id, title, description, resource_type, url, content, tags, category, categories, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(r.id)
        .bind(&r.title)
        .bind(&r.description)
        .bind(r.resource_type.as_str())
        .bind(&r.url)
        .bind(&r.content)
        .bind(&r.tags)
        .bind(&r.category)
        .bind(&r.categories)
        .bind(r.created_at)
        .bind(r.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn replace_resource(&self, r: &Resource) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE resources
             SET title = $2, description = $3, resource_type = $4, url = $5, content = $6,
                 tags = $7, category = $8, categories = $9, updated_at = $10
             WHERE id = $1",
        )
        .bind(r.id)
        .bind(&r.title)
        .bind(&r.description)
        .bind(r.resource_type.as_str())
        .bind(&r.url)
        .bind(&r.content)
        .bind(&r.tags)
        .bind(&r.category)
        .bind(&r.categories)
        .bind(r.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_resource(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM resources WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_lockers(&self) -> StoreResult<Vec<Locker>> {
        let rows = sqlx::query_as::<_, LockerRow>(
            "SELECT id, name, password_hash, created_at, updated_at FROM lockers ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Locker::from).collect())
    }

    async fn get_locker(&self, id: Uuid) -> StoreResult<Option<Locker>> {
        let row = sqlx::query_as::<_, LockerRow>(
            "SELECT id, name, password_hash, created_at, updated_at FROM lockers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Locker::from))
    }

    async fn insert_locker(&self, locker: &Locker) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO lockers (id, name, password_hash, created_at, updated_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(locker.id)
        .bind(&locker.name)
        .bind(&locker.password_hash)
        .bind(locker.created_at)
        .bind(locker.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn replace_locker(&self, locker: &Locker) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE lockers SET name = $2, password_hash = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(locker.id)
        .bind(&locker.name)
        .bind(&locker.password_hash)
        .bind(locker.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_locker_cascade(&self, id: Uuid) -> StoreResult<Option<u64>> {
        let mut tx = self.pool.begin().await?;

        let cascaded = sqlx::query("DELETE FROM private_resources WHERE locker_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM lockers WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some(cascaded))
    }

    async fn list_private_resources(&self, locker_id: Uuid) -> StoreResult<Vec<PrivateResource>> {
        let sql = format!(
            "SELECT {}, locker_id FROM private_resources WHERE locker_id = $1 ORDER BY created_at DESC",
            RESOURCE_COLUMNS
        );
        let rows = sqlx::query_as::<_, PrivateResourceRow>(&sql)
            .bind(locker_id)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(PrivateResource::try_from).collect()
    }

    async fn get_private_resource(&self, locker_id: Uuid, id: Uuid) -> StoreResult<Option<PrivateResource>> {
        let sql = format!(
            "SELECT {}, locker_id FROM private_resources WHERE id = $1 AND locker_id = $2",
            RESOURCE_COLUMNS
        );
        let row = sqlx::query_as::<_, PrivateResourceRow>(&sql)
            .bind(id)
            .bind(locker_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(PrivateResource::try_from).transpose()
    }

    async fn insert_private_resource(&self, doc: &PrivateResource) -> StoreResult<()> {
        let r = &doc.resource;
        sqlx::query(
            "INSERT INTO private_resources (id, locker_id, title, description, resource_type, url, content, tags, category, categories, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(r.id)
        .bind(doc.locker_id)
        .bind(&r.title)
        .bind(&r.description)
        .bind(r.resource_type.as_str())
        .bind(&r.url)
        .bind(&r.content)
        .bind(&r.tags)
        .bind(&r.category)
        .bind(&r.categories)
        .bind(r.created_at)
        .bind(r.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| owner_violation(e, doc.locker_id))?;
        Ok(())
    }

    async fn replace_private_resource(&self, doc: &PrivateResource) -> StoreResult<bool> {
        let r = &doc.resource;
        // locker_id is only ever a match key here, never a SET target
        let result = sqlx::query(
            "UPDATE private_resources
             SET title = $3, description = $4, resource_type = $5, url = $6, content = $7,
                 tags = $8, category = $9, categories = $10, updated_at = $11
             WHERE id = $1 AND locker_id = $2",
        )
        .bind(r.id)
        .bind(doc.locker_id)
        .bind(&r.title)
        .bind(&r.description)
        .bind(r.resource_type.as_str())
        .bind(&r.url)
        .bind(&r.content)
        .bind(&r.tags)
        .bind(&r.category)
        .bind(&r.categories)
        .bind(r.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_private_resource(&self, locker_id: Uuid, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM private_resources WHERE id = $1 AND locker_id = $2")
            .bind(id)
            .bind(locker_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
