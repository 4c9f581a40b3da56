pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Locker, PrivateResource, Resource};

/// Errors from a document store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error("Corrupt row: {0}")]
    CorruptRow(String),

    #[error("Locker {0} does not exist")]
    LockerMissing(Uuid),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The three collections behind the API. Lists come back newest first.
///
/// Private resource lookups always take the owning locker id; a document
/// that exists under another locker is reported as absent.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn ping(&self) -> StoreResult<()>;

    // resources
    async fn list_resources(&self) -> StoreResult<Vec<Resource>>;
    async fn get_resource(&self, id: Uuid) -> StoreResult<Option<Resource>>;
    async fn insert_resource(&self, resource: &Resource) -> StoreResult<()>;
    /// Returns false when no document with that id exists.
    async fn replace_resource(&self, resource: &Resource) -> StoreResult<bool>;
    async fn delete_resource(&self, id: Uuid) -> StoreResult<bool>;

    // lockers
    async fn list_lockers(&self) -> StoreResult<Vec<Locker>>;
    async fn get_locker(&self, id: Uuid) -> StoreResult<Option<Locker>>;
    async fn insert_locker(&self, locker: &Locker) -> StoreResult<()>;
    async fn replace_locker(&self, locker: &Locker) -> StoreResult<bool>;
    /// Deletes the locker and every private resource it owns as one atomic
    /// step. Returns the number of cascaded resources, or `None` if the
    /// locker did not exist.
    async fn delete_locker_cascade(&self, id: Uuid) -> StoreResult<Option<u64>>;

    // private resources
    async fn list_private_resources(&self, locker_id: Uuid) -> StoreResult<Vec<PrivateResource>>;
    async fn get_private_resource(&self, locker_id: Uuid, id: Uuid) -> StoreResult<Option<PrivateResource>>;
    async fn insert_private_resource(&self, resource: &PrivateResource) -> StoreResult<()>;
    /// Matches on both id and locker id.
    async fn replace_private_resource(&self, resource: &PrivateResource) -> StoreResult<bool>;
    async fn delete_private_resource(&self, locker_id: Uuid, id: Uuid) -> StoreResult<bool>;
}
