use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DocumentStore, StoreError, StoreResult};
use crate::models::{Locker, PrivateResource, Resource};

#[derive(Default)]
struct Collections {
    resources: Vec<Resource>,
    lockers: Vec<Locker>,
    private_resources: Vec<PrivateResource>,
}

/// In-process store. Everything lives behind one lock so the locker
/// cascade is a single critical section.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T: Clone>(items: impl Iterator<Item = T>, key: impl Fn(&T) -> chrono::DateTime<chrono::Utc>) -> Vec<T> {
    let mut out: Vec<T> = items.collect();
    out.sort_by(|a, b| key(b).cmp(&key(a)));
    out
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn list_resources(&self) -> StoreResult<Vec<Resource>> {
        let inner = self.inner.read().await;
        Ok(newest_first(inner.resources.iter().cloned(), |r| r.created_at))
    }

    async fn get_resource(&self, id: Uuid) -> StoreResult<Option<Resource>> {
        let inner = self.inner.read().await;
        Ok(inner.resources.iter().find(|r| r.id == id).cloned())
    }

    async fn insert_resource(&self, resource: &Resource) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        inner.resources.push(resource.clone());
        Ok(())
    }

    async fn replace_resource(&self, resource: &Resource) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        match inner.resources.iter_mut().find(|r| r.id == resource.id) {
            Some(slot) => {
                *slot = resource.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_resource(&self, id: Uuid) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.resources.len();
        inner.resources.retain(|r| r.id != id);
        Ok(inner.resources.len() != before)
    }

    async fn list_lockers(&self) -> StoreResult<Vec<Locker>> {
        let inner = self.inner.read().await;
        Ok(newest_first(inner.lockers.iter().cloned(), |l| l.created_at))
    }

    async fn get_locker(&self, id: Uuid) -> StoreResult<Option<Locker>> {
        let inner = self.inner.read().await;
        Ok(inner.lockers.iter().find(|l| l.id == id).cloned())
    }

    async fn insert_locker(&self, locker: &Locker) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        inner.lockers.push(locker.clone());
        Ok(())
    }

    async fn replace_locker(&self, locker: &Locker) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        match inner.lockers.iter_mut().find(|l| l.id == locker.id) {
            Some(slot) => {
                *slot = locker.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_locker_cascade(&self, id: Uuid) -> StoreResult<Option<u64>> {
        let mut inner = self.inner.write().await;
        let before = inner.lockers.len();
        inner.lockers.retain(|l| l.id != id);
        if inner.lockers.len() == before {
            return Ok(None);
        }

        let owned_before = inner.private_resources.len();
        inner.private_resources.retain(|r| r.locker_id != id);
        Ok(Some((owned_before - inner.private_resources.len()) as u64))
    }

    async fn list_private_resources(&self, locker_id: Uuid) -> StoreResult<Vec<PrivateResource>> {
        let inner = self.inner.read().await;
        let owned = inner
            .private_resources
            .iter()
            .filter(|r| r.locker_id == locker_id)
            .cloned();
        Ok(newest_first(owned, |r| r.resource.created_at))
    }

    async fn get_private_resource(&self, locker_id: Uuid, id: Uuid) -> StoreResult<Option<PrivateResource>> {
        let inner = self.inner.read().await;
        Ok(inner
            .private_resources
            .iter()
            .find(|r| r.locker_id == locker_id && r.id() == id)
            .cloned())
    }

    async fn insert_private_resource(&self, resource: &PrivateResource) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        // Same lock as the cascade, so a locker deleted mid-request cannot gain an orphan
        if !inner.lockers.iter().any(|l| l.id == resource.locker_id) {
            return Err(StoreError::LockerMissing(resource.locker_id));
        }
        inner.private_resources.push(resource.clone());
        Ok(())
    }

    async fn replace_private_resource(&self, resource: &PrivateResource) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        let slot = inner
            .private_resources
            .iter_mut()
            .find(|r| r.locker_id == resource.locker_id && r.id() == resource.id());
        match slot {
            Some(slot) => {
                *slot = resource.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_private_resource(&self, locker_id: Uuid, id: Uuid) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.private_resources.len();
        inner
            .private_resources
            .retain(|r| !(r.locker_id == locker_id && r.id() == id));
        Ok(inner.private_resources.len() != before)
    }
}
