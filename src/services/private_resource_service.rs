use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::{LockerService, ServiceError, ServiceResult};
use crate::models::{NewResource, PrivateResource, ResourceFilter, ResourcePatch};
use crate::store::DocumentStore;

/// Locker-scoped resources. Every call passes the locker credential check
/// first, and every lookup is keyed by the authenticated locker id.
#[derive(Clone)]
pub struct PrivateResourceService {
    store: Arc<dyn DocumentStore>,
    lockers: LockerService,
}

impl PrivateResourceService {
    pub fn new(store: Arc<dyn DocumentStore>, lockers: LockerService) -> Self {
        Self { store, lockers }
    }

    pub async fn list(&self, locker_id: Uuid, password: &str, filter: &ResourceFilter) -> ServiceResult<Vec<PrivateResource>> {
        self.lockers.authorize(locker_id, password).await?;

        let docs = self.store.list_private_resources(locker_id).await?;
        debug!("Listed {} private resources for locker {}", docs.len(), locker_id);
        if filter.is_empty() {
            return Ok(docs);
        }
        Ok(docs.into_iter().filter(|d| filter.matches(&d.resource)).collect())
    }

    pub async fn get(&self, locker_id: Uuid, password: &str, id: Uuid) -> ServiceResult<PrivateResource> {
        self.lockers.authorize(locker_id, password).await?;
        self.store
            .get_private_resource(locker_id, id)
            .await?
            .ok_or(ServiceError::NotFound("Private resource"))
    }

    /// Any `lockerId` in `data` is discarded; ownership comes from the
    /// authenticated locker.
    pub async fn create(&self, locker_id: Uuid, password: &str, data: Value) -> ServiceResult<PrivateResource> {
        let locker = self.lockers.authorize(locker_id, password).await?;

        let resource = NewResource::from_value(data)?.into_resource(Utc::now())?;
        let doc = PrivateResource::new(resource, locker.id);
        self.store.insert_private_resource(&doc).await?;

        info!("Created private resource {} in locker {}", doc.id(), locker.id);
        Ok(doc)
    }

    pub async fn update(&self, locker_id: Uuid, password: &str, id: Uuid, patch: Value) -> ServiceResult<PrivateResource> {
        self.lockers.authorize(locker_id, password).await?;

        let patch = ResourcePatch::from_value(patch)?;
        let mut doc = self
            .store
            .get_private_resource(locker_id, id)
            .await?
            .ok_or(ServiceError::NotFound("Private resource"))?;

        patch.apply(&mut doc.resource, Utc::now())?;
        if !self.store.replace_private_resource(&doc).await? {
            return Err(ServiceError::NotFound("Private resource"));
        }

        info!("Updated private resource {} in locker {}", id, locker_id);
        Ok(doc)
    }

    pub async fn delete(&self, locker_id: Uuid, password: &str, id: Uuid) -> ServiceResult<()> {
        self.lockers.authorize(locker_id, password).await?;

        if !self.store.delete_private_resource(locker_id, id).await? {
            return Err(ServiceError::NotFound("Private resource"));
        }
        info!("Deleted private resource {} from locker {}", id, locker_id);
        Ok(())
    }
}
