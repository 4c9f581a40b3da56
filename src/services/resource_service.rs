use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{ServiceError, ServiceResult};
use crate::auth::{AdminAuthority, AdminCredential};
use crate::models::{NewResource, Resource, ResourceFilter, ResourcePatch};
use crate::store::DocumentStore;

/// Public resources: readable by anyone, writable with the admin credential
#[derive(Clone)]
pub struct ResourceService {
    store: Arc<dyn DocumentStore>,
    admin: AdminAuthority,
}

impl ResourceService {
    pub fn new(store: Arc<dyn DocumentStore>, admin: AdminAuthority) -> Self {
        Self { store, admin }
    }

    fn require_admin(&self, credential: Option<&AdminCredential>, action: &str) -> ServiceResult<()> {
        self.admin.verify(credential).map_err(|e| {
            warn!("Rejected admin {} on resources: {}", action, e);
            ServiceError::from(e)
        })
    }

    pub async fn list(&self, filter: &ResourceFilter) -> ServiceResult<Vec<Resource>> {
        let resources = self.store.list_resources().await?;
        if filter.is_empty() {
            return Ok(resources);
        }
        Ok(resources.into_iter().filter(|r| filter.matches(r)).collect())
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<Resource> {
        debug!("Fetching resource {}", id);
        self.store
            .get_resource(id)
            .await?
            .ok_or(ServiceError::NotFound("Resource"))
    }

    pub async fn create(&self, credential: Option<&AdminCredential>, data: Value) -> ServiceResult<Resource> {
        self.require_admin(credential, "create")?;

        let resource = NewResource::from_value(data)?.into_resource(Utc::now())?;
        self.store.insert_resource(&resource).await?;

        info!("Created resource {} ({})", resource.id, resource.resource_type);
        Ok(resource)
    }

    pub async fn update(&self, credential: Option<&AdminCredential>, id: Uuid, patch: Value) -> ServiceResult<Resource> {
        self.require_admin(credential, "update")?;

        let patch = ResourcePatch::from_value(patch)?;
        let mut resource = self
            .store
            .get_resource(id)
            .await?
            .ok_or(ServiceError::NotFound("Resource"))?;

        patch.apply(&mut resource, Utc::now())?;
        if !self.store.replace_resource(&resource).await? {
            return Err(ServiceError::NotFound("Resource"));
        }

        info!("Updated resource {}", id);
        Ok(resource)
    }

    pub async fn delete(&self, credential: Option<&AdminCredential>, id: Uuid) -> ServiceResult<()> {
        self.require_admin(credential, "delete")?;

        if !self.store.delete_resource(id).await? {
            return Err(ServiceError::NotFound("Resource"));
        }
        info!("Deleted resource {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthError;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn service() -> ResourceService {
        let admin = AdminAuthority::new(Some("admin-pw".into()), None, 1);
        ResourceService::new(Arc::new(MemoryStore::new()), admin)
    }

    fn admin() -> AdminCredential {
        AdminCredential::Password("admin-pw".into())
    }

    #[tokio::test]
    async fn create_then_get_returns_input_plus_id() {
        let svc = service();
        let created = svc
            .create(Some(&admin()), json!({ "title": "Lifetimes", "category": "rust", "type": "video", "tags": ["intro"] }))
            .await
            .unwrap();

        let fetched = svc.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.title, "Lifetimes");
        assert_eq!(fetched.tags, vec!["intro".to_string()]);
    }

    #[tokio::test]
    async fn mutations_without_admin_leave_store_unchanged() {
        let svc = service();
        let created = svc.create(Some(&admin()), json!({ "title": "T", "category": "C" })).await.unwrap();
        let wrong = AdminCredential::Password("guess".into());

        assert!(matches!(
            svc.create(None, json!({ "title": "X", "category": "C" })).await,
            Err(ServiceError::Admin(AuthError::MissingCredential))
        ));
        assert!(matches!(
            svc.update(Some(&wrong), created.id, json!({ "title": "X" })).await,
            Err(ServiceError::Admin(AuthError::InvalidCredential))
        ));
        assert!(svc.delete(Some(&wrong), created.id).await.is_err());

        let all = svc.list(&ResourceFilter::default()).await.unwrap();
        assert_eq!(all, vec![created]);
    }

    #[tokio::test]
    async fn auth_is_checked_before_validation() {
        let svc = service();
        let result = svc.create(None, json!({})).await;
        assert!(matches!(result, Err(ServiceError::Admin(_))));
    }

    #[tokio::test]
    async fn update_sets_updated_at_and_keeps_id() {
        let svc = service();
        let created = svc.create(Some(&admin()), json!({ "title": "T", "category": "C" })).await.unwrap();
        let updated = svc
            .update(Some(&admin()), created.id, json!({ "id": Uuid::new_v4(), "title": "T2" }))
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "T2");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at.is_some());
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let svc = service();
        let id = Uuid::new_v4();
        assert!(matches!(svc.get(id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(
            svc.update(Some(&admin()), id, json!({ "title": "T" })).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(svc.delete(Some(&admin()), id).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn list_applies_filter() {
        let svc = service();
        svc.create(Some(&admin()), json!({ "title": "git rebase", "category": "git", "type": "command" }))
            .await
            .unwrap();
        svc.create(Some(&admin()), json!({ "title": "Traits", "category": "rust" })).await.unwrap();

        let commands = svc
            .list(&ResourceFilter { resource_type: Some("command".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].title, "git rebase");
    }
}
