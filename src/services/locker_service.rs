use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::{ServiceError, ServiceResult};
use crate::auth::password;
use crate::models::{Locker, LockerPatch, LockerSummary, NewLocker};
use crate::store::DocumentStore;

/// Password-protected lockers. Responses never carry the password hash.
#[derive(Clone)]
pub struct LockerService {
    store: Arc<dyn DocumentStore>,
}

async fn hash_blocking(plain: String) -> ServiceResult<String> {
    tokio::task::spawn_blocking(move || password::hash_password(&plain))
        .await
        .map_err(|e| ServiceError::Crypto(e.to_string()))?
        .map_err(|e| ServiceError::Crypto(e.to_string()))
}

async fn verify_blocking(candidate: String, hash: String) -> ServiceResult<bool> {
    tokio::task::spawn_blocking(move || password::verify_password(&candidate, &hash))
        .await
        .map_err(|e| ServiceError::Crypto(e.to_string()))?
        .map_err(|e| ServiceError::Crypto(e.to_string()))
}

impl LockerService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Locker credential check: the locker must exist (else NotFound) and
    /// the candidate must verify against its hash (else LockerDenied).
    pub async fn authorize(&self, id: Uuid, candidate: &str) -> ServiceResult<Locker> {
        let locker = self
            .store
            .get_locker(id)
            .await?
            .ok_or(ServiceError::NotFound("Locker"))?;

        if !verify_blocking(candidate.to_string(), locker.password_hash.clone()).await? {
            warn!("Locker password mismatch for {}", id);
            return Err(ServiceError::LockerDenied);
        }
        Ok(locker)
    }

    pub async fn list(&self) -> ServiceResult<Vec<LockerSummary>> {
        let lockers = self.store.list_lockers().await?;
        Ok(lockers.iter().map(LockerSummary::from).collect())
    }

    pub async fn create(&self, input: NewLocker) -> ServiceResult<LockerSummary> {
        let name = input.validate()?;
        let locker = Locker {
            id: Uuid::new_v4(),
            name,
            password_hash: hash_blocking(input.password).await?,
            created_at: Utc::now(),
            updated_at: None,
        };
        self.store.insert_locker(&locker).await?;

        info!("Created locker {}", locker.id);
        Ok(LockerSummary::from(&locker))
    }

    pub async fn verify_and_fetch(&self, id: Uuid, candidate: &str) -> ServiceResult<LockerSummary> {
        let locker = self.authorize(id, candidate).await?;
        Ok(LockerSummary::from(&locker))
    }

    pub async fn update(&self, id: Uuid, current_password: &str, patch: LockerPatch) -> ServiceResult<LockerSummary> {
        let mut locker = self.authorize(id, current_password).await?;
        patch.validate()?;

        if let Some(name) = patch.name {
            locker.name = name.trim().to_string();
        }
        if let Some(new_password) = patch.new_password {
            locker.password_hash = hash_blocking(new_password).await?;
            info!("Rotated password for locker {}", id);
        }
        locker.updated_at = Some(Utc::now());

        if !self.store.replace_locker(&locker).await? {
            return Err(ServiceError::NotFound("Locker"));
        }
        Ok(LockerSummary::from(&locker))
    }

    /// Delete the locker and cascade to its private resources. Returns the
    /// number of resources removed with it.
    pub async fn delete(&self, id: Uuid, candidate: &str) -> ServiceResult<u64> {
        self.authorize(id, candidate).await?;

        let removed = self
            .store
            .delete_locker_cascade(id)
            .await?
            .ok_or(ServiceError::NotFound("Locker"))?;

        info!("Deleted locker {} and {} private resources", id, removed);
        Ok(removed)
    }
}
