use std::sync::Arc;

use crate::auth::AdminAuthority;
use crate::services::{LockerService, PrivateResourceService, ResourceService};
use crate::store::DocumentStore;

/// Shared handler state: one store, one admin authority, and the services
/// built over them.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub admin: AdminAuthority,
    pub resources: ResourceService,
    pub lockers: LockerService,
    pub private_resources: PrivateResourceService,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, admin: AdminAuthority) -> Self {
        let lockers = LockerService::new(store.clone());
        Self {
            resources: ResourceService::new(store.clone(), admin.clone()),
            private_resources: PrivateResourceService::new(store.clone(), lockers.clone()),
            lockers,
            admin,
            store,
        }
    }
}
