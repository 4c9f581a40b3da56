use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::resource::Resource;
use super::ModelError;

/// Stored locker. `password_hash` is an Argon2id PHC string and is never
/// serialized; responses use `LockerSummary`.
#[derive(Debug, Clone, PartialEq)]
pub struct Locker {
    pub id: Uuid,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockerSummary {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&Locker> for LockerSummary {
    fn from(locker: &Locker) -> Self {
        Self {
            id: locker.id,
            name: locker.name.clone(),
            created_at: locker.created_at,
            updated_at: locker.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewLocker {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
}

impl NewLocker {
    /// Returns the trimmed name once both fields are present.
    pub fn validate(&self) -> Result<String, ModelError> {
        let mut field_errors = HashMap::new();
        let name = self.name.trim();
        if name.is_empty() {
            field_errors.insert("name".to_string(), "This field is required".to_string());
        }
        if self.password.is_empty() {
            field_errors.insert("password".to_string(), "This field is required".to_string());
        }
        if !field_errors.is_empty() {
            return Err(ModelError::Validation {
                message: "Name and password are required".to_string(),
                field_errors,
            });
        }
        Ok(name.to_string())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockerPatch {
    pub name: Option<String>,
    pub new_password: Option<String>,
}

impl LockerPatch {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.name.is_none() && self.new_password.is_none() {
            return Err(ModelError::Validation {
                message: "Nothing to update: provide name or newPassword".to_string(),
                field_errors: HashMap::new(),
            });
        }
        if matches!(self.name.as_deref(), Some(n) if n.trim().is_empty()) {
            return Err(ModelError::invalid_field("name", "Name cannot be empty"));
        }
        if matches!(self.new_password.as_deref(), Some("")) {
            return Err(ModelError::invalid_field("newPassword", "Password cannot be empty"));
        }
        Ok(())
    }
}

/// A resource owned by exactly one locker. `locker_id` is fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateResource {
    #[serde(flatten)]
    pub resource: Resource,
    pub locker_id: Uuid,
}

impl PrivateResource {
    pub fn new(resource: Resource, locker_id: Uuid) -> Self {
        Self { resource, locker_id }
    }

    pub fn id(&self) -> Uuid {
        self.resource.id
    }
}
