pub mod locker;
pub mod resource;

pub use locker::{Locker, LockerPatch, LockerSummary, NewLocker, PrivateResource};
pub use resource::{NewResource, Resource, ResourceFilter, ResourcePatch, ResourceType};

use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while parsing or validating incoming documents
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("{message}")]
    Validation {
        message: String,
        field_errors: HashMap<String, String>,
    },

    #[error("Malformed document: {0}")]
    Malformed(String),
}

impl ModelError {
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut field_errors = HashMap::new();
        field_errors.insert(field.to_string(), message.clone());
        ModelError::Validation { message, field_errors }
    }
}
