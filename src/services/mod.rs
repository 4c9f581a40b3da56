pub mod locker_service;
pub mod private_resource_service;
pub mod resource_service;

pub use locker_service::LockerService;
pub use private_resource_service::PrivateResourceService;
pub use resource_service::ResourceService;

use thiserror::Error;

use crate::auth::AuthError;
use crate::models::ModelError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Admin(#[from] AuthError),

    #[error("Invalid locker password")]
    LockerDenied,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    Store(StoreError),

    #[error("Password hashing failed: {0}")]
    Crypto(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::LockerMissing(_) => ServiceError::NotFound("Locker"),
            other => ServiceError::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn missing_owner_reads_as_missing_locker() {
        let err: ServiceError = StoreError::LockerMissing(Uuid::new_v4()).into();
        assert!(matches!(err, ServiceError::NotFound("Locker")));

        let err: ServiceError = StoreError::CorruptRow("bad".into()).into();
        assert!(matches!(err, ServiceError::Store(StoreError::CorruptRow(_))));
    }
}
