use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("encryption error: {0}")]
    Crypto(String),
    #[error("render error: {0}")]
    Render(String),
    #[error("model error: {0}")]
    Model(models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self {
        Self::NotFound(format!("{} not found", entity))
    }
}

impl From<models::errors::ModelError> for ServiceError {
    fn from(e: models::errors::ModelError) -> Self {
        // Duplicates keep their identity so the HTTP layer can map to 409
        match e {
            models::errors::ModelError::Duplicate(msg) => ServiceError::Conflict(msg),
            other => ServiceError::Model(other),
        }
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self {
        ServiceError::Db(e.to_string())
    }
}

impl From<common::crypto::CryptoError> for ServiceError {
    fn from(e: common::crypto::CryptoError) -> Self {
        ServiceError::Crypto(e.to_string())
    }
}
