use models::errors::{FieldErrors, ModelError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(FieldErrors),
    #[error("{0} not found")]
    NotFound(&'static str),
}

impl ServiceError {
    pub fn not_found(entity: &'static str) -> Self { Self::NotFound(entity) }
}

impl From<ModelError> for ServiceError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Validation(errors) => Self::Validation(errors),
        }
    }
}
