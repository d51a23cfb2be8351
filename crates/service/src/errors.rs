use thiserror::Error;

use crate::notification::DispatchError;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// A structurally required value was missing; a caller bug rather than bad user input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::InvalidArgument(_) => 2001,
            ServiceError::Validation(_) => 2002,
            ServiceError::NotFound(_) => 2003,
            ServiceError::Forbidden(_) => 2004,
            ServiceError::Dispatch(_) => 2101,
            ServiceError::Db(_) => 2200,
            ServiceError::Model(_) => 2201,
        }
    }
}
