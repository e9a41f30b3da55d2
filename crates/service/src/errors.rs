use models::errors::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed or out-of-range input; maps to a client error status.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A referenced entity is absent; `ids` names every missing identifier.
    #[error("{message}")]
    NotFound { message: String, ids: Vec<String> },
    /// The store could not be reached at request time. Never retried here;
    /// surfaced to the caller as a server error.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl ServiceError {
    pub fn missing_products(ids: Vec<String>) -> Self {
        Self::NotFound {
            message: format!("products not found: {}", ids.join(", ")),
            ids,
        }
    }
}
