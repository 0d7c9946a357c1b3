use thiserror::Error;

use foyer_store::StoreError;

/// Failure classification for the contract layer.
///
/// The core stays transport-independent; [`status`](ApiError::status)
/// carries the numeric signal a route layer maps onto its own error surface.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP-equivalent status code.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::Forbidden => 403,
            ApiError::NotFound => 404,
            ApiError::Internal(_) => 500,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Validation(v) => ApiError::BadRequest(v.to_string()),
            StoreError::NotFound => ApiError::NotFound,
            StoreError::Forbidden(_) => ApiError::Forbidden,
            other => ApiError::Internal(other.to_string()),
        }
    }
}
