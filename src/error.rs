use actix_web::{http::StatusCode, HttpResponse};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::services::directory::ProviderError;
use crate::services::store::StoreError;

/// Engine-level error taxonomy, mapped onto HTTP status codes at the edge
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed input (self-like, empty or malformed ids); no side effects
    #[error("validation failed: {0}")]
    Validation(String),

    /// Referenced actor or record does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Operation disallowed by the pair's current state
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Persistence retries exhausted; nothing was committed
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// Non-retryable store failure
    #[error("store error: {0}")]
    Store(StoreError),
}

impl EngineError {
    /// Apply the propagation policy to a store failure that survived the
    /// bounded retry at the registry boundary
    pub fn from_store(e: StoreError) -> Self {
        match e {
            StoreError::Transient(_) => {
                EngineError::Unavailable("engagement store unavailable".to_string())
            }
            other => EngineError::Store(other),
        }
    }

    pub fn from_provider(e: ProviderError) -> Self {
        match e {
            ProviderError::NotFound(id) => EngineError::NotFound(format!("actor {}", id)),
            other => EngineError::Unavailable(format!("profile directory error: {}", other)),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            EngineError::Validation(_) => "validation_failed",
            EngineError::NotFound(_) => "not_found",
            EngineError::Forbidden(_) => "forbidden",
            EngineError::Unavailable(_) => "unavailable",
            EngineError::Store(_) => "store_error",
        }
    }
}

impl actix_web::error::ResponseError for EngineError {
    fn status_code(&self) -> StatusCode {
        match self {
            EngineError::Validation(_) => StatusCode::BAD_REQUEST,
            EngineError::NotFound(_) => StatusCode::NOT_FOUND,
            EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
            EngineError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            EngineError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ErrorResponse {
            error: self.kind().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}
