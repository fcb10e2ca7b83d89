//! Boundary-side error taxonomy.
//!
//! Handlers return [`ApiError`]; the conversions here classify service
//! failures once, at the edge, so business code never matches on HTTP
//! concerns.

use serde_json::Value;
use storekit_db::{ServiceError, StoreError};
use thiserror::Error;

/// What a request can fail with, as the translation table sees it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Rejected input. Never logged server-side; the caller gets the
    /// message and the structured payload untouched.
    #[error("{message}")]
    Validation {
        message: String,
        errors: Option<Value>,
    },

    /// Missing or invisible resource. `message` is the internal detail
    /// for the server log; the wire body always says `Not Found`.
    #[error("Not Found")]
    NotFound { message: String },

    /// Everything unclassified. The source chain and backtrace feed the
    /// diagnostics body when that is enabled.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            errors: None,
        }
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }
}

/// Classify service failures so `?` works in handlers.
impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(failure) => Self::Validation {
                message: failure.message,
                errors: failure.errors,
            },
            ServiceError::NotFound { entity, id } => Self::NotFound {
                message: format!("{entity} with id {id} was not found"),
            },
            ServiceError::Store(source) => Self::Internal(anyhow::Error::new(source)),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Internal(anyhow::Error::new(err))
    }
}
