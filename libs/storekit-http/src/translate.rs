//! Error-to-HTTP translation.
//!
//! One table, applied at the edge:
//!
//! | error      | status | body                                    | server log |
//! |------------|--------|-----------------------------------------|------------|
//! | Validation | 400    | message + `errors` passthrough          | none       |
//! | NotFound   | 404    | message `Not Found`                     | `error!`   |
//! | Internal   | 500    | root message, widened when diagnostics on | `error!` |

use std::sync::OnceLock;

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use tracing::error;

use crate::envelope::ErrorResponse;
use crate::error::ApiError;

/// Environment switch that widens 500 bodies with the first cause and a
/// captured backtrace. Read once per process.
pub const ERROR_TRACE_ENV: &str = "STOREKIT_ERROR_TRACE";

static EXPOSE_TRACE: OnceLock<bool> = OnceLock::new();

/// Translation policy. Stateless apart from the diagnostics switch, so
/// tests can construct one directly instead of going through the
/// environment.
#[derive(Debug, Clone, Copy)]
pub struct ErrorTranslator {
    expose_trace: bool,
}

impl ErrorTranslator {
    #[must_use]
    pub const fn new(expose_trace: bool) -> Self {
        Self { expose_trace }
    }

    /// The process-wide policy, from [`ERROR_TRACE_ENV`].
    #[must_use]
    pub fn from_env() -> Self {
        let expose = *EXPOSE_TRACE.get_or_init(|| {
            std::env::var(ERROR_TRACE_ENV).is_ok_and(|v| {
                matches!(
                    v.trim().to_ascii_lowercase().as_str(),
                    "1" | "true" | "yes" | "on"
                )
            })
        });
        Self::new(expose)
    }

    /// Apply the translation table.
    #[must_use]
    pub fn translate(&self, err: ApiError) -> Response {
        match err {
            ApiError::Validation { message, errors } => {
                let mut body = ErrorResponse::new(message);
                body.errors = errors;
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            ApiError::NotFound { message } => {
                error!(error = %message, "resource not found");
                (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Not Found"))).into_response()
            }
            ApiError::Internal(source) => {
                error!(error = ?source, "unhandled failure");
                let body = ErrorResponse::new(self.internal_message(&source));
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }

    /// Body message for unclassified failures: the root message alone,
    /// or root, first cause, and backtrace with diagnostics enabled. The
    /// cause line stays present (empty) for single-error chains.
    fn internal_message(&self, err: &anyhow::Error) -> String {
        if !self.expose_trace {
            return err.to_string();
        }
        let inner = err
            .chain()
            .nth(1)
            .map(ToString::to_string)
            .unwrap_or_default();
        format!("{err}\n{inner}\n***Trace***\n{}", err.backtrace())
    }
}

/// Route handler errors through the process-wide policy so `?` works.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        ErrorTranslator::from_env().translate(self)
    }
}
