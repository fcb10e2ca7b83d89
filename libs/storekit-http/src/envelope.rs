//! Wire envelope types.
//!
//! Field names are the wire contract; `null` values are serialized, not
//! skipped, so bodies stay shape-stable for strict clients.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use storekit_db::PagedResult;

/// Success envelope for single-payload responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResult<T> {
    pub succeed: bool,
    pub message: Option<String>,
    pub data: T,
}

impl<T> OperationResult<T> {
    #[must_use]
    pub fn ok(data: T) -> Self {
        Self {
            succeed: true,
            message: None,
            data,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Success envelope for listings. `totalCounts` mirrors the listed set's
/// size as the service reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedResponse<T> {
    pub succeed: bool,
    pub data: Vec<T>,
    #[serde(rename = "totalCounts")]
    pub total_counts: u64,
}

impl<T> From<PagedResult<T>> for PagedResponse<T> {
    fn from(page: PagedResult<T>) -> Self {
        Self {
            succeed: true,
            data: page.items,
            total_counts: page.total_count,
        }
    }
}

/// Failure envelope. `errors` carries the structured validation payload
/// when one exists, `null` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub succeed: bool,
    pub message: String,
    pub errors: Option<Value>,
}

impl ErrorResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            succeed: false,
            message: message.into(),
            errors: None,
        }
    }

    #[must_use]
    pub fn with_errors(mut self, errors: Value) -> Self {
        self.errors = Some(errors);
        self
    }
}

/// Outcome summary for bulk operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub total: u64,
    pub success: u64,
    pub failed: u64,
}

impl StatusSummary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, succeeded: bool) {
        self.total += 1;
        if succeeded {
            self.success += 1;
        } else {
            self.failed += 1;
        }
    }
}
