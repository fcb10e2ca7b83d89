//! HTTP boundary for storekit services.
//!
//! Three small pieces, kept apart from any routing framework choice:
//!
//! - [`envelope`] — the wire envelope types. Their field names
//!   (`succeed`, `message`, `data`, `errors`, `totalCounts`) are a
//!   compatibility contract with existing clients; treat them as frozen.
//! - [`error`] — [`ApiError`], the boundary-side error taxonomy, with
//!   `From` conversions off the service layer so handlers can use `?`.
//! - [`translate`] — the status/body/logging table that turns an
//!   [`ApiError`] into a response, including the diagnostics-gated body
//!   for unclassified failures.

pub mod envelope;
pub mod error;
pub mod translate;

pub use envelope::{ErrorResponse, OperationResult, PagedResponse, StatusSummary};
pub use error::ApiError;
pub use translate::ErrorTranslator;
