//! Wire shapes and mapping for the projects resource.

mod mapper;


pub use mapper::{NAME_MAX, ProjectMapper};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Creation input.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCreate {
    pub name: String,
    pub description: Option<String>,
}

/// Partial update. Fields that are absent (or `null`) keep their stored
/// values; there is no way to clear `description` through a patch.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Read shape. The owning tenant is implied by the caller's scope and
/// never echoed back.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Listing query parameters. Accepted for wire compatibility; listing
/// currently returns every row the scope can see.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFilter {
    pub name: Option<String>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}
