//! Projects Module Implementation
//!
//! Reference module for the storekit toolkit: a tenant-owned `projects`
//! resource with full CRUD over HTTP, plus a shared `tags` entity that
//! carries no tenant or audit columns. Everything resource-specific lives
//! in [`domain::ProjectMapper`] and the storage entities; the staged
//! pipeline, scoping, and wire envelopes come from the toolkit crates.

pub mod api;
pub mod domain;
pub mod infra;

pub use api::rest::routes::{AppState, router};
pub use domain::{ProjectCreate, ProjectFilter, ProjectMapper, ProjectPatch, ProjectView};
pub use infra::storage::prepare_schema;
