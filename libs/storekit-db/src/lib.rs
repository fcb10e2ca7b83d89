//! Storekit data-access layer.
//!
//! A staged unit-of-work over `SeaORM` for multi-tenant CRUD backends:
//!
//! - [`Store`] wraps the pooled engine connection; one per process.
//! - [`UnitOfWork`] lives for one request. It lazily materializes a single
//!   [`StoreContext`] and hands out one cached [`Repository`] per entity
//!   type, keyed by the entity's type tag.
//! - Repository mutations are *staged*: nothing reaches the engine until
//!   [`StoreContext::save_changes`] applies every staged operation inside
//!   one transaction, stamping audit fields (`created_at`, `updated_at`,
//!   tenant ownership) on the way.
//! - Every read is filtered through an explicit [`TenantScope`]. A
//!   tenant-owned entity queried without a tenant in scope yields nothing:
//!   the filter fails closed rather than leaking rows across tenants.
//! - [`CrudService`] composes the pieces into generic add / update /
//!   delete / get / paged-list orchestration over a per-resource
//!   [`ResourceMapper`] capability.
//!
//! Entities declare their capabilities (identifier, tenant column, audit
//! columns, soft-delete flag) through [`StoreEntity`], normally derived:
//!
//! ```ignore
//! use sea_orm::entity::prelude::*;
//! use storekit_db::Persistable;
//!
//! #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Persistable)]
//! #[sea_orm(table_name = "projects")]
//! #[persist(
//!     id = "id",
//!     tenant = "tenant_id",
//!     created = "created_at",
//!     updated = "updated_at",
//!     no_soft_delete
//! )]
//! pub struct Model {
//!     #[sea_orm(primary_key, auto_increment = false)]
//!     pub id: Uuid,
//!     pub tenant_id: Uuid,
//!     pub name: String,
//!     pub created_at: TimeDateTimeWithTimeZone,
//!     pub updated_at: TimeDateTimeWithTimeZone,
//! }
//! ```

pub mod audit;
pub mod context;
pub mod entity;
pub mod repository;
pub mod schema;
pub mod scope;
pub mod service;
pub mod unit_of_work;

mod changes;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export key types for the public API
pub use audit::AuditStamp;
pub use context::{ContextFactory, Store, StoreContext, StoreOptions};
pub use entity::StoreEntity;
pub use repository::Repository;
pub use scope::{TenantScope, scope_condition};
pub use service::{
    CrudService, PagedResult, ResourceMapper, ServiceError, ValidationFailure,
};
pub use unit_of_work::UnitOfWork;

pub use storekit_db_macros::Persistable;

use sea_orm::{DbErr, TransactionError};
use thiserror::Error;

/// Library-local result type.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Typed error for the storage layer. Engine faults pass through unchanged.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Db(#[from] DbErr),

    #[error("staged row has no identifier: {0}")]
    MissingIdentity(&'static str),
}

impl From<TransactionError<DbErr>> for StoreError {
    fn from(err: TransactionError<DbErr>) -> Self {
        match err {
            TransactionError::Connection(e) | TransactionError::Transaction(e) => Self::Db(e),
        }
    }
}
