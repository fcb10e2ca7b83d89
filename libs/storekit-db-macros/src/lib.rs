// Proc-macro crate for storekit-db entity derives
//
//! # storekit-db-macros
//!
//! Procedural macros for the `storekit-db` data-access layer.
//!
//! ## `#[derive(Persistable)]`
//!
//! Implements `StoreEntity` for a SeaORM entity based on `#[persist(...)]`
//! attributes.
//!
//! **IMPORTANT**: every capability dimension must be explicitly specified.
//! No implicit defaults.
//!
//! ### Example
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
//!
//! ### Attributes
//!
//! - **Identifier**: `id = "column_name"` (always required)
//! - **Tenant**: `tenant = "column_name"` OR `no_tenant`
//! - **Audit**: `created = "column_name", updated = "column_name"` OR `no_audit`
//! - **Soft delete**: `soft_delete = "column_name"` OR `no_soft_delete`
//!
//! A tenant-owned entity is always audited: `tenant` together with
//! `no_audit` is rejected at compile time.

use proc_macro::TokenStream;
use proc_macro_error2::proc_macro_error;
use syn::{DeriveInput, parse_macro_input};

mod persistable;

/// Derive macro for implementing `StoreEntity`.
///
/// Place this on your SeaORM `Model` struct along with `#[persist(...)]`
/// attributes. Attribute values name the model fields (which SeaORM maps to
/// columns of the same name); the derive emits the column metadata and the
/// audit writers used by the save pipeline.
///
/// # Attributes
///
/// **Every capability dimension must be explicitly specified:**
///
/// - `id = "column_name"` - primary-identifier column (UUID), required
/// - `tenant = "column_name"` OR `no_tenant` - tenant-ownership column
/// - `created = "column_name", updated = "column_name"` OR `no_audit` -
///   audit timestamp columns
/// - `soft_delete = "column_name"` OR `no_soft_delete` - boolean
///   retired-in-place flag
///
/// # Example
///
/// ```ignore
/// #[derive(DeriveEntityModel, Persistable)]
/// #[sea_orm(table_name = "tags")]
/// #[persist(id = "id", no_tenant, no_audit, no_soft_delete)]
/// pub struct Model {
///     #[sea_orm(primary_key, auto_increment = false)]
///     pub id: Uuid,
///     pub name: String,
/// }
/// ```
#[proc_macro_derive(Persistable, attributes(persist))]
#[proc_macro_error]
pub fn derive_persistable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    persistable::expand_derive_persistable(input).into()
}
