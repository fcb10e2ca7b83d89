//! Entity capability contract for the storage layer.
//!
//! Every persisted entity declares, next to its `SeaORM` model, which
//! storage capabilities it carries: the identifier column, an optional
//! tenant-ownership column, optional audit timestamp columns, and an
//! optional soft-delete flag. The declaration is consumed by the scope
//! filter, the audit stamper, and the schema helpers, so no per-entity
//! hand-written query or stamping code exists anywhere else.
//!
//! **Design policy: no implicit defaults.** An entity that is not
//! tenant-owned says so explicitly (`no_tenant` on the derive); one that
//! carries no audit columns says `no_audit`. Forgetting a declaration is a
//! compile error, not a silently unfiltered table.

use sea_orm::{EntityTrait, IntoActiveModel};
use time::OffsetDateTime;
use uuid::Uuid;

/// Storage capabilities of a persisted entity.
///
/// Usually implemented with `#[derive(Persistable)]` and `#[persist(...)]`
/// attributes; a hand-written impl is equivalent.
///
/// The writer methods assign `ActiveValue::Set` on the declared fields and
/// are **no-ops** for capabilities the entity does not declare. That lets
/// the save pipeline stamp every staged row without inspecting the entity
/// type.
pub trait StoreEntity:
    EntityTrait<
        Model: Send + Sync + IntoActiveModel<Self::ActiveModel>,
        ActiveModel: Send,
    > + Send
    + Sync
    + 'static
{
    /// Whether the entity carries `created`/`updated` audit columns.
    const AUDITED: bool;

    /// Primary-identifier column (UUID). The value is assigned by the
    /// caller before insert and never rewritten afterwards.
    fn id_col() -> Self::Column;

    /// Extract the identifier from a loaded row.
    fn id_of(model: &Self::Model) -> Uuid;

    /// Extract the identifier from an active model, if one is set.
    fn id_of_row(row: &Self::ActiveModel) -> Option<Uuid>;

    /// Tenant-ownership column, when rows are isolated per tenant.
    ///
    /// `None` means the entity is shared: the tenant filter is a no-op and
    /// the save pipeline never writes a tenant for it.
    fn tenant_col() -> Option<Self::Column>;

    /// Boolean retired-in-place flag, when rows soft-delete.
    ///
    /// The storage layer only *declares* the matching live-id uniqueness
    /// constraint (see [`crate::schema`]); it does not filter retired rows
    /// out of reads.
    fn soft_delete_col() -> Option<Self::Column>;

    /// Write the creation timestamp. No-op unless [`Self::AUDITED`].
    fn set_created_at(row: &mut Self::ActiveModel, at: OffsetDateTime);

    /// Write the modification timestamp. No-op unless [`Self::AUDITED`].
    fn set_updated_at(row: &mut Self::ActiveModel, at: OffsetDateTime);

    /// Write the owning tenant. No-op when [`Self::tenant_col`] is `None`.
    fn set_tenant_id(row: &mut Self::ActiveModel, tenant: Uuid);
}
