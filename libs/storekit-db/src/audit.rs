//! Commit-time audit stamping.
//!
//! Stamping happens once, inside the save pipeline, over every staged row.
//! Business code never assigns `created_at`, `updated_at`, or the owning
//! tenant itself; whatever a caller (or a mapped client payload) put in
//! those fields before insert is overwritten here.

use time::OffsetDateTime;
use uuid::Uuid;

use crate::entity::StoreEntity;
use crate::scope::TenantScope;

/// The time/tenant pair a single commit stamps with.
///
/// Captured once per commit so every row in one save shares the same
/// timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditStamp {
    at: OffsetDateTime,
    tenant: Option<Uuid>,
}

impl AuditStamp {
    #[must_use]
    pub fn new(at: OffsetDateTime, tenant: Option<Uuid>) -> Self {
        Self { at, tenant }
    }

    /// Stamp for the current instant under `scope`.
    #[must_use]
    pub fn now(scope: &TenantScope) -> Self {
        Self::new(OffsetDateTime::now_utc(), scope.tenant_id())
    }

    #[must_use]
    pub fn at(&self) -> OffsetDateTime {
        self.at
    }

    #[must_use]
    pub fn tenant(&self) -> Option<Uuid> {
        self.tenant
    }
}

/// Stamp a row that is about to be inserted.
///
/// Sets `created_at = updated_at = stamp.at`. If the entity is
/// tenant-owned and the stamp carries a tenant, the owning tenant is set
/// from the stamp, replacing any client-supplied value. Idempotent for
/// identical inputs.
pub fn on_insert<E: StoreEntity>(row: &mut E::ActiveModel, stamp: &AuditStamp) {
    E::set_created_at(row, stamp.at);
    E::set_updated_at(row, stamp.at);
    if E::tenant_col().is_some()
        && let Some(tenant) = stamp.tenant
    {
        E::set_tenant_id(row, tenant);
    }
}

/// Stamp a row that is about to overwrite its stored version.
///
/// Advances `updated_at` only; `created_at` and the owning tenant are
/// never touched after insert.
pub fn on_update<E: StoreEntity>(row: &mut E::ActiveModel, stamp: &AuditStamp) {
    E::set_updated_at(row, stamp.at);
}
