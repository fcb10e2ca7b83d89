//! Explicit tenant scope and the visibility condition built from it.
//!
//! A [`TenantScope`] is constructed at the request boundary (from claims,
//! headers, or test fixtures) and threaded explicitly through every
//! repository and service call. There is no ambient per-request state: a
//! call sees exactly the tenant its caller passed, and scopes are never
//! cached across requests.
//!
//! [`scope_condition`] turns the scope into a `SeaORM` [`Condition`] that
//! every repository read ANDs in front of caller predicates. The filter is
//! installed once here for all entity types; entities opt in or out solely
//! through their [`StoreEntity`] capability declaration.

use sea_orm::{ColumnTrait, Condition, sea_query::Expr};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::StoreEntity;

/// Caller identity for one request: the tenant whose rows are visible and
/// the acting user (used for attribution in logs).
///
/// An absent tenant is a valid state (system calls, unauthenticated
/// probes). For tenant-owned entities it denies all rows rather than
/// widening visibility.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TenantScope {
    tenant_id: Option<Uuid>,
    user_id: Option<Uuid>,
}

impl TenantScope {
    /// Scope restricted to a single tenant.
    #[must_use]
    pub fn for_tenant(tenant_id: Uuid) -> Self {
        Self {
            tenant_id: Some(tenant_id),
            user_id: None,
        }
    }

    /// Scope with no tenant. Tenant-owned entities are invisible under it.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Attach the acting user.
    #[must_use]
    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    #[must_use]
    pub fn tenant_id(&self) -> Option<Uuid> {
        self.tenant_id
    }

    #[must_use]
    pub fn user_id(&self) -> Option<Uuid> {
        self.user_id
    }

    #[must_use]
    pub fn has_tenant(&self) -> bool {
        self.tenant_id.is_some()
    }
}

/// Build the visibility condition for entity `E` under `scope`.
///
/// - Entity without a tenant column: empty condition (shared data, the
///   filter is a no-op).
/// - Tenant in scope: `tenant_col = tenant`.
/// - No tenant in scope: a deny-all condition. Reads return empty result
///   sets; missing tenant context is never an error and never a wider
///   view.
#[must_use]
pub fn scope_condition<E: StoreEntity>(scope: &TenantScope) -> Condition {
    let deny_all = || Condition::all().add(Expr::value(false));

    let Some(tenant_col) = E::tenant_col() else {
        return Condition::all();
    };

    match scope.tenant_id() {
        Some(tenant) => Condition::all().add(tenant_col.eq(tenant)),
        None => deny_all(),
    }
}
