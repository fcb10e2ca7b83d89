//! Per-request tenant scope extraction.
//!
//! The caller's identity arrives in plain headers set by whatever fronts
//! the service; token parsing is not this module's concern. A request
//! without a tenant header gets an anonymous scope, under which reads of
//! tenant-owned rows resolve to nothing.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use storekit_db::TenantScope;
use storekit_http::ApiError;
use tracing::debug;
use uuid::Uuid;

/// Header naming the tenant whose rows the request may see.
pub const TENANT_HEADER: &str = "x-tenant-id";
/// Header naming the acting user, recorded for attribution.
pub const USER_HEADER: &str = "x-user-id";

/// The caller's [`TenantScope`], read from request headers.
#[derive(Debug, Clone)]
pub struct CallerScope(pub TenantScope);

fn header_uuid(parts: &Parts, name: &'static str) -> Result<Option<Uuid>, ApiError> {
    let Some(value) = parts.headers.get(name) else {
        return Ok(None);
    };
    let text = value
        .to_str()
        .map_err(|_| ApiError::validation(format!("{name} header is not valid text")))?;
    let id = text
        .parse::<Uuid>()
        .map_err(|_| ApiError::validation(format!("{name} header is not a valid uuid")))?;
    Ok(Some(id))
}

impl<S> FromRequestParts<S> for CallerScope
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let mut scope = match header_uuid(parts, TENANT_HEADER)? {
            Some(tenant) => TenantScope::for_tenant(tenant),
            None => {
                debug!("request carries no tenant header, scope is anonymous");
                TenantScope::anonymous()
            }
        };
        if let Some(user) = header_uuid(parts, USER_HEADER)? {
            scope = scope.with_user(user);
        }
        Ok(Self(scope))
    }
}
