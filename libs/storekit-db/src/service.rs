//! Generic CRUD orchestration over one resource.
//!
//! [`CrudService`] binds a unit of work to a [`ResourceMapper`] and runs
//! the add / update / delete / get / paged-list flows: scoped load where
//! the flow needs one, mapping through the capability, staged mutation,
//! commit. Each mutating operation commits its own unit of work.

use std::sync::Arc;

use sea_orm::EntityTrait;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::StoreError;
use crate::entity::StoreEntity;
use crate::scope::TenantScope;
use crate::unit_of_work::UnitOfWork;

/// Rejected input, carried with an optional structured payload for the
/// failure envelope.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ValidationFailure {
    pub message: String,
    pub errors: Option<Value>,
}

impl ValidationFailure {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: None,
        }
    }

    /// Attach a structured error payload (field map, list, anything the
    /// caller wants echoed back).
    #[must_use]
    pub fn with_errors(mut self, errors: Value) -> Self {
        self.errors = Some(errors);
        self
    }
}

/// Failure of one orchestrated operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    /// The addressed row does not exist or is not visible to the caller.
    /// The display string is the wire message verbatim.
    #[error("Not Found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One page-shaped listing: the mapped rows plus the total the boundary
/// reports as `totalCounts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedResult<V> {
    pub items: Vec<V>,
    pub total_count: u64,
}

/// Per-resource mapping capability.
///
/// The service stays generic; everything resource-specific (identifier
/// minting, validation, patch overlay, the read shape) lives here.
pub trait ResourceMapper: Send + Sync + 'static {
    type Entity: StoreEntity;
    /// Read-side shape handed to the boundary.
    type View: Send;
    /// Creation input.
    type Create: Send;
    /// Partial update input; unpopulated fields keep stored values.
    type Patch: Send;
    /// Listing filter. Reserved: listing currently selects rows by tenant
    /// visibility alone.
    type Filter: Send;

    /// Resource name used in logs and error context.
    const RESOURCE: &'static str;

    /// Build the insert row from creation input, minting the identifier.
    ///
    /// # Errors
    /// Invalid input is reported as a [`ValidationFailure`]; the service
    /// passes it through untouched.
    fn new_row(
        &self,
        create: Self::Create,
    ) -> Result<<Self::Entity as EntityTrait>::ActiveModel, ValidationFailure>;

    /// Overlay the populated fields of `patch` onto the stored row,
    /// producing the full overwrite row.
    ///
    /// # Errors
    /// Invalid input is reported as a [`ValidationFailure`].
    fn merge_row(
        &self,
        current: <Self::Entity as EntityTrait>::Model,
        patch: Self::Patch,
    ) -> Result<<Self::Entity as EntityTrait>::ActiveModel, ValidationFailure>;

    /// Project a stored row into the read shape.
    fn view(&self, model: <Self::Entity as EntityTrait>::Model) -> Self::View;
}

/// Generic CRUD flows for one resource.
pub struct CrudService<M: ResourceMapper> {
    work: Arc<UnitOfWork>,
    mapper: M,
}

impl<M: ResourceMapper> CrudService<M> {
    pub fn new(work: Arc<UnitOfWork>, mapper: M) -> Self {
        Self { work, mapper }
    }

    /// Create a resource and commit. Returns the new identifier.
    ///
    /// # Errors
    /// `Validation` from the mapper; `Store` for engine faults or a
    /// mapper row missing its identifier.
    #[instrument(skip_all, fields(resource = M::RESOURCE))]
    pub async fn add(&self, scope: &TenantScope, create: M::Create) -> Result<Uuid, ServiceError> {
        let row = self.mapper.new_row(create)?;
        let Some(id) = <M::Entity as StoreEntity>::id_of_row(&row) else {
            return Err(ServiceError::Store(StoreError::MissingIdentity(
                "mapper produced an insert row without an identifier",
            )));
        };
        let repo = self.work.repository::<M::Entity>();
        repo.add(row);
        self.work.save_changes(scope).await?;
        debug!(%id, "resource added");
        Ok(id)
    }

    /// Overwrite the addressed resource with the stored row merged under
    /// `patch`, then commit.
    ///
    /// # Errors
    /// `NotFound` when the row is absent or not visible under `scope`;
    /// `Validation` from the mapper; `Store` for engine faults.
    #[instrument(skip_all, fields(resource = M::RESOURCE, %id))]
    pub async fn update(
        &self,
        scope: &TenantScope,
        id: Uuid,
        patch: M::Patch,
    ) -> Result<Uuid, ServiceError> {
        let repo = self.work.repository::<M::Entity>();
        let Some(current) = repo.get_by_id(scope, id).await? else {
            return Err(self.not_found(id));
        };
        let row = self.mapper.merge_row(current, patch)?;
        repo.update(row)?;
        self.work.save_changes(scope).await?;
        debug!("resource updated");
        Ok(id)
    }

    /// Remove the addressed resource and commit.
    ///
    /// Removing the same identifier twice fails the second call with
    /// `NotFound`.
    ///
    /// # Errors
    /// `NotFound` when the row is absent or not visible under `scope`;
    /// `Store` for engine faults.
    #[instrument(skip_all, fields(resource = M::RESOURCE, %id))]
    pub async fn delete(&self, scope: &TenantScope, id: Uuid) -> Result<Uuid, ServiceError> {
        let repo = self.work.repository::<M::Entity>();
        if !repo.delete(scope, id).await? {
            return Err(self.not_found(id));
        }
        self.work.save_changes(scope).await?;
        debug!("resource deleted");
        Ok(id)
    }

    /// Load the addressed resource and map it to its read shape.
    ///
    /// # Errors
    /// `NotFound` when the row is absent or not visible under `scope`;
    /// `Store` for engine faults.
    pub async fn get(&self, scope: &TenantScope, id: Uuid) -> Result<M::View, ServiceError> {
        let repo = self.work.repository::<M::Entity>();
        let Some(model) = repo.get_by_id(scope, id).await? else {
            return Err(self.not_found(id));
        };
        Ok(self.mapper.view(model))
    }

    /// List every row visible under `scope`, mapped to the read shape.
    ///
    /// The filter is accepted for contract stability but not consulted
    /// for row selection; `total_count` is the length of the listed set.
    ///
    /// # Errors
    /// `Store` for engine faults.
    #[instrument(skip_all, fields(resource = M::RESOURCE))]
    pub async fn get_paged(
        &self,
        scope: &TenantScope,
        _filter: M::Filter,
    ) -> Result<PagedResult<M::View>, ServiceError> {
        let repo = self.work.repository::<M::Entity>();
        let rows = repo.get_all(scope).await?;
        let total_count = rows.len() as u64;
        let items = rows.into_iter().map(|m| self.mapper.view(m)).collect();
        debug!(total_count, "resources listed");
        Ok(PagedResult { items, total_count })
    }

    fn not_found(&self, id: Uuid) -> ServiceError {
        ServiceError::NotFound {
            entity: M::RESOURCE,
            id,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use serde_json::json;
    use uuid::Uuid;

    use super::{ServiceError, ValidationFailure};

    #[test]
    fn not_found_displays_the_wire_message() {
        let err = ServiceError::NotFound {
            entity: "widget",
            id: Uuid::nil(),
        };
        assert_eq!(err.to_string(), "Not Found");
    }

    #[test]
    fn validation_failure_displays_its_message() {
        let failure = ValidationFailure::new("name must not be empty")
            .with_errors(json!({ "name": ["must not be empty"] }));
        let err = ServiceError::from(failure);
        assert_eq!(err.to_string(), "name must not be empty");
        match err {
            ServiceError::Validation(v) => {
                assert_eq!(v.errors, Some(json!({ "name": ["must not be empty"] })));
            }
            other => panic!("unexpected variant: {other}"),
        }
    }
}
