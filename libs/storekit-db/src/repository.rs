//! Generic repository over one entity type.
//!
//! Reads run against the engine immediately, always behind the caller's
//! tenant scope. Mutations only *stage* work on the owning persistence
//! context; they take effect when the context commits. Staging performs no
//! I/O, which is why [`Repository::add`] and [`Repository::update`] are
//! synchronous while every engine-touching operation is async.

use std::marker::PhantomData;
use std::sync::Arc;

use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use crate::changes::Pending;
use crate::context::StoreContext;
use crate::entity::StoreEntity;
use crate::scope::{TenantScope, scope_condition};
use crate::{Result, StoreError};

/// Repository for entity `E`, bound to one persistence context.
///
/// Obtained from [`crate::UnitOfWork::repository`]; within one unit of
/// work every request for the same entity type yields the same instance.
pub struct Repository<E: StoreEntity> {
    ctx: Arc<StoreContext>,
    _entity: PhantomData<E>,
}

impl<E: StoreEntity> Repository<E> {
    pub(crate) fn bind(ctx: Arc<StoreContext>) -> Self {
        Self {
            ctx,
            _entity: PhantomData,
        }
    }

    /// Load one row by identifier, if visible under `scope`.
    ///
    /// # Errors
    /// Engine faults surface unchanged.
    pub async fn get_by_id(&self, scope: &TenantScope, id: Uuid) -> Result<Option<E::Model>> {
        self.get(scope, Condition::all().add(E::id_col().eq(id)))
            .await
    }

    /// Load the first row matching `filter` among those visible under
    /// `scope`.
    ///
    /// # Errors
    /// Engine faults surface unchanged.
    pub async fn get(&self, scope: &TenantScope, filter: Condition) -> Result<Option<E::Model>> {
        let found = E::find()
            .filter(scope_condition::<E>(scope))
            .filter(filter)
            .one(self.ctx.connection())
            .await?;
        Ok(found)
    }

    /// Load every visible row matching `filter`.
    ///
    /// # Errors
    /// Engine faults surface unchanged.
    pub async fn get_many(&self, scope: &TenantScope, filter: Condition) -> Result<Vec<E::Model>> {
        let found = E::find()
            .filter(scope_condition::<E>(scope))
            .filter(filter)
            .all(self.ctx.connection())
            .await?;
        Ok(found)
    }

    /// Load every row visible under `scope`.
    ///
    /// # Errors
    /// Engine faults surface unchanged.
    pub async fn get_all(&self, scope: &TenantScope) -> Result<Vec<E::Model>> {
        self.get_many(scope, Condition::all()).await
    }

    /// Count the rows visible under `scope`.
    ///
    /// # Errors
    /// Engine faults surface unchanged.
    pub async fn count(&self, scope: &TenantScope) -> Result<u64> {
        let n = E::find()
            .filter(scope_condition::<E>(scope))
            .count(self.ctx.connection())
            .await?;
        Ok(n)
    }

    /// Stage an insert. Audit fields and the owning tenant are stamped at
    /// commit time; values the row already carries for them are replaced.
    pub fn add(&self, row: E::ActiveModel) {
        self.ctx.stage(Box::new(Pending::<E>::Insert(row)));
    }

    /// Stage a full-row overwrite of the stored row sharing `row`'s
    /// identifier.
    ///
    /// Anything previously staged for that row is detached first; the
    /// supplied instance wins wholesale. The stored row itself changes
    /// only at commit.
    ///
    /// # Errors
    /// Fails with [`StoreError::MissingIdentity`] when the row does not
    /// carry its identifier.
    pub fn update(&self, row: E::ActiveModel) -> Result<()> {
        let Some(id) = E::id_of_row(&row) else {
            return Err(StoreError::MissingIdentity(
                "update requires the identifier to be set on the row",
            ));
        };
        self.ctx.stage(Box::new(Pending::<E>::Overwrite { id, row }));
        Ok(())
    }

    /// Load one row by identifier and stage its removal.
    ///
    /// Absent (or invisible under `scope`) rows are a no-op: returns
    /// `Ok(false)` and stages nothing.
    ///
    /// # Errors
    /// Engine faults from the existence check surface unchanged.
    pub async fn delete(&self, scope: &TenantScope, id: Uuid) -> Result<bool> {
        match self.get_by_id(scope, id).await? {
            Some(_) => {
                self.ctx.stage(Box::new(Pending::<E>::Remove { id }));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Load every visible row matching `filter` and stage their removal.
    /// Returns how many removals were staged.
    ///
    /// # Errors
    /// Engine faults from the lookup surface unchanged.
    pub async fn delete_where(&self, scope: &TenantScope, filter: Condition) -> Result<u64> {
        let rows = self.get_many(scope, filter).await?;
        let ids: Vec<Uuid> = rows.iter().map(E::id_of).collect();
        let staged = ids.len() as u64;
        if !ids.is_empty() {
            self.ctx.stage(Box::new(Pending::<E>::RemoveMany { ids }));
        }
        Ok(staged)
    }

    /// Stage removal of rows already loaded by the caller.
    pub fn delete_rows<I>(&self, rows: I)
    where
        I: IntoIterator<Item = E::Model>,
    {
        let ids: Vec<Uuid> = rows.into_iter().map(|m| E::id_of(&m)).collect();
        if ids.is_empty() {
            return;
        }
        self.ctx.stage(Box::new(Pending::<E>::RemoveMany { ids }));
    }
}
