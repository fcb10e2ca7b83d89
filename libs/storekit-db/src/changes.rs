//! Staged operations and the per-context change set.
//!
//! Mutations are recorded here as type-erased [`TrackedChange`] entries and
//! applied only when the owning context commits. Erasure lets one change
//! set span entity types while each entry still executes with its concrete
//! entity's columns.

use std::any::TypeId;

use futures::future::BoxFuture;
use sea_orm::{ColumnTrait, DatabaseTransaction, DbErr, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::audit::{self, AuditStamp};
use crate::entity::StoreEntity;

/// Lifecycle tag of a staged operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChangeState {
    Added,
    Modified,
    Removed,
}

/// One staged operation, erased over its entity type.
pub(crate) trait TrackedChange: Send {
    fn state(&self) -> ChangeState;

    /// Type tag of the entity this change belongs to.
    fn entity_key(&self) -> TypeId;

    /// Identifier the change targets, when it targets exactly one row.
    fn identity(&self) -> Option<Uuid>;

    /// Apply the audit stamp appropriate for this change's state.
    fn stamp(&mut self, stamp: &AuditStamp);

    /// Execute against the open transaction, consuming the change.
    fn apply(self: Box<Self>, txn: &DatabaseTransaction) -> BoxFuture<'_, Result<u64, DbErr>>;
}

/// Concrete staged operation for entity `E`.
pub(crate) enum Pending<E: StoreEntity> {
    Insert(E::ActiveModel),
    /// Full-row overwrite of the stored row with this identifier.
    Overwrite { id: Uuid, row: E::ActiveModel },
    Remove { id: Uuid },
    RemoveMany { ids: Vec<Uuid> },
}

impl<E: StoreEntity> TrackedChange for Pending<E> {
    fn state(&self) -> ChangeState {
        match self {
            Self::Insert(_) => ChangeState::Added,
            Self::Overwrite { .. } => ChangeState::Modified,
            Self::Remove { .. } | Self::RemoveMany { .. } => ChangeState::Removed,
        }
    }

    fn entity_key(&self) -> TypeId {
        TypeId::of::<E>()
    }

    fn identity(&self) -> Option<Uuid> {
        match self {
            Self::Insert(row) => E::id_of_row(row),
            Self::Overwrite { id, .. } | Self::Remove { id } => Some(*id),
            Self::RemoveMany { .. } => None,
        }
    }

    fn stamp(&mut self, stamp: &AuditStamp) {
        match self {
            Self::Insert(row) => audit::on_insert::<E>(row, stamp),
            Self::Overwrite { row, .. } => audit::on_update::<E>(row, stamp),
            Self::Remove { .. } | Self::RemoveMany { .. } => {}
        }
    }

    fn apply(self: Box<Self>, txn: &DatabaseTransaction) -> BoxFuture<'_, Result<u64, DbErr>> {
        Box::pin(async move {
            match *self {
                Self::Insert(row) => E::insert(row).exec_without_returning(txn).await,
                Self::Overwrite { id, row } => {
                    let res = E::update_many()
                        .set(row)
                        .filter(E::id_col().eq(id))
                        .exec(txn)
                        .await?;
                    Ok(res.rows_affected)
                }
                Self::Remove { id } => {
                    let res = E::delete_many().filter(E::id_col().eq(id)).exec(txn).await?;
                    Ok(res.rows_affected)
                }
                Self::RemoveMany { ids } => {
                    if ids.is_empty() {
                        return Ok(0);
                    }
                    let res = E::delete_many()
                        .filter(E::id_col().is_in(ids))
                        .exec(txn)
                        .await?;
                    Ok(res.rows_affected)
                }
            }
        })
    }
}

/// Ordered set of staged operations for one persistence context.
#[derive(Default)]
pub(crate) struct ChangeSet {
    entries: Vec<Box<dyn TrackedChange>>,
}

impl ChangeSet {
    /// Stage a change.
    ///
    /// An overwrite detaches whatever was previously staged for the same
    /// row first: the supplied instance wins wholesale, matching
    /// update-as-full-overwrite semantics.
    pub(crate) fn stage(&mut self, change: Box<dyn TrackedChange>) {
        if change.state() == ChangeState::Modified
            && let Some(id) = change.identity()
        {
            let key = change.entity_key();
            self.entries
                .retain(|existing| !(existing.entity_key() == key && existing.identity() == Some(id)));
        }
        self.entries.push(change);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn drain(&mut self) -> Vec<Box<dyn TrackedChange>> {
        std::mem::take(&mut self.entries)
    }
}
