//! Unit of work: one per request.
//!
//! Owns a lazily-created persistence context and a registry of typed
//! repositories keyed by the entity's [`TypeId`]. Repeated repository
//! requests for the same entity type return the identical instance, so
//! everything staged through any of them lands in the same change set.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::Result;
use crate::context::{ContextFactory, Store, StoreContext};
use crate::entity::StoreEntity;
use crate::repository::Repository;
use crate::scope::TenantScope;

/// Request-scoped coordinator over one persistence context.
///
/// Not meant to outlive the request it was created for. Dropping a unit
/// of work with uncommitted staged changes discards them.
pub struct UnitOfWork {
    factory: ContextFactory,
    repos: Mutex<HashMap<TypeId, Box<dyn Any + Send + Sync>>>,
}

impl UnitOfWork {
    #[must_use]
    pub fn new(store: &Store) -> Self {
        Self {
            factory: ContextFactory::new(store),
            repos: Mutex::new(HashMap::new()),
        }
    }

    /// The persistence context, created on first access.
    #[must_use]
    pub fn context(&self) -> Arc<StoreContext> {
        self.factory.init()
    }

    /// Whether any operation has touched the persistence context yet.
    #[must_use]
    pub fn is_context_initialized(&self) -> bool {
        self.factory.is_initialized()
    }

    /// The repository for entity `E`, created and cached on first request.
    pub fn repository<E: StoreEntity>(&self) -> Arc<Repository<E>> {
        let key = TypeId::of::<E>();
        let mut repos = self.repos.lock();
        if let Some(slot) = repos.get(&key)
            && let Some(repo) = slot.downcast_ref::<Arc<Repository<E>>>()
        {
            return Arc::clone(repo);
        }
        let repo = Arc::new(Repository::<E>::bind(self.context()));
        repos.insert(key, Box::new(Arc::clone(&repo)));
        repo
    }

    /// Commit every staged change in one transaction.
    ///
    /// A unit of work whose context was never touched has nothing staged
    /// and commits nothing.
    ///
    /// # Errors
    /// Engine faults surface unchanged; nothing is applied on failure.
    pub async fn save_changes(&self, scope: &TenantScope) -> Result<u64> {
        if !self.factory.is_initialized() {
            return Ok(0);
        }
        self.context().save_changes(scope).await
    }

    /// How many operations are currently staged.
    #[must_use]
    pub fn staged_count(&self) -> usize {
        if self.factory.is_initialized() {
            self.context().staged_count()
        } else {
            0
        }
    }
}
