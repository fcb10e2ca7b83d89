//! Engine handle, connection options, and the per-request persistence
//! context.
//!
//! [`Store`] is the process-wide pooled handle. [`ContextFactory`]
//! materializes at most one [`StoreContext`] per unit of work, lazily, on
//! first access. The context owns the staged change set and turns it into
//! exactly one engine transaction on commit.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use parking_lot::Mutex;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, TransactionTrait};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::Result;
use crate::audit::AuditStamp;
use crate::changes::{ChangeSet, ChangeState, TrackedChange};
use crate::scope::TenantScope;

/// Connection settings, shaped for layering under an application's
/// configuration loader.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    /// Engine DSN, e.g. `sqlite::memory:` or `postgres://...`.
    pub dsn: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub connect_timeout: Option<Duration>,
    /// Log every statement through the engine's sqlx logger.
    pub sql_logging: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            dsn: String::new(),
            max_connections: None,
            min_connections: None,
            connect_timeout: None,
            sql_logging: false,
        }
    }
}

impl StoreOptions {
    #[must_use]
    pub fn new(dsn: impl Into<String>) -> Self {
        Self {
            dsn: dsn.into(),
            ..Self::default()
        }
    }
}

/// Process-wide engine handle. Cheap to clone; clones share the pool.
#[derive(Clone)]
pub struct Store {
    conn: DatabaseConnection,
}

impl Store {
    /// Connect to the engine described by `options`.
    ///
    /// # Errors
    /// Returns the engine's connection error unchanged.
    pub async fn connect(options: StoreOptions) -> Result<Self> {
        let mut opts = ConnectOptions::new(options.dsn.clone());
        if let Some(n) = options.max_connections {
            opts.max_connections(n);
        }
        if let Some(n) = options.min_connections {
            opts.min_connections(n);
        }
        if let Some(t) = options.connect_timeout {
            opts.connect_timeout(t);
        }
        opts.sqlx_logging(options.sql_logging);

        let conn = Database::connect(opts).await?;
        debug!("store connected");
        Ok(Self { conn })
    }

    /// Wrap an already-established connection (tests, embedded setups).
    #[must_use]
    pub fn from_connection(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Start a unit of work bound to this store.
    #[must_use]
    pub fn begin_work(&self) -> crate::UnitOfWork {
        crate::UnitOfWork::new(self)
    }
}

/// Lazily materializes the single persistence context of one unit of work.
///
/// `init` is idempotent: the first call creates the context, every later
/// call returns the same one. A factory is as cheap to hold as the pool
/// handle it clones from.
pub struct ContextFactory {
    store: Store,
    slot: OnceLock<Arc<StoreContext>>,
}

impl ContextFactory {
    #[must_use]
    pub fn new(store: &Store) -> Self {
        Self {
            store: store.clone(),
            slot: OnceLock::new(),
        }
    }

    /// Get the context, creating it on first call.
    pub fn init(&self) -> Arc<StoreContext> {
        Arc::clone(
            self.slot
                .get_or_init(|| Arc::new(StoreContext::new(self.store.connection().clone()))),
        )
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.slot.get().is_some()
    }
}

/// The persistence context of one unit of work: a connection handle plus
/// the staged change set.
pub struct StoreContext {
    conn: DatabaseConnection,
    changes: Mutex<ChangeSet>,
}

impl StoreContext {
    pub(crate) fn new(conn: DatabaseConnection) -> Self {
        Self {
            conn,
            changes: Mutex::new(ChangeSet::default()),
        }
    }

    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Number of operations currently staged.
    #[must_use]
    pub fn staged_count(&self) -> usize {
        self.changes.lock().len()
    }

    pub(crate) fn stage(&self, change: Box<dyn TrackedChange>) {
        self.changes.lock().stage(change);
    }

    /// Commit every staged operation in one engine transaction.
    ///
    /// Added rows are stamped first (`created_at`, `updated_at`, owning
    /// tenant from `scope`), then modified rows (`updated_at` only); the
    /// whole batch shares a single timestamp. With nothing staged this is
    /// a no-op returning `Ok(0)` without touching the engine.
    ///
    /// Returns the number of rows the engine reported affected. Dropping
    /// the future before it completes rolls the transaction back; none of
    /// the staged operations become observable.
    ///
    /// # Errors
    /// Any engine fault aborts the transaction and surfaces unchanged; no
    /// staged operation is applied in that case.
    #[instrument(skip_all)]
    pub async fn save_changes(&self, scope: &TenantScope) -> Result<u64> {
        let mut staged = { self.changes.lock().drain() };
        if staged.is_empty() {
            return Ok(0);
        }

        let stamp = AuditStamp::now(scope);
        for change in staged
            .iter_mut()
            .filter(|c| c.state() == ChangeState::Added)
        {
            change.stamp(&stamp);
        }
        for change in staged
            .iter_mut()
            .filter(|c| c.state() == ChangeState::Modified)
        {
            change.stamp(&stamp);
        }

        let count = staged.len();
        let rows = self
            .conn
            .transaction::<_, u64, DbErr>(move |txn| {
                Box::pin(async move {
                    let mut rows = 0u64;
                    for change in staged {
                        rows += change.apply(txn).await?;
                    }
                    Ok(rows)
                })
            })
            .await?;

        debug!(staged = count, rows, "changes committed");
        Ok(rows)
    }
}
