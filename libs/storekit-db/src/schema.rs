//! Schema bootstrap helpers for tests and embedded deployments.
//!
//! Not a migrations system. These render an entity's table directly from
//! its definition, plus the one constraint the capability model declares:
//! uniqueness of *live* identifiers for soft-deletable entities.

use sea_orm::{ConnectionTrait, DatabaseBackend, EntityName, IdenStatic, Schema};
use tracing::{debug, warn};

use crate::Result;
use crate::entity::StoreEntity;

/// Create the table for `E` if it does not exist, then apply the
/// constraints its capabilities declare.
///
/// # Errors
/// Engine faults surface unchanged.
pub async fn create_table_for<E, C>(conn: &C) -> Result<()>
where
    E: StoreEntity,
    C: ConnectionTrait,
{
    let backend = conn.get_database_backend();
    let schema = Schema::new(backend);
    let mut stmt = schema.create_table_from_entity(E::default());
    stmt.if_not_exists();
    conn.execute(backend.build(&stmt)).await?;

    let entity = E::default();
    debug!(table = entity.table_name(), "table ensured");

    declare_live_id_unique::<E, C>(conn).await
}

/// Declare uniqueness of live identifiers for a soft-deletable entity: a
/// partial unique index over the id column restricted to rows whose
/// deleted flag is unset.
///
/// Entities without a soft-delete column have nothing to declare. MySQL
/// has no partial indexes; the declaration is skipped there with a
/// warning, matching the engine-support note in the constraint's design.
///
/// # Errors
/// Engine faults surface unchanged.
pub async fn declare_live_id_unique<E, C>(conn: &C) -> Result<()>
where
    E: StoreEntity,
    C: ConnectionTrait,
{
    let Some(deleted_col) = E::soft_delete_col() else {
        return Ok(());
    };

    let entity = E::default();
    let table = entity.table_name();

    if conn.get_database_backend() == DatabaseBackend::MySql {
        warn!(table, "partial unique index unsupported on mysql, skipped");
        return Ok(());
    }

    let sql = format!(
        "CREATE UNIQUE INDEX IF NOT EXISTS uq_{table}_live_id ON {table} ({id}) WHERE {deleted} = FALSE",
        id = E::id_col().as_str(),
        deleted = deleted_col.as_str(),
    );
    conn.execute_unprepared(&sql).await?;
    debug!(table, "live-id uniqueness declared");
    Ok(())
}
