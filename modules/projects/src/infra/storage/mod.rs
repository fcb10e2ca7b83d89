pub mod entity;

use sea_orm::ConnectionTrait;
use storekit_db::schema::create_table_for;

/// Ensure both module tables exist on `conn`.
///
/// Idempotent; meant for process start and test bring-up. Deployments
/// with managed migrations can skip it.
///
/// # Errors
/// Propagates database errors from DDL execution.
pub async fn prepare_schema<C: ConnectionTrait>(conn: &C) -> storekit_db::Result<()> {
    create_table_for::<entity::project::Entity, _>(conn).await?;
    create_table_for::<entity::tag::Entity, _>(conn).await?;
    Ok(())
}
