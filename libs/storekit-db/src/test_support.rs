//! Fixtures shared by the in-crate tests.
//!
//! The entities here implement [`crate::StoreEntity`] by hand, which keeps
//! this crate free of a dev-dependency on its own derive; the derive is
//! exercised from the integration tests instead.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use sea_orm::{ActiveValue, DatabaseConnection};
use uuid::Uuid;

use crate::context::{Store, StoreOptions};
use crate::schema::create_table_for;

fn value_of(v: &ActiveValue<Uuid>) -> Option<Uuid> {
    match v {
        ActiveValue::Set(id) | ActiveValue::Unchanged(id) => Some(*id),
        ActiveValue::NotSet => None,
    }
}

/// Tenant-owned, audited.
pub(crate) mod widget {
    use sea_orm::entity::prelude::*;
    use time::OffsetDateTime;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "widgets")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub tenant_id: Uuid,
        pub name: String,
        pub created_at: OffsetDateTime,
        pub updated_at: OffsetDateTime,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl crate::StoreEntity for Entity {
        const AUDITED: bool = true;

        fn id_col() -> Self::Column {
            Column::Id
        }

        fn id_of(model: &Self::Model) -> Uuid {
            model.id
        }

        fn id_of_row(row: &Self::ActiveModel) -> Option<Uuid> {
            super::value_of(&row.id)
        }

        fn tenant_col() -> Option<Self::Column> {
            Some(Column::TenantId)
        }

        fn soft_delete_col() -> Option<Self::Column> {
            None
        }

        fn set_created_at(row: &mut Self::ActiveModel, at: OffsetDateTime) {
            row.created_at = sea_orm::ActiveValue::Set(at);
        }

        fn set_updated_at(row: &mut Self::ActiveModel, at: OffsetDateTime) {
            row.updated_at = sea_orm::ActiveValue::Set(at);
        }

        fn set_tenant_id(row: &mut Self::ActiveModel, tenant: Uuid) {
            row.tenant_id = sea_orm::ActiveValue::Set(tenant);
        }
    }
}

/// Shared data: identifier only, no tenant, no audit columns.
pub(crate) mod gizmo {
    use sea_orm::entity::prelude::*;
    use time::OffsetDateTime;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "gizmos")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub name: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl crate::StoreEntity for Entity {
        const AUDITED: bool = false;

        fn id_col() -> Self::Column {
            Column::Id
        }

        fn id_of(model: &Self::Model) -> Uuid {
            model.id
        }

        fn id_of_row(row: &Self::ActiveModel) -> Option<Uuid> {
            super::value_of(&row.id)
        }

        fn tenant_col() -> Option<Self::Column> {
            None
        }

        fn soft_delete_col() -> Option<Self::Column> {
            None
        }

        fn set_created_at(_row: &mut Self::ActiveModel, _at: OffsetDateTime) {}

        fn set_updated_at(_row: &mut Self::ActiveModel, _at: OffsetDateTime) {}

        fn set_tenant_id(_row: &mut Self::ActiveModel, _tenant: Uuid) {}
    }
}

/// Tenant-owned, audited, soft-deletable.
pub(crate) mod memo {
    use sea_orm::entity::prelude::*;
    use time::OffsetDateTime;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "memos")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub tenant_id: Uuid,
        pub title: String,
        pub is_deleted: bool,
        pub created_at: OffsetDateTime,
        pub updated_at: OffsetDateTime,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl crate::StoreEntity for Entity {
        const AUDITED: bool = true;

        fn id_col() -> Self::Column {
            Column::Id
        }

        fn id_of(model: &Self::Model) -> Uuid {
            model.id
        }

        fn id_of_row(row: &Self::ActiveModel) -> Option<Uuid> {
            super::value_of(&row.id)
        }

        fn tenant_col() -> Option<Self::Column> {
            Some(Column::TenantId)
        }

        fn soft_delete_col() -> Option<Self::Column> {
            Some(Column::IsDeleted)
        }

        fn set_created_at(row: &mut Self::ActiveModel, at: OffsetDateTime) {
            row.created_at = sea_orm::ActiveValue::Set(at);
        }

        fn set_updated_at(row: &mut Self::ActiveModel, at: OffsetDateTime) {
            row.updated_at = sea_orm::ActiveValue::Set(at);
        }

        fn set_tenant_id(row: &mut Self::ActiveModel, tenant: Uuid) {
            row.tenant_id = sea_orm::ActiveValue::Set(tenant);
        }
    }
}

/// One-connection in-memory sqlite; the single pooled connection keeps the
/// database alive for the test's duration.
pub(crate) async fn mem_conn() -> DatabaseConnection {
    let mut options = StoreOptions::new("sqlite::memory:");
    options.max_connections = Some(1);
    options.min_connections = Some(1);
    Store::connect(options)
        .await
        .expect("in-memory sqlite connects")
        .connection()
        .clone()
}

/// A store over one-connection in-memory sqlite with the fixture tables
/// created.
pub(crate) async fn mem_store() -> Store {
    let conn = mem_conn().await;
    let store = Store::from_connection(conn);
    create_table_for::<widget::Entity, _>(store.connection())
        .await
        .expect("widget table");
    create_table_for::<gizmo::Entity, _>(store.connection())
        .await
        .expect("gizmo table");
    create_table_for::<memo::Entity, _>(store.connection())
        .await
        .expect("memo table");
    store
}
