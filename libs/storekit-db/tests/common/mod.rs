#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(dead_code)]

//! Shared fixtures for the integration tests: derive-backed entities and
//! an in-memory store bring-up.

use storekit_db::schema::create_table_for;
use storekit_db::{Store, StoreOptions};

/// Tenant-owned, audited.
pub mod note {
    use sea_orm::entity::prelude::*;
    use storekit_db::Persistable;
    use time::OffsetDateTime;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Persistable)]
    #[sea_orm(table_name = "notes")]
    #[persist(
        id = "id",
        tenant = "tenant_id",
        created = "created_at",
        updated = "updated_at",
        no_soft_delete
    )]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub tenant_id: Uuid,
        pub title: String,
        pub body: Option<String>,
        pub created_at: OffsetDateTime,
        pub updated_at: OffsetDateTime,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Shared reference data: no tenant, no audit columns.
pub mod label {
    use sea_orm::entity::prelude::*;
    use storekit_db::Persistable;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Persistable)]
    #[sea_orm(table_name = "labels")]
    #[persist(id = "id", no_tenant, no_audit, no_soft_delete)]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub name: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// One-connection in-memory sqlite with the fixture tables created.
pub async fn bring_up() -> Store {
    let mut options = StoreOptions::new("sqlite::memory:");
    options.max_connections = Some(1);
    options.min_connections = Some(1);
    let store = Store::connect(options)
        .await
        .expect("in-memory sqlite connects");
    create_table_for::<note::Entity, _>(store.connection())
        .await
        .expect("notes table");
    create_table_for::<label::Entity, _>(store.connection())
        .await
        .expect("labels table");
    store
}
