//! `SeaORM` entities backing the module.

/// Tenant-owned, audited, soft-deletable.
pub mod project {
    use sea_orm::entity::prelude::*;
    use storekit_db::Persistable;
    use time::OffsetDateTime;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Persistable)]
    #[sea_orm(table_name = "projects")]
    #[persist(
        id = "id",
        tenant = "tenant_id",
        created = "created_at",
        updated = "updated_at",
        soft_delete = "is_deleted"
    )]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub tenant_id: Uuid,
        pub name: String,
        pub description: Option<String>,
        pub is_deleted: bool,
        pub created_at: OffsetDateTime,
        pub updated_at: OffsetDateTime,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Shared reference data visible to every caller: no tenant, no audit
/// columns, hard deletes.
pub mod tag {
    use sea_orm::entity::prelude::*;
    use storekit_db::Persistable;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Persistable)]
    #[sea_orm(table_name = "tags")]
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
